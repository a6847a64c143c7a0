pub mod audio;
pub mod input;
pub mod movement;
pub mod physics;
pub mod rendering;

use glam::Vec2;

use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::error::PetError;
use crate::host::Host;
use crate::scheduler::{FixedScheduler, Steps};
use audio::AudioSystem;
use input::InputSystem;
use movement::MovementSystem;
use physics::PhysicsSystem;
use rendering::RenderingSystem;

/// Collaborators handed to a system for one phase.
pub struct Ctx<'a> {
    pub rng: &'a mut fastrand::Rng,
    pub host: &'a mut dyn Host,
}

/// Stateless logic run over every entity holding the components it needs.
pub trait System {
    /// Acquire display/audio handles. Runs once before the first tick.
    fn start(&mut self, _world: &mut hecs::World, _ctx: &mut Ctx<'_>) -> Result<(), PetError> {
        Ok(())
    }

    /// 60 Hz phase.
    fn update(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>);

    /// 1 Hz phase.
    fn update_per_second(&mut self, _world: &mut hecs::World, _ctx: &mut Ctx<'_>) {}
}

/// Owns the world and drives every system in a fixed order:
/// physics, input, movement, rendering, audio.
pub struct Simulation {
    world: hecs::World,
    rng: fastrand::Rng,
    clock: FixedScheduler,
    physics: PhysicsSystem,
    input: InputSystem,
    movement: MovementSystem,
    rendering: RenderingSystem,
    audio: AudioSystem,
    timers: SystemTimers,
    tick_count: u64,
}

impl Simulation {
    pub fn new(world: hecs::World, rng: fastrand::Rng) -> Self {
        Self {
            world,
            rng,
            clock: FixedScheduler::new(),
            physics: PhysicsSystem,
            input: InputSystem::default(),
            movement: MovementSystem,
            rendering: RenderingSystem,
            audio: AudioSystem,
            timers: SystemTimers::new(),
            tick_count: 0,
        }
    }

    #[cfg(test)]
    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Start every system in order, stopping at the first failure.
    pub fn start(&mut self, host: &mut dyn Host) -> Result<(), PetError> {
        let mut result = Ok(());
        self.each_system(host, |_, system, world, ctx, _| {
            if result.is_ok() {
                result = system.start(world, ctx);
            }
        });
        result
    }

    /// Run one 60 Hz tick.
    pub fn tick(&mut self, host: &mut dyn Host) {
        self.each_system(host, |phase, system, world, ctx, timers| {
            timers.begin();
            system.update(world, ctx);
            timers.end(phase);
        });
        self.tick_count += 1;
    }

    /// Run one 1 Hz phase.
    pub fn second(&mut self, host: &mut dyn Host) {
        self.each_system(host, |_, system, world, ctx, _| {
            system.update_per_second(world, ctx);
        });
    }

    /// Feed `dt` seconds of host time and run whatever it pays for.
    pub fn advance(&mut self, dt: f64, host: &mut dyn Host) -> Steps {
        let steps = self.clock.advance(dt);
        for _ in 0..steps.ticks {
            self.tick(host);
        }
        if steps.second {
            self.second(host);
        }
        steps
    }

    pub fn pointer_moved(&mut self, pointer: Vec2, host: &mut dyn Host) {
        self.input.on_pointer_moved(&mut self.world, host, pointer);
    }

    pub fn pointer_pressed(&mut self, pointer: Vec2, host: &mut dyn Host) {
        self.input.on_pointer_pressed(&mut self.world, host, pointer);
    }

    pub fn pointer_released(&mut self, pointer: Vec2, host: &mut dyn Host) {
        self.input.on_pointer_released(&mut self.world, host, pointer);
    }

    fn each_system(
        &mut self,
        host: &mut dyn Host,
        mut f: impl FnMut(SystemPhase, &mut dyn System, &mut hecs::World, &mut Ctx<'_>, &mut SystemTimers),
    ) {
        let Self {
            world,
            rng,
            physics,
            input,
            movement,
            rendering,
            audio,
            timers,
            ..
        } = self;

        let systems: [(SystemPhase, &mut dyn System); 5] = [
            (SystemPhase::Physics, physics),
            (SystemPhase::Input, input),
            (SystemPhase::Movement, movement),
            (SystemPhase::Rendering, rendering),
            (SystemPhase::Audio, audio),
        ];
        let mut ctx = Ctx { rng, host };

        for (phase, system) in systems {
            f(phase, system, world, &mut ctx, timers);
        }
    }
}
