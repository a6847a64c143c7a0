use glam::Vec2;

use crate::ecs::components::{Input, Movement, Physics};
use crate::ecs::systems::{Ctx, System};

/// Empirical drag-to-velocity divisor.
pub const THROW_DRAG_SCALE: f32 = 2.5;
/// Per-axis cap on the throw speed, in px/s.
pub const THROW_MAX_SPEED: f32 = 5000.0;
/// Per-tick speed multiplier while a throw slides out.
pub const THROW_DECELERATION: f32 = 0.98;

const TICKS_PER_SECOND: f32 = 60.0;
const TICK_SECONDS: f32 = 1.0 / TICKS_PER_SECOND;

/// Orientation smoothing, drag accumulation and throw derivation.
#[derive(Debug, Default)]
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn update(&mut self, world: &mut hecs::World, _ctx: &mut Ctx<'_>) {
        for (_, physics) in world.query_mut::<&mut Physics>() {
            physics.smooth_direction +=
                (physics.direction - physics.smooth_direction) * physics.smoothness;
        }

        for (entity, (physics, input, movement)) in
            world.query_mut::<(&mut Physics, &Input, &mut Movement)>()
        {
            if !physics.enabled {
                continue;
            }

            if input.is_grabbing {
                accumulate_drag(physics, input.last_mouse_position);
            } else {
                release(physics, movement);
                log::debug!(
                    "{entity:?} released: speed={:?} auto_walk={}",
                    movement.speed,
                    movement.auto_walk
                );
            }
        }
    }
}

/// Add this tick's pointer displacement to the drag integral.
fn accumulate_drag(physics: &mut Physics, pointer: Vec2) {
    if pointer != Vec2::ZERO {
        if let Some(last) = physics.last_pointer {
            physics.drag_offset += pointer - last;
        }
        physics.last_pointer = Some(pointer);
    }
    physics.drag_time += TICK_SECONDS;
}

/// Per-tick throw speed for a drag of `offset` pixels over `seconds`.
pub fn throw_speed(offset: Vec2, seconds: f32) -> Vec2 {
    let per_second = offset / THROW_DRAG_SCALE / seconds;
    per_second.clamp(Vec2::splat(-THROW_MAX_SPEED), Vec2::splat(THROW_MAX_SPEED)) / TICKS_PER_SECOND
}

/// Turn a finished drag into a throw, or hand straight back to wandering when
/// the pointer never moved.
fn release(physics: &mut Physics, movement: &mut Movement) {
    if physics.drag_offset != Vec2::ZERO && physics.drag_time > 0.0 {
        movement.speed = throw_speed(physics.drag_offset, physics.drag_time);
        movement.is_moving = true;
        movement.deceleration = THROW_DECELERATION;
    } else {
        movement.speed = Vec2::ZERO;
        movement.is_moving = false;
        movement.deceleration = 0.0;
    }
    movement.auto_walk = false;

    physics.reset_drag();
    physics.enabled = false;
}
