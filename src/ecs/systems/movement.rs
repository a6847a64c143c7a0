use std::ops::Range;

use glam::Vec2;

use crate::ecs::components::{Input, Movement, Position, Sprite};
use crate::ecs::systems::{Ctx, System};
use crate::error::PetError;

/// Both speed axes must drop under this (px/tick) before a throw hands control
/// back to the wander state machine.
const RESUME_WANDER_SPEED: f32 = 2.0;
/// Per-axis wander speed magnitude in px/tick (upper bound exclusive).
const WANDER_SPEED: Range<u32> = 1..3;
/// Pixels walked per wander segment.
const WANDER_DISTANCE: Range<u32> = 100..600;
/// Seconds before the next segment may start.
const WANDER_SECONDS: Range<u32> = 10..15;

/// Position integration, random wandering, throw decay and screen bounds.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn start(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) -> Result<(), PetError> {
        for (_, movement) in world.query_mut::<&mut Movement>() {
            movement.distance_to_change_direction = 0.0;
            movement.seconds_to_change_direction = 0;
            if movement.auto_walk {
                wander(movement, ctx.rng);
            }
        }
        Ok(())
    }

    fn update(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) {
        let screen = ctx.host.screen_size();

        for (_, (pos, movement, sprite, input)) in world.query_mut::<(
            &mut Position,
            &mut Movement,
            Option<&Sprite>,
            Option<&Input>,
        )>() {
            if !movement.enabled {
                continue;
            }

            match input {
                Some(input) if input.is_grabbing => {
                    // Hang from the pointer by the sprite's center
                    let half = sprite.map_or(Vec2::ZERO, |s| s.size() * 0.5);
                    pos.0 = input.last_mouse_position - half;
                    movement.is_moving = false;
                }
                _ => integrate(pos, movement, ctx.rng),
            }

            if let Some(sprite) = sprite {
                keep_on_screen(pos, movement, sprite.size(), screen);
            }
        }
    }

    fn update_per_second(&mut self, world: &mut hecs::World, _ctx: &mut Ctx<'_>) {
        for (_, (movement, input)) in world.query_mut::<(&mut Movement, Option<&Input>)>() {
            // Wandering is frozen while dragged
            if input.is_some_and(|input| input.is_grabbing) {
                continue;
            }
            if movement.distance_to_change_direction <= 0.0
                && movement.seconds_to_change_direction > 0
            {
                movement.seconds_to_change_direction -= 1;
            }
        }
    }
}

/// One free-moving step: apply speed, decay a throw, run the wander machine.
fn integrate(pos: &mut Position, movement: &mut Movement, rng: &mut fastrand::Rng) {
    if movement.is_moving {
        pos.0 += movement.speed;
    }

    if movement.deceleration > 0.0 {
        movement.speed *= movement.deceleration;
    }

    if !movement.auto_walk
        && movement.speed.x.abs() < RESUME_WANDER_SPEED
        && movement.speed.y.abs() < RESUME_WANDER_SPEED
    {
        movement.deceleration = 0.0;
        movement.auto_walk = true;
        movement.distance_to_change_direction = 0.0;
        log::debug!("Throw settled, wander resumes");
    }

    if movement.auto_walk {
        wander(movement, rng);
    }
}

/// Wander state machine. Draws a new segment once both counters are spent,
/// walks while both remain, and stands still while only the timer remains.
fn wander(movement: &mut Movement, rng: &mut fastrand::Rng) {
    let distance = movement.distance_to_change_direction;
    let seconds = movement.seconds_to_change_direction;

    if distance <= 0.0 && seconds == 0 {
        movement.speed = Vec2::new(random_signed(rng), random_signed(rng));
        movement.distance_to_change_direction = rng.u32(WANDER_DISTANCE) as f32;
        movement.seconds_to_change_direction = rng.u32(WANDER_SECONDS);
        log::debug!(
            "New wander segment: speed={:?} distance={} seconds={}",
            movement.speed,
            movement.distance_to_change_direction,
            movement.seconds_to_change_direction,
        );
    } else if seconds > 0 && distance > 0.0 {
        movement.is_moving = true;
        // Distance is consumed along the dominant axis
        let step = movement.speed.x.abs().max(movement.speed.y.abs());
        movement.distance_to_change_direction = (distance - step).max(0.0);
    } else {
        movement.is_moving = false;
    }
}

fn random_signed(rng: &mut fastrand::Rng) -> f32 {
    let magnitude = rng.u32(WANDER_SPEED) as f32;
    if rng.bool() {
        magnitude
    } else {
        -magnitude
    }
}

/// Clamp the sprite inside the screen and bounce its speed off the edge hit.
fn keep_on_screen(pos: &mut Position, movement: &mut Movement, size: Vec2, screen: Vec2) {
    let max = (screen - size).max(Vec2::ZERO);

    if pos.0.x < 0.0 {
        pos.0.x = 0.0;
        movement.speed.x = movement.speed.x.abs();
    } else if pos.0.x > max.x {
        pos.0.x = max.x;
        movement.speed.x = -movement.speed.x.abs();
    }

    if pos.0.y < 0.0 {
        pos.0.y = 0.0;
        movement.speed.y = movement.speed.y.abs();
    } else if pos.0.y > max.y {
        pos.0.y = max.y;
        movement.speed.y = -movement.speed.y.abs();
    }
}
