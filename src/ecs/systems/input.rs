use glam::Vec2;

use crate::ecs::components::{Input, Movement, Physics, Position, Sprite};
use crate::ecs::systems::{Ctx, System};
use crate::host::{CursorShape, Host};

/// Screen-space heading of a drag step in degrees: 0 = up, 90 = right.
pub fn drag_angle(delta: Vec2) -> f32 {
    delta.x.atan2(-delta.y).to_degrees()
}

/// Routes raw pointer events to entities and tracks the pointer between ticks.
///
/// Events arrive between ticks on the same thread, so everything here mutates
/// components directly.
#[derive(Debug, Default)]
pub struct InputSystem {
    /// Latest pointer location from any event.
    pointer: Vec2,
    /// Pointer location at the previous tick, for the stall check.
    last_tick_pointer: Option<Vec2>,
    cursor: CursorShape,
}

impl InputSystem {
    pub fn on_pointer_moved(&mut self, world: &mut hecs::World, host: &mut dyn Host, pointer: Vec2) {
        self.pointer = pointer;
        let mut hovering = false;
        let mut grabbing = false;

        for (_, (input, pos, sprite, physics, movement)) in world.query_mut::<(
            &mut Input,
            &Position,
            Option<&Sprite>,
            Option<&mut Physics>,
            Option<&mut Movement>,
        )>() {
            if input.is_grabbing {
                grabbing = true;
                let delta = pointer - input.last_mouse_position;
                if delta != Vec2::ZERO {
                    if let Some(physics) = physics {
                        physics.direction = drag_angle(delta);
                    }
                }
                if let Some(movement) = movement {
                    movement.is_moving = true;
                }
            } else if input.is_draggable && sprite.is_some_and(|s| s.contains(pos.0, pointer)) {
                hovering = true;
            }
            input.last_mouse_position = pointer;
        }

        if !grabbing {
            let cursor = if hovering {
                CursorShape::Hand
            } else {
                CursorShape::Default
            };
            self.set_cursor(host, cursor);
        }
    }

    pub fn on_pointer_pressed(&mut self, world: &mut hecs::World, host: &mut dyn Host, pointer: Vec2) {
        self.pointer = pointer;
        let mut grabbed = None;

        for (entity, (input, pos, sprite, physics)) in
            world.query_mut::<(&mut Input, &Position, &Sprite, Option<&mut Physics>)>()
        {
            if !input.is_draggable || input.is_grabbing || !sprite.contains(pos.0, pointer) {
                continue;
            }

            input.is_grabbing = true;
            input.last_mouse_position = pointer;
            if let Some(physics) = physics {
                physics.enabled = true;
                physics.reset_drag();
            }
            grabbed = Some(entity);
            // One sprite per press
            break;
        }

        if let Some(entity) = grabbed {
            log::debug!("Grabbed {entity:?} at {pointer:?}");
            host.capture_pointer(true);
            host.set_grab_backdrop(true);
            self.set_cursor(host, CursorShape::Move);
        }
    }

    pub fn on_pointer_released(&mut self, world: &mut hecs::World, host: &mut dyn Host, pointer: Vec2) {
        self.pointer = pointer;
        let mut released = false;

        for (entity, (input, physics)) in world.query_mut::<(&mut Input, Option<&mut Physics>)>() {
            if !input.is_grabbing {
                continue;
            }

            input.is_grabbing = false;
            input.last_mouse_position = pointer;
            if let Some(physics) = physics {
                physics.direction = 0.0;
                physics.smooth_direction = 0.0;
            }
            released = true;
            log::debug!("Released {entity:?} at {pointer:?}");
        }

        if released {
            host.capture_pointer(false);
            host.set_grab_backdrop(false);
            self.set_cursor(host, CursorShape::Default);
        }
    }

    fn set_cursor(&mut self, host: &mut dyn Host, cursor: CursorShape) {
        if self.cursor != cursor {
            self.cursor = cursor;
            host.set_cursor(cursor);
        }
    }
}

impl System for InputSystem {
    fn update(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) {
        // A held-still pointer must not leave a stale heading behind
        let stalled = self.last_tick_pointer == Some(self.pointer);
        self.last_tick_pointer = Some(self.pointer);

        if stalled {
            for (_, (input, physics, movement)) in
                world.query_mut::<(&Input, Option<&mut Physics>, Option<&mut Movement>)>()
            {
                if !input.is_grabbing {
                    continue;
                }
                if let Some(physics) = physics {
                    physics.direction = 0.0;
                }
                if let Some(movement) = movement {
                    movement.distance_to_change_direction = 0.0;
                }
            }
        }

        for (_, (physics, sprite)) in world.query_mut::<(&Physics, &Sprite)>() {
            if let Some(element) = sprite.element {
                ctx.host
                    .set_rotation(element, physics.smooth_direction, sprite.size() * 0.5);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::RecordingHost;
    use crate::host::SpriteHandle;

    fn slime_at(world: &mut hecs::World, corner: Vec2) -> hecs::Entity {
        let mut sprite = Sprite::new(Vec2::new(98.0, 98.0), "idle".into(), "walk".into());
        sprite.element = Some(SpriteHandle(0));
        world.spawn((
            Position(corner),
            Movement::default(),
            Physics::default(),
            Input::draggable(),
            sprite,
        ))
    }

    #[test]
    fn drag_angle_is_screen_space() {
        assert!(drag_angle(Vec2::new(0.0, -1.0)).abs() < 1e-4);
        assert!((drag_angle(Vec2::new(1.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((drag_angle(Vec2::new(0.0, 1.0)).abs() - 180.0).abs() < 1e-4);
        assert!((drag_angle(Vec2::new(-1.0, 0.0)) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn press_on_sprite_grabs() {
        let mut world = hecs::World::new();
        let e = slime_at(&mut world, Vec2::new(100.0, 100.0));
        {
            // Leftovers from an earlier drag
            let mut physics = world.get::<&mut Physics>(e).unwrap();
            physics.drag_offset = Vec2::new(40.0, -12.0);
            physics.drag_time = 0.75;
            physics.last_pointer = Some(Vec2::new(20.0, 20.0));
        }
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut input = InputSystem::default();

        input.on_pointer_pressed(&mut world, &mut host, Vec2::new(150.0, 150.0));

        assert!(world.get::<&Input>(e).unwrap().is_grabbing);
        let physics = *world.get::<&Physics>(e).unwrap();
        assert!(physics.enabled);
        assert_eq!(physics.drag_offset, Vec2::ZERO);
        assert_eq!(physics.drag_time, 0.0);
        assert_eq!(physics.last_pointer, None);
        assert!(host.captured);
        assert!(host.backdrop);
        assert_eq!(host.cursor, CursorShape::Move);
    }

    #[test]
    fn press_off_sprite_or_on_fixed_sprite_does_not_grab() {
        let mut world = hecs::World::new();
        let free = slime_at(&mut world, Vec2::new(100.0, 100.0));
        let fixed = slime_at(&mut world, Vec2::new(400.0, 100.0));
        world.get::<&mut Input>(fixed).unwrap().is_draggable = false;
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut input = InputSystem::default();

        input.on_pointer_pressed(&mut world, &mut host, Vec2::new(10.0, 10.0));
        input.on_pointer_pressed(&mut world, &mut host, Vec2::new(450.0, 150.0));

        assert!(!world.get::<&Input>(free).unwrap().is_grabbing);
        assert!(!world.get::<&Input>(fixed).unwrap().is_grabbing);
        assert!(!world.get::<&Physics>(fixed).unwrap().enabled);
        assert!(!host.captured);
    }

    #[test]
    fn drag_motion_sets_heading_and_release_clears_it() {
        let mut world = hecs::World::new();
        let e = slime_at(&mut world, Vec2::new(100.0, 100.0));
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut input = InputSystem::default();

        input.on_pointer_pressed(&mut world, &mut host, Vec2::new(150.0, 150.0));
        input.on_pointer_moved(&mut world, &mut host, Vec2::new(160.0, 150.0));

        assert!((world.get::<&Physics>(e).unwrap().direction - 90.0).abs() < 1e-4);
        assert!(world.get::<&Movement>(e).unwrap().is_moving);
        assert_eq!(world.get::<&Input>(e).unwrap().last_mouse_position, Vec2::new(160.0, 150.0));

        input.on_pointer_released(&mut world, &mut host, Vec2::new(160.0, 150.0));

        assert!(!world.get::<&Input>(e).unwrap().is_grabbing);
        assert_eq!(world.get::<&Physics>(e).unwrap().direction, 0.0);
        assert!(!host.captured);
        assert!(!host.backdrop);
        assert_eq!(host.cursor, CursorShape::Default);
    }

    #[test]
    fn still_pointer_zeroes_heading_and_distance() {
        let mut world = hecs::World::new();
        let e = slime_at(&mut world, Vec2::new(100.0, 100.0));
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut rng = fastrand::Rng::with_seed(1);
        let mut input = InputSystem::default();

        input.on_pointer_pressed(&mut world, &mut host, Vec2::new(150.0, 150.0));
        input.on_pointer_moved(&mut world, &mut host, Vec2::new(150.0, 140.0));
        world.get::<&mut Movement>(e).unwrap().distance_to_change_direction = 42.0;

        // First tick samples the pointer, second sees it unchanged
        input.update(&mut world, &mut Ctx { rng: &mut rng, host: &mut host });
        assert!(world.get::<&Physics>(e).unwrap().direction.abs() < 1e-4);
        assert_eq!(world.get::<&Movement>(e).unwrap().distance_to_change_direction, 42.0);

        input.on_pointer_moved(&mut world, &mut host, Vec2::new(160.0, 140.0));
        input.update(&mut world, &mut Ctx { rng: &mut rng, host: &mut host });
        assert!((world.get::<&Physics>(e).unwrap().direction - 90.0).abs() < 1e-4);

        input.update(&mut world, &mut Ctx { rng: &mut rng, host: &mut host });
        assert_eq!(world.get::<&Physics>(e).unwrap().direction, 0.0);
        assert_eq!(world.get::<&Movement>(e).unwrap().distance_to_change_direction, 0.0);
    }

    #[test]
    fn hover_switches_cursor() {
        let mut world = hecs::World::new();
        slime_at(&mut world, Vec2::new(100.0, 100.0));
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut input = InputSystem::default();

        input.on_pointer_moved(&mut world, &mut host, Vec2::new(120.0, 120.0));
        assert_eq!(host.cursor, CursorShape::Hand);

        input.on_pointer_moved(&mut world, &mut host, Vec2::new(20.0, 20.0));
        assert_eq!(host.cursor, CursorShape::Default);
    }

    #[test]
    fn smoothed_heading_is_applied_about_center() {
        let mut world = hecs::World::new();
        let e = slime_at(&mut world, Vec2::new(100.0, 100.0));
        world.get::<&mut Physics>(e).unwrap().smooth_direction = 30.0;
        let mut host = RecordingHost::new(800.0, 600.0);
        host.sprites.push(crate::host::fake::FakeSprite {
            size: Vec2::new(98.0, 98.0),
            position: Vec2::ZERO,
            rotation: 0.0,
            pivot: Vec2::ZERO,
            image: crate::host::ImageHandle(0),
            animation: crate::ecs::components::Animation::Idle,
        });
        let mut rng = fastrand::Rng::with_seed(1);

        InputSystem::default().update(&mut world, &mut Ctx { rng: &mut rng, host: &mut host });

        let sprite = host.sprite(SpriteHandle(0));
        assert_eq!(sprite.rotation, 30.0);
        assert_eq!(sprite.pivot, Vec2::new(49.0, 49.0));
    }
}
