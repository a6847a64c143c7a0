use crate::ecs::components::{Animation, Movement, Position, Sprite, SpriteImages};
use crate::ecs::systems::{Ctx, System};
use crate::error::PetError;

/// Mirrors simulation state onto the display: position every tick, animation
/// swaps on idle/walk transitions only.
#[derive(Debug, Default)]
pub struct RenderingSystem;

impl System for RenderingSystem {
    fn start(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) -> Result<(), PetError> {
        for (entity, (sprite, pos)) in world.query_mut::<(&mut Sprite, Option<&Position>)>() {
            let images = SpriteImages {
                idle: ctx.host.load_image(&sprite.idle_source)?,
                walk: ctx.host.load_image(&sprite.walk_source)?,
            };
            let element = ctx.host.add_sprite(sprite.size(), images.idle, Animation::Idle)?;
            if let Some(pos) = pos {
                ctx.host.set_position(element, pos.0);
            }

            sprite.images = Some(images);
            sprite.element = Some(element);
            sprite.current = Animation::Idle;
            log::info!(
                "{entity:?} sprite {}x{} from {}",
                sprite.width,
                sprite.height,
                sprite.idle_source.display()
            );
        }
        Ok(())
    }

    fn update(&mut self, world: &mut hecs::World, ctx: &mut Ctx<'_>) {
        for (_, (sprite, pos, movement)) in
            world.query_mut::<(&mut Sprite, &Position, &Movement)>()
        {
            let (Some(element), Some(images)) = (sprite.element, sprite.images) else {
                continue;
            };

            ctx.host.set_position(element, pos.0);

            if movement.is_moving == sprite.previous_is_moving {
                continue;
            }
            sprite.previous_is_moving = movement.is_moving;

            let (animation, image) = if movement.is_moving {
                (Animation::Walk, images.walk)
            } else {
                (Animation::Idle, images.idle)
            };
            ctx.host.set_animation(element, image, animation);
            sprite.current = animation;
            log::debug!("Animation -> {animation:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::host::fake::RecordingHost;
    use crate::host::SpriteHandle;

    fn started() -> (hecs::World, hecs::Entity, RecordingHost) {
        let mut world = hecs::World::new();
        let e = world.spawn((
            Position(Vec2::new(10.0, 20.0)),
            Movement::default(),
            Sprite::new(Vec2::new(98.0, 98.0), "idle.gif".into(), "walk.gif".into()),
        ));
        let mut host = RecordingHost::new(800.0, 600.0);
        let mut rng = fastrand::Rng::with_seed(1);
        RenderingSystem
            .start(&mut world, &mut Ctx { rng: &mut rng, host: &mut host })
            .unwrap();
        (world, e, host)
    }

    fn render(world: &mut hecs::World, host: &mut RecordingHost) {
        let mut rng = fastrand::Rng::with_seed(1);
        RenderingSystem.update(world, &mut Ctx { rng: &mut rng, host });
    }

    #[test]
    fn start_places_idle_sprite() {
        let (world, e, host) = started();

        let sprite = world.get::<&Sprite>(e).unwrap();
        assert_eq!(sprite.element, Some(SpriteHandle(0)));
        assert_eq!(host.images.len(), 2);
        let shown = host.sprite(SpriteHandle(0));
        assert_eq!(shown.size, Vec2::new(98.0, 98.0));
        assert_eq!(shown.position, Vec2::new(10.0, 20.0));
        assert_eq!(shown.animation, Animation::Idle);
    }

    #[test]
    fn missing_image_fails_start() {
        let mut world = hecs::World::new();
        world.spawn((Sprite::new(Vec2::ONE, "idle.gif".into(), "gone.gif".into()),));
        let mut host = RecordingHost::new(800.0, 600.0);
        host.missing.push("gone.gif".into());
        let mut rng = fastrand::Rng::with_seed(1);

        let err = RenderingSystem
            .start(&mut world, &mut Ctx { rng: &mut rng, host: &mut host })
            .unwrap_err();
        assert!(matches!(err, PetError::MissingAsset(_)));
    }

    #[test]
    fn moving_transition_swaps_once() {
        let (mut world, e, mut host) = started();

        world.get::<&mut Movement>(e).unwrap().is_moving = true;
        for _ in 0..3 {
            render(&mut world, &mut host);
        }
        assert_eq!(host.swaps, vec![(SpriteHandle(0), Animation::Walk)]);

        world.get::<&mut Movement>(e).unwrap().is_moving = false;
        render(&mut world, &mut host);
        render(&mut world, &mut host);
        assert_eq!(
            host.swaps,
            vec![(SpriteHandle(0), Animation::Walk), (SpriteHandle(0), Animation::Idle)]
        );
        assert_eq!(world.get::<&Sprite>(e).unwrap().current, Animation::Idle);
    }

    #[test]
    fn position_follows_simulation_every_tick() {
        let (mut world, e, mut host) = started();

        world.get::<&mut Position>(e).unwrap().0 = Vec2::new(300.0, 250.0);
        render(&mut world, &mut host);

        assert_eq!(host.sprite(SpriteHandle(0)).position, Vec2::new(300.0, 250.0));
        assert!(host.swaps.is_empty());
    }
}
