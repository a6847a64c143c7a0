use crate::config::PetConfig;
use crate::ecs::components::*;

/// Spawn the slime with every component it needs, ready for `Simulation::start`.
pub fn spawn_slime(world: &mut hecs::World, config: &PetConfig) -> hecs::Entity {
    world.spawn((
        Position(config.spawn),
        Movement::default(),
        Physics::default(),
        Input::draggable(),
        Sprite::new(
            config.sprite_size,
            config.idle_sprite.clone(),
            config.walk_sprite.clone(),
        ),
        Audio::new(config.walking_sounds.clone()),
    ))
}
