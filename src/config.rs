use std::path::PathBuf;

use glam::Vec2;

use crate::assets;

/// Slime sprite edge length in pixels.
const SLIME_SIZE: f32 = 98.0;
const IDLE_SPRITE: &str = "assets/slime/sprites/idle.gif";
const WALK_SPRITE: &str = "assets/slime/sprites/walk.gif";
const WALKING_SOUNDS: &str = "assets/slime/sounds/walking";

/// How the creature is assembled. Paths are already resolved.
#[derive(Debug, Clone)]
pub struct PetConfig {
    /// Top-left corner at spawn.
    pub spawn: Vec2,
    pub sprite_size: Vec2,
    pub idle_sprite: PathBuf,
    pub walk_sprite: PathBuf,
    /// Folder of `*.wav` clips played while walking.
    pub walking_sounds: PathBuf,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            spawn: Vec2::ZERO,
            sprite_size: Vec2::splat(SLIME_SIZE),
            idle_sprite: assets::resolve(IDLE_SPRITE),
            walk_sprite: assets::resolve(WALK_SPRITE),
            walking_sounds: assets::resolve(WALKING_SOUNDS),
        }
    }
}
