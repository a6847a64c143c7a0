//! Contracts for the collaborators the simulation drives: the window that
//! shows sprites and delivers the pointer, and the audio output.
//!
//! Systems only ever see these traits, so the whole simulation runs headless
//! under [`fake::RecordingHost`] in tests.

use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::ecs::components::Animation;
use crate::error::PetError;

/// A decoded (possibly animated) image owned by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle(pub u32);

/// A sprite element placed on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHandle(pub u32);

/// An audio player; reopened with a new clip on every play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    /// Hovering a draggable sprite.
    Hand,
    /// Dragging.
    Move,
}

pub trait Display {
    /// Drawable area in pixels.
    fn screen_size(&self) -> Vec2;

    fn load_image(&mut self, source: &Path) -> Result<ImageHandle, PetError>;

    /// Place a new sprite element showing `image`.
    fn add_sprite(
        &mut self,
        size: Vec2,
        image: ImageHandle,
        animation: Animation,
    ) -> Result<SpriteHandle, PetError>;

    /// Move the element's top-left corner.
    fn set_position(&mut self, sprite: SpriteHandle, position: Vec2);

    /// Rotate the element by `degrees` (clockwise) about `pivot`, which is
    /// relative to the element's top-left corner.
    fn set_rotation(&mut self, sprite: SpriteHandle, degrees: f32, pivot: Vec2);

    /// Swap the animated source, restart it and loop it forever.
    fn set_animation(&mut self, sprite: SpriteHandle, image: ImageHandle, animation: Animation);

    /// Route every pointer event to the window until released.
    fn capture_pointer(&mut self, capture: bool);

    fn set_cursor(&mut self, cursor: CursorShape);

    /// Make the whole window hit-testable while a drag is in progress.
    fn set_grab_backdrop(&mut self, active: bool);
}

pub trait AudioOut {
    fn create_player(&mut self) -> Result<PlayerHandle, PetError>;

    /// Candidate clips in `folder`.
    fn list_clips(&mut self, folder: &Path) -> Result<Vec<PathBuf>, PetError>;

    /// Open `clip` on `player` and play it to completion. Fire-and-forget.
    fn play(&mut self, player: PlayerHandle, clip: &Path);
}

/// Everything a system may call during a phase.
pub trait Host: Display + AudioOut {}

impl<T: Display + AudioOut + ?Sized> Host for T {}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Clone)]
    pub struct FakeSprite {
        pub size: Vec2,
        pub position: Vec2,
        pub rotation: f32,
        pub pivot: Vec2,
        pub image: ImageHandle,
        pub animation: Animation,
    }

    /// Headless host that records every call.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub screen: Vec2,
        pub images: Vec<PathBuf>,
        pub sprites: Vec<FakeSprite>,
        /// Every `set_animation` call, in order.
        pub swaps: Vec<(SpriteHandle, Animation)>,
        pub captured: bool,
        pub cursor: CursorShape,
        pub backdrop: bool,
        pub players: u32,
        pub folders: HashMap<PathBuf, Vec<PathBuf>>,
        pub played: Vec<(PlayerHandle, PathBuf)>,
        /// Paths that fail to load.
        pub missing: Vec<PathBuf>,
    }

    impl RecordingHost {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                screen: Vec2::new(width, height),
                ..Default::default()
            }
        }

        pub fn with_folder(mut self, folder: &str, clips: &[&str]) -> Self {
            let folder = PathBuf::from(folder);
            let clips = clips.iter().map(|c| folder.join(c)).collect();
            self.folders.insert(folder, clips);
            self
        }

        pub fn sprite(&self, handle: SpriteHandle) -> &FakeSprite {
            &self.sprites[handle.0 as usize]
        }
    }

    impl Display for RecordingHost {
        fn screen_size(&self) -> Vec2 {
            self.screen
        }

        fn load_image(&mut self, source: &Path) -> Result<ImageHandle, PetError> {
            if self.missing.iter().any(|m| m == source) {
                return Err(PetError::MissingAsset(source.to_path_buf()));
            }
            self.images.push(source.to_path_buf());
            Ok(ImageHandle(self.images.len() as u32 - 1))
        }

        fn add_sprite(
            &mut self,
            size: Vec2,
            image: ImageHandle,
            animation: Animation,
        ) -> Result<SpriteHandle, PetError> {
            self.sprites.push(FakeSprite {
                size,
                position: Vec2::ZERO,
                rotation: 0.0,
                pivot: Vec2::ZERO,
                image,
                animation,
            });
            Ok(SpriteHandle(self.sprites.len() as u32 - 1))
        }

        fn set_position(&mut self, sprite: SpriteHandle, position: Vec2) {
            self.sprites[sprite.0 as usize].position = position;
        }

        fn set_rotation(&mut self, sprite: SpriteHandle, degrees: f32, pivot: Vec2) {
            let s = &mut self.sprites[sprite.0 as usize];
            s.rotation = degrees;
            s.pivot = pivot;
        }

        fn set_animation(&mut self, sprite: SpriteHandle, image: ImageHandle, animation: Animation) {
            let s = &mut self.sprites[sprite.0 as usize];
            s.image = image;
            s.animation = animation;
            self.swaps.push((sprite, animation));
        }

        fn capture_pointer(&mut self, capture: bool) {
            self.captured = capture;
        }

        fn set_cursor(&mut self, cursor: CursorShape) {
            self.cursor = cursor;
        }

        fn set_grab_backdrop(&mut self, active: bool) {
            self.backdrop = active;
        }
    }

    impl AudioOut for RecordingHost {
        fn create_player(&mut self) -> Result<PlayerHandle, PetError> {
            self.players += 1;
            Ok(PlayerHandle(self.players - 1))
        }

        fn list_clips(&mut self, folder: &Path) -> Result<Vec<PathBuf>, PetError> {
            self.folders
                .get(folder)
                .cloned()
                .ok_or_else(|| PetError::SoundFolder {
                    path: folder.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        }

        fn play(&mut self, player: PlayerHandle, clip: &Path) {
            self.played.push((player, clip.to_path_buf()));
        }
    }
}
