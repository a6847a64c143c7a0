//! The real host: a transparent overlay window that keeps sprite elements in
//! memory and hands them to the GPU each frame.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::window::{CursorGrabMode, CursorIcon, Window};

use crate::assets;
use crate::ecs::components::Animation;
use crate::error::PetError;
use crate::host::{AudioOut, CursorShape, Display, ImageHandle, PlayerHandle, SpriteHandle};
use crate::render::instance::SlimeInstance;
use crate::sound::Speaker;

/// One placed sprite, as the window currently shows it.
#[derive(Debug, Clone)]
pub struct SpriteElement {
    /// Top-left corner in screen pixels.
    pub position: Vec2,
    pub size: Vec2,
    /// Clockwise, about `pivot`.
    pub rotation_deg: f32,
    /// Relative to the top-left corner.
    pub pivot: Vec2,
    pub animation: Animation,
    /// When the current animation was (re)started.
    pub started: Instant,
}

#[derive(Default)]
pub struct ShellHost {
    window: Option<Arc<Window>>,
    screen: Vec2,
    images: Vec<PathBuf>,
    sprites: Vec<SpriteElement>,
    players: u32,
    speaker: Speaker,
    backdrop: bool,
    cursor: CursorShape,
    /// Clicks fall through to the desktop unless the pointer is on a sprite.
    click_through: bool,
    /// Hit-test state last applied to the window.
    hit_test: Option<bool>,
}

impl ShellHost {
    pub fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();
        let speaker = Speaker::open();
        if speaker.is_open() {
            log::info!("Audio output ready");
        }
        Self {
            window: Some(window),
            screen: Vec2::new(size.width as f32, size.height as f32),
            speaker,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen = Vec2::new(width as f32, height as f32);
    }

    pub fn backdrop(&self) -> bool {
        self.backdrop
    }

    /// Let clicks outside the slime reach whatever is below the overlay.
    pub fn enable_click_through(&mut self) {
        self.click_through = true;
        self.sync_hit_test();
    }

    /// The window takes the pointer only while hovering or dragging a sprite.
    fn wants_hit_test(&self) -> bool {
        !self.click_through || self.backdrop || self.cursor != CursorShape::Default
    }

    fn sync_hit_test(&mut self) {
        let wanted = self.wants_hit_test();
        if self.hit_test == Some(wanted) {
            return;
        }
        self.hit_test = Some(wanted);
        log::debug!("Window hit-test {}", if wanted { "on" } else { "off" });
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_hittest(wanted) {
                log::warn!("Cannot change window hit-test: {e}");
            }
        }
    }

    /// Refill `out` with one instance per sprite element.
    pub fn build_instances(&self, out: &mut Vec<SlimeInstance>) {
        out.clear();
        out.extend(self.sprites.iter().map(|element| {
            let phase = element.started.elapsed().as_secs_f32();
            SlimeInstance::from_element(element, phase)
        }));
    }

    fn element_mut(&mut self, sprite: SpriteHandle) -> Option<&mut SpriteElement> {
        let element = self.sprites.get_mut(sprite.0 as usize);
        if element.is_none() {
            log::warn!("Unknown sprite {sprite:?}");
        }
        element
    }

    fn image_source(&self, image: ImageHandle) -> Result<&Path, PetError> {
        self.images
            .get(image.0 as usize)
            .map(PathBuf::as_path)
            .ok_or_else(|| PetError::Display(format!("unknown image {image:?}")))
    }
}

impl Display for ShellHost {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn load_image(&mut self, source: &Path) -> Result<ImageHandle, PetError> {
        assets::require_file(source)?;
        let handle = ImageHandle(self.images.len() as u32);
        log::debug!("Loaded image {} as {handle:?}", source.display());
        self.images.push(source.to_path_buf());
        Ok(handle)
    }

    fn add_sprite(
        &mut self,
        size: Vec2,
        image: ImageHandle,
        animation: Animation,
    ) -> Result<SpriteHandle, PetError> {
        self.image_source(image)?;
        let handle = SpriteHandle(self.sprites.len() as u32);
        self.sprites.push(SpriteElement {
            position: Vec2::ZERO,
            size,
            rotation_deg: 0.0,
            pivot: size * 0.5,
            animation,
            started: Instant::now(),
        });
        Ok(handle)
    }

    fn set_position(&mut self, sprite: SpriteHandle, position: Vec2) {
        if let Some(element) = self.element_mut(sprite) {
            element.position = position;
        }
    }

    fn set_rotation(&mut self, sprite: SpriteHandle, degrees: f32, pivot: Vec2) {
        if let Some(element) = self.element_mut(sprite) {
            element.rotation_deg = degrees;
            element.pivot = pivot;
        }
    }

    fn set_animation(&mut self, sprite: SpriteHandle, image: ImageHandle, animation: Animation) {
        match self.image_source(image) {
            Ok(source) => log::debug!("{sprite:?} plays {}", source.display()),
            Err(e) => {
                log::warn!("{e}");
                return;
            }
        }
        if let Some(element) = self.element_mut(sprite) {
            element.animation = animation;
            element.started = Instant::now();
        }
    }

    fn capture_pointer(&mut self, capture: bool) {
        let Some(window) = &self.window else { return };
        let mode = if capture {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(mode) {
            log::debug!("Cursor grab {mode:?} unsupported: {e}");
        }
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
        if let Some(window) = &self.window {
            let icon = match cursor {
                CursorShape::Default => CursorIcon::Default,
                CursorShape::Hand => CursorIcon::Pointer,
                CursorShape::Move => CursorIcon::Move,
            };
            window.set_cursor(icon);
        }
        self.sync_hit_test();
    }

    fn set_grab_backdrop(&mut self, active: bool) {
        self.backdrop = active;
        self.sync_hit_test();
    }
}

impl AudioOut for ShellHost {
    fn create_player(&mut self) -> Result<PlayerHandle, PetError> {
        let handle = PlayerHandle(self.players);
        self.players += 1;
        Ok(handle)
    }

    fn list_clips(&mut self, folder: &Path) -> Result<Vec<PathBuf>, PetError> {
        let clips = assets::list_clips(folder)?;
        log::info!("{} walking sound(s) in {}", clips.len(), folder.display());
        Ok(clips)
    }

    fn play(&mut self, player: PlayerHandle, clip: &Path) {
        log::debug!("Player {} plays {}", player.0, clip.display());
        self.speaker.play(player.0 as usize, clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_with_image() -> (ShellHost, ImageHandle) {
        let mut host = ShellHost::default();
        host.resize(800, 600);
        host.images.push(PathBuf::from("idle.gif"));
        (host, ImageHandle(0))
    }

    #[test]
    fn sprites_track_position_and_rotation() {
        let (mut host, image) = headless_with_image();
        let sprite = host
            .add_sprite(Vec2::splat(98.0), image, Animation::Idle)
            .unwrap();

        host.set_position(sprite, Vec2::new(10.0, 20.0));
        host.set_rotation(sprite, 45.0, Vec2::splat(49.0));

        let element = &host.sprites[0];
        assert_eq!(element.position, Vec2::new(10.0, 20.0));
        assert_eq!(element.rotation_deg, 45.0);
        assert_eq!(element.pivot, Vec2::splat(49.0));
        assert_eq!(host.screen_size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn animation_swap_restarts_clock() {
        let (mut host, image) = headless_with_image();
        let sprite = host
            .add_sprite(Vec2::splat(98.0), image, Animation::Idle)
            .unwrap();
        let before = host.sprites[0].started;

        std::thread::sleep(std::time::Duration::from_millis(2));
        host.set_animation(sprite, image, Animation::Walk);

        let element = &host.sprites[0];
        assert_eq!(element.animation, Animation::Walk);
        assert!(element.started > before);
    }

    #[test]
    fn swap_to_unknown_image_is_ignored() {
        let (mut host, image) = headless_with_image();
        let sprite = host
            .add_sprite(Vec2::splat(98.0), image, Animation::Idle)
            .unwrap();

        host.set_animation(sprite, ImageHandle(7), Animation::Walk);

        assert_eq!(host.sprites[0].animation, Animation::Idle);
    }

    #[test]
    fn unknown_image_is_rejected() {
        let mut host = ShellHost::default();
        let err = host
            .add_sprite(Vec2::splat(10.0), ImageHandle(3), Animation::Idle)
            .unwrap_err();
        assert!(matches!(err, PetError::Display(_)));
    }

    #[test]
    fn missing_image_file_is_an_error() {
        let mut host = ShellHost::default();
        let err = host
            .load_image(Path::new("/definitely/not/here.gif"))
            .unwrap_err();
        assert!(matches!(err, PetError::MissingAsset(_)));
    }

    #[test]
    fn instances_follow_sprites_and_backdrop_is_recorded() {
        let (mut host, image) = headless_with_image();
        host.add_sprite(Vec2::splat(98.0), image, Animation::Walk)
            .unwrap();
        host.set_grab_backdrop(true);

        let mut out = vec![SlimeInstance::from_element(&host.sprites[0], 0.0); 3];
        host.build_instances(&mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].frame, 1);
        assert!(host.backdrop());
    }

    #[test]
    fn hit_test_follows_hover_and_drag_when_click_through() {
        let mut host = ShellHost::default();
        host.enable_click_through();
        assert_eq!(host.hit_test, Some(false));

        host.set_cursor(CursorShape::Hand);
        assert_eq!(host.hit_test, Some(true));
        host.set_cursor(CursorShape::Default);
        assert_eq!(host.hit_test, Some(false));

        // Grab, then the pointer leaves the sprite mid-drag
        host.set_cursor(CursorShape::Hand);
        host.set_grab_backdrop(true);
        host.set_cursor(CursorShape::Move);
        assert_eq!(host.hit_test, Some(true));

        host.set_grab_backdrop(false);
        host.set_cursor(CursorShape::Default);
        assert_eq!(host.hit_test, Some(false));
    }

    #[test]
    fn without_click_through_the_window_always_hit_tests() {
        let mut host = ShellHost::default();
        host.set_cursor(CursorShape::Default);
        host.set_grab_backdrop(false);
        assert_eq!(host.hit_test, Some(true));
    }

    #[test]
    fn players_are_distinct_and_play_without_a_device() {
        let mut host = ShellHost::default();
        let a = host.create_player().unwrap();
        let b = host.create_player().unwrap();
        assert_ne!(a, b);
        host.play(b, Path::new("squish1.wav"));
    }
}
