use std::path::PathBuf;

use glam::Vec2;

use crate::host::{ImageHandle, PlayerHandle, SpriteHandle};

/// Smoothing factor applied to the orientation each tick.
pub const DEFAULT_SMOOTHNESS: f32 = 0.2;

/// Top-left corner of the creature in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Wandering and inertial movement state.
#[derive(Debug, Clone, Copy)]
pub struct Movement {
    /// Displacement per tick, in pixels.
    pub speed: Vec2,
    /// Pixels left to walk in the current wander segment.
    pub distance_to_change_direction: f32,
    /// Whole seconds left before a new wander segment may be drawn.
    pub seconds_to_change_direction: u32,
    pub is_moving: bool,
    /// Wander state machine in control. Cleared while a throw decays.
    pub auto_walk: bool,
    /// Per-tick speed multiplier after a throw; 0 when no throw is active.
    pub deceleration: f32,
    pub enabled: bool,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            speed: Vec2::ZERO,
            distance_to_change_direction: 0.0,
            seconds_to_change_direction: 0,
            is_moving: false,
            auto_walk: true,
            deceleration: 0.0,
            enabled: true,
        }
    }
}

/// Drag-and-throw state plus the smoothed orientation shown while dragged.
#[derive(Debug, Clone, Copy)]
pub struct Physics {
    /// Set on grab, cleared once the release has been turned into a throw.
    pub enabled: bool,
    /// Orientation target in degrees, 0 = up, clockwise.
    pub direction: f32,
    /// In (0, 1). Fraction of the remaining gap closed each tick.
    pub smoothness: f32,
    pub smooth_direction: f32,
    /// Pointer displacement accumulated during the current drag.
    pub drag_offset: Vec2,
    /// Seconds spent dragging.
    pub drag_time: f32,
    /// Pointer sample from the previous physics tick.
    pub last_pointer: Option<Vec2>,
}

impl Physics {
    pub fn reset_drag(&mut self) {
        self.drag_offset = Vec2::ZERO;
        self.drag_time = 0.0;
        self.last_pointer = None;
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: 0.0,
            smoothness: DEFAULT_SMOOTHNESS,
            smooth_direction: 0.0,
            drag_offset: Vec2::ZERO,
            drag_time: 0.0,
            last_pointer: None,
        }
    }
}

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Input {
    /// True between a press on the sprite and the next release.
    pub is_grabbing: bool,
    pub is_draggable: bool,
    /// Latest pointer location seen by this entity.
    pub last_mouse_position: Vec2,
}

impl Input {
    pub fn draggable() -> Self {
        Self {
            is_draggable: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    #[default]
    Idle,
    Walk,
}

/// Decoded idle/walk images, loaded once at start.
#[derive(Debug, Clone, Copy)]
pub struct SpriteImages {
    pub idle: ImageHandle,
    pub walk: ImageHandle,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    pub idle_source: PathBuf,
    pub walk_source: PathBuf,
    pub images: Option<SpriteImages>,
    /// Display element, acquired at start.
    pub element: Option<SpriteHandle>,
    pub current: Animation,
    /// `Movement::is_moving` as of the previous render, for edge detection.
    pub previous_is_moving: bool,
}

impl Sprite {
    pub fn new(size: Vec2, idle_source: PathBuf, walk_source: PathBuf) -> Self {
        Self {
            width: size.x,
            height: size.y,
            idle_source,
            walk_source,
            images: None,
            element: None,
            current: Animation::Idle,
            previous_is_moving: false,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether `point` falls inside the sprite drawn with its corner at `top_left`.
    pub fn contains(&self, top_left: Vec2, point: Vec2) -> bool {
        let rel = point - top_left;
        rel.x >= 0.0 && rel.y >= 0.0 && rel.x < self.width && rel.y < self.height
    }
}

/// Ambient sound set played while the creature walks.
#[derive(Debug, Clone)]
pub struct Audio {
    pub sound_folder: PathBuf,
    pub player: Option<PlayerHandle>,
}

impl Audio {
    pub fn new(sound_folder: PathBuf) -> Self {
        Self {
            sound_folder,
            player: None,
        }
    }
}
