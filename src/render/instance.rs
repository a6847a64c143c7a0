use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::ecs::components::Animation;
use crate::shell::SpriteElement;

/// Body color of the slime (RGBA).
const SLIME_COLOR: u32 = 0x6C_D8_7A_FF;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SlimeInstance {
    /// Screen position of the quad center (x, y).
    pub center: [f32; 2],
    /// Quad size in pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// 0 = idle, 1 = walk.
    pub frame: u32,
    /// Clockwise rotation in radians.
    pub rotation: f32,
    /// Seconds since the current animation (re)started.
    pub phase: f32,
}

impl SlimeInstance {
    pub fn from_element(element: &SpriteElement, phase: f32) -> Self {
        let rotation = element.rotation_deg.to_radians();

        // Rotating about the pivot moves the quad center
        let half = element.size * 0.5;
        let center = element.position
            + element.pivot
            + Vec2::from_angle(rotation).rotate(half - element.pivot);

        let frame = match element.animation {
            Animation::Idle => 0,
            Animation::Walk => 1,
        };

        Self {
            center: center.into(),
            size: element.size.into(),
            color: SLIME_COLOR,
            frame,
            rotation,
            phase,
        }
    }
}
