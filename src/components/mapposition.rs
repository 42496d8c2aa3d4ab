//! World-space position of a sprite.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Where the sprite is drawn, in world units.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
