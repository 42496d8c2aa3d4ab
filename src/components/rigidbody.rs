//! Kinematic body storing a sprite's velocity.
//!
//! The [`movement`](crate::systems::movement::movement) system integrates the
//! velocity into [`MapPosition`](super::mapposition::MapPosition) once per
//! tick, scaled by the playback clock.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Velocity in world units per tick.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }
}
