//! Z-index component for draw ordering.
//!
//! Snapshots list sprites with lower z-index values first, so a presentation
//! layer drawing them in order paints higher values on top.

use bevy_ecs::prelude::Component;

/// Draw order hint. Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
