//! Per-sprite animation playback state.
//!
//! An [`Animation`] binds an entity to a shared [`SpriteTypeCatalog`] and
//! tracks which state is playing, which pose of that state's sequence is
//! showing and how long it has been showing. The playback math lives in
//! [`crate::systems::animation`]; this module only guards the invariants:
//!
//! - the current state always belongs to the catalog,
//! - `pose_index` is always a valid index into the current sequence,
//! - `elapsed` is always within `[0, current pose duration)`.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::error::UnknownStateError;
use crate::resources::spritecatalog::{
    AnimationState, ImageHandle, Pose, PoseSequence, SpriteTypeCatalog,
};

#[derive(Debug, Clone, Component)]
pub struct Animation {
    catalog: Arc<SpriteTypeCatalog>,
    /// Index of the current state in the catalog.
    pub(crate) state_index: usize,
    pub(crate) pose_index: usize,
    /// Ticks spent in the current pose. Kept in `f64` so poses longer than
    /// 2^24 ticks still finish.
    pub(crate) elapsed: f64,
}

impl Animation {
    /// Start playing `state` from its first pose.
    pub fn new(catalog: Arc<SpriteTypeCatalog>, state: &str) -> Result<Self, UnknownStateError> {
        let state_index = catalog.state_index(state)?;
        Ok(Self {
            catalog,
            state_index,
            pose_index: 0,
            elapsed: 0.0,
        })
    }

    /// Switch to `state`, restarting from its first pose.
    ///
    /// On failure nothing changes.
    pub fn switch_state(&mut self, state: &str) -> Result<(), UnknownStateError> {
        let state_index = self.catalog.state_index(state)?;
        self.state_index = state_index;
        self.pose_index = 0;
        self.elapsed = 0.0;
        Ok(())
    }

    pub fn catalog(&self) -> &Arc<SpriteTypeCatalog> {
        &self.catalog
    }

    pub fn state(&self) -> &AnimationState {
        self.catalog.state_at(self.state_index)
    }

    pub fn sequence(&self) -> &PoseSequence {
        self.catalog.sequence_at(self.state_index)
    }

    pub fn pose_index(&self) -> usize {
        self.pose_index
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn current_pose(&self) -> Pose {
        self.sequence().pose_at(self.pose_index)
    }

    /// Handle of the image the sprite shows right now.
    pub fn current_image(&self) -> &ImageHandle {
        self.catalog.image_for(&self.current_pose())
    }
}
