//! Sprite type definitions.
//!
//! A [`SpriteTypeCatalog`] describes one kind of sprite: the closed set of
//! [`AnimationState`]s it supports, the [`PoseSequence`] each state plays, and
//! the [`ImageHandle`] behind every image id used by a pose. Catalogs are built
//! once at load time, validated as a whole, and then shared read-only by any
//! number of sprite instances through an `Arc`.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{CatalogError, UnknownStateError};

/// Named behavioural mode of a sprite (e.g. `IDLE`, `WALKING`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationState(Arc<str>);

impl AnimationState {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AnimationState {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnimationState {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AnimationState {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

/// Identifier of an image within one sprite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a drawable image.
///
/// The engine never inspects it; presentation layers resolve the key in their
/// own texture store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(Arc<str>);

impl ImageHandle {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of a pose sequence: show `image_id` for `duration` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub image_id: ImageId,
    pub duration: u32,
}

impl Pose {
    pub fn new(image_id: u32, duration: u32) -> Self {
        Self {
            image_id: ImageId(image_id),
            duration,
        }
    }

    /// Duration in ticks as used by the playback math.
    pub fn duration_ticks(&self) -> f64 {
        f64::from(self.duration)
    }
}

/// Ordered, looping, non-empty list of poses.
///
/// Only [`SpriteTypeCatalog::build`] creates sequences, so every sequence seen
/// by the rest of the crate is non-empty with positive durations.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSequence {
    poses: SmallVec<[Pose; 8]>,
    total_duration: u64,
}

impl PoseSequence {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Always false for sequences built by a catalog.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn pose(&self, index: usize) -> Option<&Pose> {
        self.poses.get(index)
    }

    /// Pose at an index already known to be in bounds.
    pub(crate) fn pose_at(&self, index: usize) -> Pose {
        self.poses[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }

    /// Length of one full loop in ticks.
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }
}

/// Immutable definition of one kind of sprite.
#[derive(Debug, Clone)]
pub struct SpriteTypeCatalog {
    /// States in definition order; `sequences[i]` belongs to `states[i]`.
    states: Vec<AnimationState>,
    sequences: Vec<PoseSequence>,
    index: FxHashMap<AnimationState, usize>,
    images: FxHashMap<ImageId, ImageHandle>,
}

impl SpriteTypeCatalog {
    /// Build and validate a catalog.
    ///
    /// `entries` is the ordered list of states with their poses, `images` maps
    /// every image id to its handle. Validation stops at the first problem
    /// found, in entry order, and nothing is returned on failure.
    pub fn build<E, I>(entries: E, images: I) -> Result<Self, CatalogError>
    where
        E: IntoIterator<Item = (AnimationState, Vec<Pose>)>,
        I: IntoIterator<Item = (ImageId, ImageHandle)>,
    {
        let images: FxHashMap<ImageId, ImageHandle> = images.into_iter().collect();
        let mut states = Vec::new();
        let mut sequences = Vec::new();
        let mut index: FxHashMap<AnimationState, usize> = FxHashMap::default();

        for (state, poses) in entries {
            if index.contains_key(&state) {
                return Err(CatalogError::DuplicateState { state });
            }
            if poses.is_empty() {
                return Err(CatalogError::EmptySequence { state });
            }

            let mut total_duration = 0u64;
            for (i, pose) in poses.iter().enumerate() {
                if pose.duration == 0 {
                    return Err(CatalogError::InvalidDuration {
                        state,
                        index: i,
                        duration: 0,
                    });
                }
                if !images.contains_key(&pose.image_id) {
                    return Err(CatalogError::DanglingImage {
                        state,
                        index: i,
                        image_id: pose.image_id,
                    });
                }
                total_duration += u64::from(pose.duration);
            }

            index.insert(state.clone(), states.len());
            states.push(state);
            sequences.push(PoseSequence {
                poses: SmallVec::from_vec(poses),
                total_duration,
            });
        }

        Ok(Self {
            states,
            sequences,
            index,
            images,
        })
    }

    /// Sequence played by `state`.
    pub fn lookup(&self, state: &str) -> Result<&PoseSequence, UnknownStateError> {
        self.state_index(state).map(|i| &self.sequences[i])
    }

    /// Resolve a state name into the catalog's own [`AnimationState`].
    pub fn resolve(&self, name: &str) -> Result<AnimationState, UnknownStateError> {
        self.state_index(name).map(|i| self.states[i].clone())
    }

    /// Position of `state` in definition order.
    pub fn state_index(&self, state: &str) -> Result<usize, UnknownStateError> {
        self.index
            .get(state)
            .copied()
            .ok_or_else(|| UnknownStateError {
                state: AnimationState::new(state),
            })
    }

    /// State and sequence at a position returned by [`Self::state_index`].
    pub fn entry(&self, index: usize) -> Option<(&AnimationState, &PoseSequence)> {
        Some((self.states.get(index)?, self.sequences.get(index)?))
    }

    pub(crate) fn sequence_at(&self, index: usize) -> &PoseSequence {
        &self.sequences[index]
    }

    pub(crate) fn state_at(&self, index: usize) -> &AnimationState {
        &self.states[index]
    }

    pub fn contains(&self, state: &str) -> bool {
        self.index.contains_key(state)
    }

    /// States in the order they were defined.
    pub fn states(&self) -> &[AnimationState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageHandle> {
        self.images.get(&id)
    }

    /// Handle for the image shown by a pose of this catalog.
    ///
    /// `build` rejects dangling image ids, so every pose of this catalog
    /// resolves. Poses from elsewhere go through [`Self::image`].
    pub(crate) fn image_for(&self, pose: &Pose) -> &ImageHandle {
        &self.images[&pose.image_id]
    }
}
