//! Error types.
//!
//! Errors are grouped by the moment they can happen:
//!
//! - [`CatalogError`] – raised while building a
//!   [`SpriteTypeCatalog`](crate::resources::spritecatalog::SpriteTypeCatalog).
//!   Fatal to that load; no catalog is produced.
//! - [`UnknownStateError`] – a state name that is not part of a catalog's
//!   closed state set. Recoverable; nothing was mutated.
//! - [`InvalidSpeedError`] – a rejected speed factor. The clock keeps its
//!   previous value.
//! - [`SceneError`] – umbrella for [`SceneDirector`](crate::director::SceneDirector)
//!   and viewer operations.
//! - [`LoadError`] – I/O, parse or definition failures from asset loading.
//! - [`ConfigError`] – the playback configuration file could not be read or written.

use std::path::PathBuf;

use thiserror::Error;

use crate::director::SpriteId;
use crate::resources::spritecatalog::{AnimationState, ImageId};

/// Structural problem found while building a sprite type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A state was given an empty pose list.
    #[error("animation state '{state}' has an empty pose sequence")]
    EmptySequence { state: AnimationState },
    /// A pose duration was zero or negative.
    #[error("pose {index} of animation state '{state}' has invalid duration {duration}")]
    InvalidDuration {
        state: AnimationState,
        index: usize,
        duration: i64,
    },
    /// A pose references an image id with no registered handle.
    #[error("pose {index} of animation state '{state}' references unknown image {image_id}")]
    DanglingImage {
        state: AnimationState,
        index: usize,
        image_id: ImageId,
    },
    /// The same state was defined twice.
    #[error("animation state '{state}' is defined more than once")]
    DuplicateState { state: AnimationState },
}

/// The requested animation state is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown animation state '{state}'")]
pub struct UnknownStateError {
    pub state: AnimationState,
}

/// Speed factors must be finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid playback speed {factor}: must be finite and greater than zero")]
pub struct InvalidSpeedError {
    pub factor: f32,
}

/// Failure of a scene or viewer operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error(transparent)]
    UnknownState(#[from] UnknownStateError),
    #[error(transparent)]
    InvalidSpeed(#[from] InvalidSpeedError),
    #[error("sprite {0} is not part of the scene")]
    UnknownInstance(SpriteId),
    #[error("unknown sprite type '{0}'")]
    UnknownSpriteType(String),
    /// A command needs a target but nothing is selected.
    #[error("no sprite selected")]
    NoSelection,
}

/// Failure to load sprite definitions from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid sprite type '{sprite_type}': {source}")]
    Definition {
        sprite_type: String,
        #[source]
        source: CatalogError,
    },
    #[error("sprite type list {} does not name any sprite type", .0.display())]
    EmptyTypeList(PathBuf),
}

/// Failure to read or write the playback configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
    #[error("failed to save config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
