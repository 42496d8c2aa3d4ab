//! Messages exchanged between hosts and the scene.
//!
//! - [`scenecommand`] – playback commands issued by a presentation layer
pub mod scenecommand;
