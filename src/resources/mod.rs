//! Long-lived data used by the scene and its hosts.
//!
//! Overview
//! - `spritecatalog` – validated, shared definitions of sprite types
//! - `spritetypestore` – named registry of loaded sprite types
//! - `playbackclock` – run/pause flag, speed factor and per-tick delta
//! - `playbackconfig` – INI-backed playback settings
//! - `commandbridge` – channel carrying commands into the tick loop
pub mod commandbridge;
pub mod playbackclock;
pub mod playbackconfig;
pub mod spritecatalog;
pub mod spritetypestore;
