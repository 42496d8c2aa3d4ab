//! Sprite Player library.
//!
//! A real-time sprite animation playback engine. Sprite types are loaded as
//! immutable catalogs of named animation states, each state being a looping
//! sequence of timed poses. Live sprites are ECS entities advanced once per
//! tick by a shared, pausable, speed-scaled clock.
//!
//! # Project Structure
//!
//! - [`components`] – ECS components (animation playback, position, velocity, z-index)
//! - [`director`] – scene ownership, tick loop, snapshots and command dispatch
//! - [`error`] – error types
//! - [`events`] – user commands forwarded to the scene
//! - [`loader`] – sprite type definitions on disk
//! - [`resources`] – ECS resources and shared stores (clock, catalogs, config, command bridge)
//! - [`systems`] – ECS systems (clock update, animation, movement)
//! - [`viewer`] – single-sprite viewer session on top of the director

pub mod components;
pub mod director;
pub mod error;
pub mod events;
pub mod loader;
pub mod resources;
pub mod systems;
pub mod viewer;
