//! ECS components attached to sprite entities.
//!
//! Every sprite instance spawned by the
//! [`SceneDirector`](crate::director::SceneDirector) carries one of each:
//!
//! - [`animation`] – playback state bound to a shared sprite type catalog
//! - [`mapposition`] – world-space position
//! - [`rigidbody`] – velocity integrated by the movement system
//! - [`zindex`] – draw order hint used when building snapshots

pub mod animation;
pub mod mapposition;
pub mod rigidbody;
pub mod zindex;
