//! ECS systems run by the scene schedule.
//!
//! - [`time`] – records the scaled delta of the tick on the playback clock
//! - [`animation`] – walks pose sequences forward by that delta
//! - [`movement`] – integrates velocity into position by that delta
pub mod animation;
pub mod movement;
pub mod time;
