//! Obstacle-retraction roadmap
//!
//! # Module Organization
//!
//! - [`config`] - Tolerances and sampling settings
//! - [`closest_point`] - Probe-based nearest obstacle, equidistant vertex and
//!   sample retraction
//! - [`builder`] - Random sampling and linking of retracted vertices

pub mod config;
pub mod closest_point;
pub mod builder;

pub use config::RoadmapConfig;
pub use closest_point::ClosestPointFinder;
pub use builder::{Roadmap, RoadmapBuilder, RoadmapVertex};
