//! # Roadmap Engine
//!
//! A 2D shape collision engine with an obstacle-retraction roadmap builder.
//!
//! ## Features
//!
//! - **Shape Graph**: Circles, rectangles, segments, moving polygon sprites
//!   and nestable groups stored in an arena with reference-counted handles
//! - **Collision Queries**: Bounding-box rejection, Separating Axis tests and
//!   time-budgeted iteration over groups
//! - **Lifecycle Events**: Groups and external observers hear about destroyed
//!   and killed shapes
//! - **Round-Robin Planning**: Groups hand one planning step to one member at
//!   a time
//! - **Roadmaps**: Nearest-obstacle search with an expanding probe disc,
//!   retraction of samples onto the medial axis of free space
//!
//! ## Quick Start
//!
//! ```rust
//! use roadmap_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut world = ShapeWorld::new();
//!     let obstacles = world.create(Group::new())?;
//!     let wall = world.create(Rect::from_bounds(0.0, 0.0, 10.0, 1.0))?;
//!     world.add_kid(obstacles, wall)?;
//!     world.release(wall)?;
//!
//!     let bounds = Rect::from_bounds(-10.0, -10.0, 20.0, 10.0);
//!     let mut finder = ClosestPointFinder::new(&mut world, obstacles, bounds)?;
//!     let contact = finder.nearest_obstacle(&Vec2::new(5.0, 4.0));
//!     assert!(contact.is_some());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod geometry;
pub mod shapes;
pub mod world;
pub mod render;
pub mod roadmap;
pub mod config;

mod error;

pub use error::{ShapeError, ShapeResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        ShapeError, ShapeResult,
        config::{Config, ConfigError},
        foundation::{
            collections::{ObserverId, ShapeId},
            math::{Real, Vec2},
            time::{Clock, ManualClock, SystemClock},
        },
        geometry::{Circle, Primitive, Rect, Segment},
        render::{DrawCommand, DrawRecorder, Renderer},
        roadmap::{ClosestPointFinder, Roadmap, RoadmapBuilder, RoadmapConfig, RoadmapVertex},
        shapes::{
            CollisionAction, Group, MotionState, ShapeAction, ShapeEvent, ShapeKind,
            ShapeListener, Sprite,
        },
        world::ShapeWorld,
    };
}
