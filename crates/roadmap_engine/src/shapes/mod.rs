//! Shape hierarchy
//!
//! Shapes are the unit of collision, containment, drawing and planning.
//! Their geometry lives in [`ShapeKind`]; everything that involves more than
//! one shape (ownership, membership, listeners, dispatch) lives in the
//! [`ShapeWorld`](crate::world::ShapeWorld) arena.

pub mod kind;
pub mod sprite;
pub mod group;
pub mod actions;
pub mod listener;

pub use kind::{ShapeCapabilities, ShapeKind};
pub use sprite::{MotionState, Sprite};
pub use group::Group;
pub use actions::{CollisionAction, ShapeAction, ShapeActions};
pub use listener::{Listener, ShapeEvent, ShapeListener};
