//! Error types for structural misuse of the shape graph
//!
//! Geometric "not found" outcomes are never errors; they are reported as
//! `Option::None` by the roadmap queries. Everything here is a caller bug
//! that is surfaced immediately instead of being tolerated.

use crate::foundation::collections::{ObserverId, ShapeId};

/// Shape graph errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The handle does not name a live shape
    #[error("unknown or destroyed shape {0:?}")]
    UnknownShape(ShapeId),

    /// A child operation was requested on a shape that is not a group
    #[error("shape {0:?} is not a group")]
    NotAGroup(ShapeId),

    /// Adding the shape would make a group contain itself
    #[error("adding {kid:?} to group {group:?} would create a cycle")]
    WouldCreateCycle {
        /// The group receiving the new member
        group: ShapeId,
        /// The shape being added
        kid: ShapeId,
    },

    /// The handle does not name a registered observer
    #[error("unknown observer {0:?}")]
    UnknownObserver(ObserverId),

    /// Autorelease requested with no release pool open
    #[error("no release pool is open")]
    NoReleasePool,

    /// Geometry rejected at creation time
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Query settings rejected before use
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for shape graph operations
pub type ShapeResult<T> = Result<T, ShapeError>;
