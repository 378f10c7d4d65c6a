//! Behaviour hooks attached to shapes
//!
//! Collision, containment, update and planning behaviour is supplied from
//! outside the geometry as actions. A query may pass an explicit action that
//! replaces the shapes' own stored actions for that query only.

use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Real, Vec2};

use super::kind::ShapeKind;

/// Action run when two shapes are found to overlap
pub trait CollisionAction {
    /// Handle a collision between `shape` and `other`
    ///
    /// `points` holds the contact points found by the exact test, which may
    /// be empty for pairings that only test for existence.
    fn execute(&mut self, shape: ShapeId, other: ShapeId, points: &[Vec2], t: Real, dt: Real);
}

impl<F> CollisionAction for F
where
    F: FnMut(ShapeId, ShapeId, &[Vec2], Real, Real),
{
    fn execute(&mut self, shape: ShapeId, other: ShapeId, points: &[Vec2], t: Real, dt: Real) {
        self(shape, other, points, t, dt);
    }
}

/// Action run on a single shape (containment hits, updates and planning)
pub trait ShapeAction {
    /// Run the action on `shape`, whose geometry is handed over mutably
    fn execute(&mut self, id: ShapeId, shape: &mut ShapeKind, t: Real, dt: Real);
}

impl<F> ShapeAction for F
where
    F: FnMut(ShapeId, &mut ShapeKind, Real, Real),
{
    fn execute(&mut self, id: ShapeId, shape: &mut ShapeKind, t: Real, dt: Real) {
        self(id, shape, t, dt);
    }
}

/// Stored actions of a shape
#[derive(Default)]
pub struct ShapeActions {
    /// Default collision handler
    pub collision: Option<Box<dyn CollisionAction>>,
    /// Default containment handler
    pub inside: Option<Box<dyn ShapeAction>>,
    /// Run after the shape's own update
    pub update: Option<Box<dyn ShapeAction>>,
    /// Run when the shape receives a planning step
    pub plan: Option<Box<dyn ShapeAction>>,
}

impl std::fmt::Debug for ShapeActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeActions")
            .field("collision", &self.collision.is_some())
            .field("inside", &self.inside.is_some())
            .field("update", &self.update.is_some())
            .field("plan", &self.plan.is_some())
            .finish()
    }
}
