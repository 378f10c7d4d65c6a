//! Mutable composite of shapes
//!
//! A group is a set of shape handles with an aggregate bounding box and a
//! round-robin cursor. Membership changes at any time; the owning
//! [`ShapeWorld`](crate::world::ShapeWorld) keeps the ownership shares and
//! listener registrations in step with the member set.
//!
//! Members are stored in insertion order. The cursor names the member that
//! receives the next planning step; it always indexes a live member unless
//! the group is empty. New members join at the end of the cycle and never
//! move the cursor.

use crate::foundation::collections::ShapeId;
use crate::geometry::Rect;

/// Member set, aggregate bounding box and planning cursor of a group shape
#[derive(Debug, Clone)]
pub struct Group {
    members: Vec<ShapeId>,
    cursor: usize,
    bbox: Rect,
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            cursor: 0,
            bbox: Rect::empty(),
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check membership by identity
    pub fn contains(&self, shape: ShapeId) -> bool {
        self.members.contains(&shape)
    }

    /// Members in insertion order
    pub fn members(&self) -> &[ShapeId] {
        &self.members
    }

    /// Aggregate bounding box, empty when the group is empty
    pub fn bounding_box(&self) -> Rect {
        self.bbox
    }

    /// Replace the aggregate bounding box
    pub(crate) fn set_bounding_box(&mut self, bbox: Rect) {
        self.bbox = bbox;
    }

    /// Member that will receive the next planning step
    pub fn current(&self) -> Option<ShapeId> {
        self.members.get(self.cursor).copied()
    }

    /// Add a member whose bounding box is `bbox`
    ///
    /// Returns false without changing anything when `shape` already is a
    /// member. The first member seeds the aggregate box, later members
    /// extend it.
    pub(crate) fn insert(&mut self, shape: ShapeId, bbox: &Rect) -> bool {
        if self.contains(shape) {
            return false;
        }
        self.bbox = if self.members.is_empty() { *bbox } else { self.bbox.union(bbox) };
        self.members.push(shape);
        true
    }

    /// Drop a member, keeping the cursor on the member that would have been
    /// planned next
    ///
    /// Returns false when `shape` was not a member. The aggregate box is left
    /// for the caller to recompute.
    pub(crate) fn remove(&mut self, shape: ShapeId) -> bool {
        let Some(index) = self.members.iter().position(|&m| m == shape) else {
            return false;
        };

        self.members.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        // Removing the current target leaves the cursor on its successor
        if self.cursor >= self.members.len() {
            self.cursor = 0;
        }
        if self.members.is_empty() {
            self.bbox = Rect::empty();
        }
        true
    }

    /// Return the current planning target and advance the cursor, wrapping
    /// to the first member after the last
    pub(crate) fn next_shape(&mut self) -> Option<ShapeId> {
        let shape = self.current()?;
        self.cursor += 1;
        if self.cursor == self.members.len() {
            self.cursor = 0;
        }
        Some(shape)
    }
}
