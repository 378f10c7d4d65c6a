//! Listener protocol for shape lifecycle events
//!
//! Anything holding on to a shape can register to hear when the shape is
//! destroyed (its last owner released it) or killed (logically removed while
//! still owned). Both callbacks must tolerate being called for a shape the
//! listener already forgot about.

use crate::foundation::collections::{ObserverId, ShapeId};

use super::group::Group;

/// Lifecycle events delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeEvent {
    /// The last ownership share was released; the shape is being torn down
    Destroyed,
    /// The shape was explicitly removed from play
    Killed,
}

/// Observer of shape lifecycle events
pub trait ShapeListener {
    /// Called exactly once, just before `shape` is deallocated
    fn shape_destroyed(&mut self, shape: ShapeId);

    /// Called when `shape` is killed
    fn shape_killed(&mut self, shape: ShapeId);

    /// Dispatch `event` to the matching callback
    fn on_event(&mut self, shape: ShapeId, event: ShapeEvent) {
        match event {
            ShapeEvent::Destroyed => self.shape_destroyed(shape),
            ShapeEvent::Killed => self.shape_killed(shape),
        }
    }
}

/// A registration on a shape's listener list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// A group shape holding the shape as a member
    Group(ShapeId),
    /// An external observer registered with the world
    Observer(ObserverId),
}

/// Groups forget members they hear about; ownership bookkeeping is done by
/// the world
impl ShapeListener for Group {
    fn shape_destroyed(&mut self, shape: ShapeId) {
        self.remove(shape);
    }

    fn shape_killed(&mut self, shape: ShapeId) {
        self.remove(shape);
    }
}
