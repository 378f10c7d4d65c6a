//! Handle types for arena-allocated objects

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a shape stored in a [`ShapeWorld`](crate::world::ShapeWorld)
    ///
    /// Handles stay valid until the shape is destroyed; a stale handle never
    /// aliases a newer shape.
    pub struct ShapeId;

    /// Handle to an external listener registered with a world
    pub struct ObserverId;
}

/// Arena of shapes keyed by [`ShapeId`]
pub type ShapeMap<T> = SlotMap<ShapeId, T>;
