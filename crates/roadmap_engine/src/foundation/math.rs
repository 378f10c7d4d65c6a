//! Math utilities and types
//!
//! Provides the scalar and vector types used by every geometric routine.
//! Roadmap tolerances sit well below `f32` resolution at typical scene
//! scales, so the engine works in `f64` throughout.

pub use nalgebra::{Rotation2, Vector2};

/// Scalar type used for all geometry
pub type Real = f64;

/// 2D vector type, also used for points
pub type Vec2 = Vector2<Real>;

/// Z component of the 3D cross product of `a` and `b`
///
/// Positive when `b` lies counter-clockwise of `a`.
#[inline]
pub fn cross(a: &Vec2, b: &Vec2) -> Real {
    a.x * b.y - a.y * b.x
}

/// Vector perpendicular to `v` (rotated 90 degrees counter-clockwise)
#[inline]
pub fn perpendicular(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate `v` counter-clockwise by `degrees`
pub fn rotate_degrees(v: &Vec2, degrees: Real) -> Vec2 {
    Rotation2::new(degrees.to_radians()) * v
}

/// Check that every component is finite
pub fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
