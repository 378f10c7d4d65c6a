//! Pairwise intersection between primitive kinds
//!
//! Every simple shape exposes its geometry as a [`Primitive`]. The collision
//! code never looks at concrete shape types; it asks one primitive to
//! intersect another and this module picks the routine for the pair.
//!
//! Contact points are only produced when the testing primitive is a circle:
//! the reported point is the point of the other geometry closest to the
//! circle's center. Every other pairing is an existence test.

use std::borrow::Cow;

use crate::foundation::math::Vec2;

use super::primitives::{
    polygon_closest_point, polygon_contains_point, Circle, Rect, Segment,
};
use super::sat;

/// Geometry of a simple shape
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive<'a> {
    /// Solid disc
    Circle(Circle),
    /// Solid axis-aligned rectangle
    Rect(Rect),
    /// Line segment
    Segment(Segment),
    /// Solid convex polygon (cyclic vertex list)
    Polygon(Cow<'a, [Vec2]>),
}

impl Primitive<'_> {
    /// Detach the primitive from the storage it borrows
    pub fn into_owned(self) -> Primitive<'static> {
        match self {
            Self::Circle(circle) => Primitive::Circle(circle),
            Self::Rect(rect) => Primitive::Rect(rect),
            Self::Segment(segment) => Primitive::Segment(segment),
            Self::Polygon(points) => Primitive::Polygon(Cow::Owned(points.into_owned())),
        }
    }

    /// Axis-aligned box enclosing the geometry
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Circle(circle) => circle.bounding_box(),
            Self::Rect(rect) => *rect,
            Self::Segment(segment) => segment.bounding_box(),
            Self::Polygon(points) => Rect::from_points(points),
        }
    }

    /// Check if a point lies inside or on the geometry
    pub fn contains_point(&self, p: &Vec2) -> bool {
        match self {
            Self::Circle(circle) => circle.contains_point(p),
            Self::Rect(rect) => rect.contains_point(p),
            Self::Segment(segment) => segment.closest_point(p) == *p,
            Self::Polygon(points) => polygon_contains_point(points, p),
        }
    }

    /// Closest point of the (solid) geometry to `p`
    ///
    /// Returns `p` itself when it is contained, `None` only for an empty
    /// polygon.
    pub fn closest_point(&self, p: &Vec2) -> Option<Vec2> {
        match self {
            Self::Circle(circle) => Some(circle.closest_point(p)),
            Self::Rect(rect) => Some(rect.closest_point(p)),
            Self::Segment(segment) => Some(segment.closest_point(p)),
            Self::Polygon(points) => polygon_closest_point(points, p),
        }
    }

    /// Test this primitive against `other`
    ///
    /// Returns true when the two overlap or touch. When `self` is a circle the
    /// contact point on `other` is appended to `points`.
    pub fn intersection(&self, other: &Primitive<'_>, points: &mut Vec<Vec2>) -> bool {
        match (self, other) {
            (Self::Circle(circle), _) => {
                match circle_contact(circle, other) {
                    Some(contact) => {
                        points.push(contact);
                        true
                    }
                    None => false,
                }
            }
            (_, Primitive::Circle(circle)) => circle_contact(circle, self).is_some(),

            (Self::Rect(a), Primitive::Rect(b)) => a.intersects(b),
            (Self::Segment(a), Primitive::Segment(b)) => a.intersects_segment(b),
            (Self::Polygon(p), Primitive::Polygon(q)) => sat::polygons_intersect(p, q),

            (Self::Rect(rect), Primitive::Segment(segment)) |
            (Self::Segment(segment), Primitive::Rect(rect)) => {
                sat::segment_intersects_rect(segment, rect)
            }

            (Self::Segment(segment), Primitive::Polygon(polygon)) |
            (Self::Polygon(polygon), Primitive::Segment(segment)) => {
                sat::segment_intersects_polygon(segment, polygon)
            }

            (Self::Rect(rect), Primitive::Polygon(polygon)) |
            (Self::Polygon(polygon), Primitive::Rect(rect)) => {
                sat::rect_intersects_polygon(rect, polygon)
            }
        }
    }
}

/// Closest point of `other` to the circle's center, if within the radius
fn circle_contact(circle: &Circle, other: &Primitive<'_>) -> Option<Vec2> {
    let closest = other.closest_point(&circle.center)?;
    let within = (closest - circle.center).norm_squared() <= circle.radius * circle.radius;
    within.then_some(closest)
}
