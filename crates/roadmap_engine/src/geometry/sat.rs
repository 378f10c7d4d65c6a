//! Separating Axis Theorem test for convex polygons
//!
//! Two convex polygons are disjoint if and only if some axis exists onto
//! which their projections do not overlap. For polygons it is enough to try
//! the axes perpendicular to every edge of both polygons.
//!
//! Both inputs are cyclic vertex lists: the closing edge from the last vertex
//! back to the first is implied. Projection uses dot products only, so
//! zero-length edges and collinear inputs are handled without any division:
//! a zero-length edge produces the zero axis, every vertex projects to 0 on
//! it and the axis can never separate.
//!
//! Edge normals alone miss separations along a degenerate input. A list
//! whose points lie on one line also contributes its direction as an axis,
//! and two single points are separated along their difference.

use crate::foundation::math::{cross, perpendicular, Real, Vec2};

use super::primitives::{polygon_contains_point, polygon_edges, Rect, Segment};

/// Project every point onto `axis`, returning the `(min, max)` interval
fn project(points: &[Vec2], axis: &Vec2) -> (Real, Real) {
    points.iter()
        .map(|p| axis.dot(p))
        .fold((Real::INFINITY, Real::NEG_INFINITY), |(min, max), d| (min.min(d), max.max(d)))
}

/// Check whether `axis` separates the two point sets
///
/// Touching intervals do not separate: the test is boundary inclusive.
fn separates(p: &[Vec2], q: &[Vec2], axis: &Vec2) -> bool {
    let (min_p, max_p) = project(p, axis);
    let (min_q, max_q) = project(q, axis);
    min_p > max_q || max_p < min_q
}

/// Find an edge normal of `edges_of` that separates `p` from `q`
fn has_separating_axis(edges_of: &[Vec2], p: &[Vec2], q: &[Vec2]) -> bool {
    polygon_edges(edges_of)
        .map(|edge| perpendicular(&edge.direction()))
        .any(|axis| separates(p, q, &axis))
}

/// Direction from the first point to the first distinct one, `None` when
/// every point coincides
fn span_direction(points: &[Vec2]) -> Option<Vec2> {
    let origin = points.first()?;
    points.iter().map(|p| p - origin).find(|d| *d != Vec2::zeros())
}

/// Axis along which a degenerate list lies, if it has no area
fn flat_axis(points: &[Vec2]) -> Option<Vec2> {
    let origin = points.first()?;
    let direction = span_direction(points)?;
    points.iter()
        .all(|p| cross(&direction, &(p - origin)) == 0.0)
        .then_some(direction)
}

/// Extra axes needed when one input has no area
fn has_separating_degenerate_axis(p: &[Vec2], q: &[Vec2]) -> bool {
    if span_direction(p).is_none() && span_direction(q).is_none() {
        return separates(p, q, &(q[0] - p[0]));
    }
    [flat_axis(p), flat_axis(q)]
        .iter()
        .flatten()
        .any(|axis| separates(p, q, axis))
}

/// Check if two convex polygons overlap or touch
///
/// The result does not depend on argument order. Empty inputs never
/// intersect anything.
pub fn polygons_intersect(p: &[Vec2], q: &[Vec2]) -> bool {
    if p.is_empty() || q.is_empty() {
        return false;
    }

    // No separating axis found = polygons intersect
    !has_separating_axis(p, p, q) &&
        !has_separating_axis(q, p, q) &&
        !has_separating_degenerate_axis(p, q)
}

/// Check if a segment touches a convex polygon
///
/// Every polygon edge is tested against the segment; a segment lying
/// completely inside the polygon also counts.
pub fn segment_intersects_polygon(segment: &Segment, polygon: &[Vec2]) -> bool {
    if polygon.is_empty() {
        return false;
    }
    polygon_edges(polygon).any(|edge| edge.intersects_segment(segment)) ||
        polygon_contains_point(polygon, &segment.start)
}

/// Check if a rectangle touches a convex polygon
///
/// The four rectangle edges are tested as segments against every polygon
/// edge, followed by containment in either direction.
pub fn rect_intersects_polygon(rect: &Rect, polygon: &[Vec2]) -> bool {
    if polygon.is_empty() || rect.is_empty() {
        return false;
    }

    let rect_edges = rect.edges();
    let crossing = polygon_edges(polygon)
        .any(|edge| rect_edges.iter().any(|side| side.intersects_segment(&edge)));

    crossing ||
        polygon_contains_point(polygon, &rect.min) ||
        rect.contains_point(&polygon[0])
}

/// Check if a segment touches a rectangle
pub fn segment_intersects_rect(segment: &Segment, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    rect.contains_point(&segment.start) ||
        rect.contains_point(&segment.end) ||
        rect.edges().iter().any(|side| side.intersects_segment(segment))
}
