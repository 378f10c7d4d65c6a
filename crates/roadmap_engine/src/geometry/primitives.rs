//! Primitive 2D geometry
//!
//! Provides the basic geometric payloads carried by shapes (rectangles,
//! circles, segments and convex point lists) together with the containment
//! and closest-point queries the collision code is built from.
//!
//! None of these routines divide by a quantity that can be zero for
//! degenerate input; zero-length segments and single-point polygons are
//! valid arguments everywhere.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{cross, Real, Vec2};

/// Axis-aligned rectangle, also used as bounding box
///
/// All tests are closed: touching rectangles intersect and points on the
/// border are contained. The [`Rect::empty`] rectangle is inverted and
/// neither contains nor intersects anything, which makes it the identity
/// for [`Rect::union`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle spanning two corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a rectangle from its bounds
    pub fn from_bounds(xmin: Real, ymin: Real, xmax: Real, ymax: Real) -> Self {
        Self::new(Vec2::new(xmin, ymin), Vec2::new(xmax, ymax))
    }

    /// The inverted rectangle enclosing nothing
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(Real::INFINITY, Real::INFINITY),
            max: Vec2::new(Real::NEG_INFINITY, Real::NEG_INFINITY),
        }
    }

    /// Smallest rectangle enclosing all `points`, empty for no points
    pub fn from_points(points: &[Vec2]) -> Self {
        points.iter().fold(Self::empty(), |mut rect, p| {
            rect.surround(p);
            rect
        })
    }

    /// Check whether the rectangle encloses nothing
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width, zero for an empty rectangle
    pub fn width(&self) -> Real {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Height, zero for an empty rectangle
    pub fn height(&self) -> Real {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Length of the shorter side
    pub fn shorter_side(&self) -> Real {
        self.width().min(self.height())
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Check if a point lies inside or on the border
    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if this rectangle overlaps or touches another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Smallest rectangle enclosing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the rectangle to enclose `p`
    pub fn surround(&mut self, p: &Vec2) {
        self.min = Vec2::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Vec2::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// Corners in counter-clockwise order starting at the minimum corner
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Bottom, right, top and left edges
    pub fn edges(&self) -> [Segment; 4] {
        let [bl, br, tr, tl] = self.corners();
        [
            Segment::new(bl, br),
            Segment::new(br, tr),
            Segment::new(tr, tl),
            Segment::new(tl, bl),
        ]
    }

    /// Closest point of the solid rectangle to `p`
    pub fn closest_point(&self, p: &Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }

    /// Distance from `p` to the corner farthest away from it
    pub fn farthest_corner_distance(&self, p: &Vec2) -> Real {
        self.corners()
            .iter()
            .map(|corner| (corner - p).norm())
            .fold(0.0, Real::max)
    }
}

/// Solid disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center of the disc
    pub center: Vec2,
    /// Radius, never negative
    pub radius: Real,
}

impl Circle {
    /// Create a circle
    pub fn new(center: Vec2, radius: Real) -> Self {
        Self { center, radius }
    }

    /// Axis-aligned box enclosing the disc
    pub fn bounding_box(&self) -> Rect {
        let extent = Vec2::new(self.radius, self.radius);
        Rect::new(self.center - extent, self.center + extent)
    }

    /// Check if a point lies inside or on the circle
    pub fn contains_point(&self, p: &Vec2) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Closest point of the solid disc to `p`
    pub fn closest_point(&self, p: &Vec2) -> Vec2 {
        let offset = p - self.center;
        let distance = offset.norm();
        if distance <= self.radius {
            return *p;
        }
        // distance > radius >= 0 here
        self.center + offset * (self.radius / distance)
    }
}

/// Line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First end point
    pub start: Vec2,
    /// Second end point
    pub end: Vec2,
}

impl Segment {
    /// Create a segment
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Direction from start to end (not normalized)
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    /// Axis-aligned box enclosing both end points
    pub fn bounding_box(&self) -> Rect {
        Rect::new(self.start, self.end)
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: &Vec2) -> Vec2 {
        let d = self.direction();
        let length_squared = d.norm_squared();
        if length_squared == 0.0 {
            return self.start;
        }
        let t = ((p - self.start).dot(&d) / length_squared).clamp(0.0, 1.0);
        self.start + d * t
    }

    /// Check if this segment touches or crosses another
    ///
    /// Uses orientation tests only; collinear overlapping segments and
    /// shared end points count as intersecting.
    pub fn intersects_segment(&self, other: &Segment) -> bool {
        let d1 = orientation(&other.start, &other.end, &self.start);
        let d2 = orientation(&other.start, &other.end, &self.end);
        let d3 = orientation(&self.start, &self.end, &other.start);
        let d4 = orientation(&self.start, &self.end, &other.end);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) &&
           ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
            return true;
        }

        (d1 == 0.0 && other.bounding_box().contains_point(&self.start)) ||
        (d2 == 0.0 && other.bounding_box().contains_point(&self.end)) ||
        (d3 == 0.0 && self.bounding_box().contains_point(&other.start)) ||
        (d4 == 0.0 && self.bounding_box().contains_point(&other.end))
    }
}

/// Signed area of the triangle `a`, `b`, `c` (times two)
fn orientation(a: &Vec2, b: &Vec2, c: &Vec2) -> Real {
    cross(&(b - a), &(c - a))
}

/// Edges of a cyclic point list, including the closing edge
///
/// A single point yields one zero-length edge; no points yield none.
pub fn polygon_edges(points: &[Vec2]) -> impl Iterator<Item = Segment> + '_ {
    let n = points.len();
    (0..n).map(move |i| Segment::new(points[i], points[(i + 1) % n]))
}

/// Check if a point lies inside or on a convex polygon
///
/// Works for either winding order. Degenerate (collinear) polygons contain
/// exactly the points on their hull segment.
pub fn polygon_contains_point(points: &[Vec2], p: &Vec2) -> bool {
    if points.is_empty() {
        return false;
    }

    let mut winding = 0.0;
    for edge in polygon_edges(points) {
        let side = orientation(&edge.start, &edge.end, p);
        if side == 0.0 {
            continue;
        }
        if winding == 0.0 {
            winding = side.signum();
        } else if side.signum() != winding {
            return false;
        }
    }

    // Every edge was collinear with p
    if winding == 0.0 {
        return Rect::from_points(points).contains_point(p);
    }
    true
}

/// Closest point of a solid convex polygon to `p`, `None` for no points
pub fn polygon_closest_point(points: &[Vec2], p: &Vec2) -> Option<Vec2> {
    if polygon_contains_point(points, p) {
        return Some(*p);
    }
    polygon_edges(points)
        .map(|edge| edge.closest_point(p))
        .min_by(|a, b| (a - p).norm_squared().total_cmp(&(b - p).norm_squared()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(min: Real, max: Real) -> Vec<Vec2> {
        Rect::from_bounds(min, min, max, max).corners().to_vec()
    }

    #[test]
    fn test_empty_rect_is_union_identity() {
        let r = Rect::from_bounds(1.0, 2.0, 3.0, 4.0);
        assert!(Rect::empty().is_empty());
        assert_eq!(Rect::empty().union(&r), r);
        assert!(!Rect::empty().intersects(&r));
        assert!(!r.intersects(&Rect::empty()));
        assert_eq!(Rect::empty().width(), 0.0);
    }

    #[test]
    fn test_rect_from_points() {
        let points = [Vec2::new(-1.0, -1.0), Vec2::new(1.0, 0.0), Vec2::new(-1.0, 1.0)];
        let r = Rect::from_points(&points);
        assert_eq!(r.min, Vec2::new(-1.0, -1.0));
        assert_eq!(r.max, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_touching_rects_intersect() {
        let a = Rect::from_bounds(0.0, 0.0, 1.0, 1.0);
        let b = Rect::from_bounds(1.0, 0.0, 2.0, 1.0);
        let c = Rect::from_bounds(1.5, 0.0, 2.0, 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_circle_closest_point() {
        let c = Circle::new(Vec2::new(0.0, 0.0), 2.0);
        assert_abs_diff_eq!(c.closest_point(&Vec2::new(4.0, 0.0)), Vec2::new(2.0, 0.0), epsilon = 1e-12);
        assert_eq!(c.closest_point(&Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));

        let point_circle = Circle::new(Vec2::new(1.0, 1.0), 0.0);
        assert_eq!(point_circle.closest_point(&Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_segment_closest_point_degenerate() {
        let s = Segment::new(Vec2::new(2.0, 3.0), Vec2::new(2.0, 3.0));
        assert_eq!(s.closest_point(&Vec2::new(10.0, 10.0)), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_segment_intersections() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let crossing = Segment::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0));
        let parallel = Segment::new(Vec2::new(0.0, 1.0), Vec2::new(2.0, 3.0));
        let collinear = Segment::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 3.0));
        let end_touch = Segment::new(Vec2::new(2.0, 2.0), Vec2::new(4.0, 0.0));

        assert!(a.intersects_segment(&crossing));
        assert!(!a.intersects_segment(&parallel));
        assert!(a.intersects_segment(&collinear));
        assert!(a.intersects_segment(&end_touch));
        assert!(end_touch.intersects_segment(&a));
    }

    #[test]
    fn test_polygon_contains_point_either_winding() {
        let ccw = square(0.0, 2.0);
        let mut cw = ccw.clone();
        cw.reverse();

        for poly in [&ccw, &cw] {
            assert!(polygon_contains_point(poly, &Vec2::new(1.0, 1.0)));
            assert!(polygon_contains_point(poly, &Vec2::new(2.0, 1.0)));
            assert!(polygon_contains_point(poly, &Vec2::new(0.0, 0.0)));
            assert!(!polygon_contains_point(poly, &Vec2::new(3.0, 1.0)));
            assert!(!polygon_contains_point(poly, &Vec2::new(3.0, 0.0)));
        }
    }

    #[test]
    fn test_polygon_degenerate_inputs() {
        assert!(!polygon_contains_point(&[], &Vec2::zeros()));
        assert!(polygon_closest_point(&[], &Vec2::zeros()).is_none());

        let single = [Vec2::new(1.0, 1.0)];
        assert!(polygon_contains_point(&single, &Vec2::new(1.0, 1.0)));
        assert!(!polygon_contains_point(&single, &Vec2::new(1.0, 2.0)));
        assert_eq!(polygon_closest_point(&single, &Vec2::new(5.0, 5.0)), Some(Vec2::new(1.0, 1.0)));

        let line = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
        assert!(polygon_contains_point(&line, &Vec2::new(1.5, 0.0)));
        assert!(!polygon_contains_point(&line, &Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_polygon_closest_point_outside() {
        let poly = square(0.0, 2.0);
        let closest = polygon_closest_point(&poly, &Vec2::new(5.0, 1.0));
        assert_eq!(closest, Some(Vec2::new(2.0, 1.0)));
    }

    #[test]
    fn test_polygon_edges_include_closing_edge() {
        let poly = square(0.0, 1.0);
        let edges: Vec<_> = polygon_edges(&poly).collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].end, poly[0]);
    }
}
