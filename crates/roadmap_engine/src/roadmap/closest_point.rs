//! Nearest-obstacle search by expanding and shrinking a probe disc
//!
//! The finder owns a probe circle registered in the world. To find the
//! obstacle point nearest to `c` it collides discs centred on `c` against the
//! obstacle field, growing the radius while nothing is hit and shrinking it
//! once something is, until the step size drops below the accuracy.

use crate::config::Config;
use crate::error::{ShapeError, ShapeResult};
use crate::foundation::collections::ShapeId;
use crate::foundation::logging::{trace, warn};
use crate::foundation::math::{Real, Vec2};
use crate::geometry::{Circle, Rect, Segment};
use crate::shapes::ShapeKind;
use crate::world::ShapeWorld;

use super::config::RoadmapConfig;

/// Probe-based closest point queries against an obstacle field
pub struct ClosestPointFinder<'w> {
    world: &'w mut ShapeWorld,
    obstacles: ShapeId,
    bounds: Rect,
    probe: ShapeId,
    accuracy: Real,
    max_step_distance: Real,
    time_window: Real,
}

impl<'w> ClosestPointFinder<'w> {
    /// Create a finder for `obstacles` searching within `bounds`, with
    /// default tolerances
    pub fn new(world: &'w mut ShapeWorld, obstacles: ShapeId, bounds: Rect) -> ShapeResult<Self> {
        let config = RoadmapConfig { bounds, ..RoadmapConfig::default() };
        Self::with_config(world, obstacles, &config)
    }

    /// Create a finder using the bounds and tolerances of `config`
    ///
    /// Settings that fail [`RoadmapConfig`] validation are refused with
    /// [`ShapeError::InvalidConfig`].
    pub fn with_config(
        world: &'w mut ShapeWorld,
        obstacles: ShapeId,
        config: &RoadmapConfig,
    ) -> ShapeResult<Self> {
        world.shape(obstacles)?;
        let bounds = config.bounds;
        if bounds.is_empty() || bounds.shorter_side() <= 0.0 {
            return Err(ShapeError::InvalidGeometry(format!(
                "search bounds must have positive area, got {bounds:?}"
            )));
        }
        config.validate().map_err(|err| ShapeError::InvalidConfig(err.to_string()))?;

        let probe = world.create(Circle::new(bounds.center(), 0.0))?;
        world.set_name(probe, "closest point probe")?;
        Ok(Self {
            world,
            obstacles,
            bounds,
            probe,
            accuracy: config.accuracy,
            max_step_distance: config.max_step_distance,
            time_window: config.probe_time_window,
        })
    }

    /// Search area
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Shape the finder searches against
    pub fn obstacles(&self) -> ShapeId {
        self.obstacles
    }

    /// Point of the obstacle field nearest to `point`
    ///
    /// Returns `point` itself when it lies on or inside an obstacle and
    /// `None` when no obstacle is within reach of the search bounds.
    pub fn nearest_obstacle(&mut self, point: &Vec2) -> Option<Vec2> {
        let reach = self.bounds.farthest_corner_distance(point);
        let mut radius = self.bounds.shorter_side() * 0.5;
        let mut step = radius;
        let mut nearest = None;

        while step > self.accuracy && radius > self.accuracy {
            match self.probe_disc(point, radius) {
                Some(contact) => {
                    if contact == *point {
                        return Some(contact);
                    }
                    nearest = Some(contact);
                    step *= 0.5;
                    radius -= step;
                }
                None if nearest.is_some() => {
                    step *= 0.5;
                    radius += step;
                }
                None => {
                    if radius >= reach {
                        trace!("No obstacle within {} of {:?}", radius, point);
                        return None;
                    }
                    step *= 2.0;
                    radius += step;
                }
            }
        }
        nearest
    }

    /// Point between `c1` and `c2` where the nearest obstacle changes
    ///
    /// Bisects the segment from `c1` towards `c2`, moving forward while the
    /// nearest obstacle matches the one of `c1` and backward otherwise.
    pub fn equidistant_vertex(&mut self, c1: &Vec2, c2: &Vec2) -> Option<Vec2> {
        let mut ds = (c2 - c1) * 0.5;
        let mut cv = c1 + ds;
        let first = self.nearest_obstacle(c1)?;
        let mut current = self.nearest_obstacle(&cv)?;

        while ds.norm_squared() > self.accuracy {
            ds *= 0.5;
            if self.same_contact(&current, &first) {
                cv += ds;
            } else {
                cv -= ds;
            }
            current = self.nearest_obstacle(&cv)?;
        }
        Some(cv)
    }

    /// Move `point` away from its nearest obstacle until it is equally close
    /// to a second one
    ///
    /// The walk steps by the distance to the first obstacle, clamped between
    /// the square root of the accuracy and half the maximum step distance.
    /// Returns `None` when no obstacle is found or `point` already touches
    /// one. When no second obstacle turns up within the maximum step
    /// distance or the bounds, the last position before giving up is
    /// returned.
    pub fn retract_sample(&mut self, point: &Vec2) -> Option<Vec2> {
        let contact = self.nearest_obstacle(point)?;
        if contact == *point {
            return None;
        }

        let mut ds = point - contact;
        let max_step = self.max_step_distance * 0.5;
        let min_step = self.accuracy.sqrt();
        if ds.norm() > max_step {
            ds = ds.normalize() * max_step;
        } else if ds.norm() < min_step {
            ds = ds.normalize() * min_step;
        }

        let max_distance_squared = self.max_step_distance * self.max_step_distance;
        let mut c1 = point + ds;
        let mut near = self.nearest_obstacle(&c1)?;
        let mut found = true;
        while self.same_contact(&near, &contact) {
            c1 += ds;
            near = self.nearest_obstacle(&c1)?;
            if (c1 - contact).norm_squared() > max_distance_squared || !self.bounds.contains_point(&c1) {
                found = false;
                break;
            }
        }

        if found {
            self.equidistant_vertex(point, &c1)
        } else {
            Some(c1 - ds)
        }
    }

    /// Check whether `point` lies inside an obstacle
    pub fn inside_obstacle(&mut self, point: &Vec2) -> ShapeResult<bool> {
        let t = self.world.seconds_passed();
        let mut ignore = |_: ShapeId, _: &mut ShapeKind, _: Real, _: Real| {};
        self.world.inside(self.obstacles, point, t, self.time_window, Some(&mut ignore))
    }

    /// Check whether the straight path from `a` to `b` touches an obstacle
    pub fn segment_blocked(&mut self, a: &Vec2, b: &Vec2) -> ShapeResult<bool> {
        *self.world.shape_mut(self.probe)? = ShapeKind::Segment(Segment::new(*a, *b));
        let t = self.world.seconds_passed();
        let mut ignore = |_: ShapeId, _: ShapeId, _: &[Vec2], _: Real, _: Real| {};
        self.world.collide(self.obstacles, self.probe, t, self.time_window, Some(&mut ignore))
    }

    fn same_contact(&self, a: &Vec2, b: &Vec2) -> bool {
        (a - b).norm_squared() < self.accuracy
    }

    /// Collide a disc against the obstacles, returning the contact nearest
    /// to its centre
    fn probe_disc(&mut self, center: &Vec2, radius: Real) -> Option<Vec2> {
        match self.world.shape_mut(self.probe) {
            Ok(shape) => *shape = ShapeKind::Circle(Circle::new(*center, radius)),
            Err(err) => {
                warn!("Probe shape unavailable: {}", err);
                return None;
            }
        }

        let mut contacts = Vec::new();
        let mut collect = |_: ShapeId, _: ShapeId, points: &[Vec2], _: Real, _: Real| {
            contacts.extend_from_slice(points);
        };
        let t = self.world.seconds_passed();
        match self.world.collide(self.obstacles, self.probe, t, self.time_window, Some(&mut collect)) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(err) => {
                warn!("Probe collision failed: {}", err);
                return None;
            }
        }

        contacts
            .into_iter()
            .min_by(|a, b| (a - center).norm_squared().total_cmp(&(b - center).norm_squared()))
    }
}

impl Drop for ClosestPointFinder<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.world.release(self.probe) {
            warn!("Failed to release closest point probe: {}", err);
        }
    }
}
