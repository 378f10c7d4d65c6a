//! Collision and containment queries
//!
//! Both queries dispatch on the receiver first: a group iterates its members
//! under the clock budget, a simple shape runs the exact test. A query never
//! changes geometry; only the actions it runs may.

use crate::error::ShapeResult;
use crate::foundation::collections::ShapeId;
use crate::foundation::logging::trace;
use crate::foundation::math::{Real, Vec2};
use crate::shapes::{CollisionAction, ShapeAction};

use super::ShapeWorld;

impl ShapeWorld {
    /// Test `id` against `other` in the time window `[t, t + dt]`
    ///
    /// On every simple pair found to overlap, `action` runs with the contact
    /// points. Without an explicit action the receiver's stored collision
    /// action runs, then the other shape's.
    ///
    /// A group receiver tests its members one by one, skipping `other`
    /// itself, and stops once the clock passes `t + dt`. Iteration continues
    /// after hits; the result is true when any member hit.
    pub fn collide(
        &mut self,
        id: ShapeId,
        other: ShapeId,
        t: Real,
        dt: Real,
        mut action: Option<&mut dyn CollisionAction>,
    ) -> ShapeResult<bool> {
        self.node_mut(id)?.kind.refresh();
        self.node_mut(other)?.kind.refresh();

        if let Some(group) = self.node(id)?.kind.as_group() {
            let members = group.members().to_vec();
            let mut hit = false;
            for member in members {
                if member == other {
                    continue;
                }
                if self.clock.seconds_passed() > t + dt {
                    trace!("Collision budget of group {:?} exhausted", id);
                    break;
                }
                // An action may have removed the member in the meantime
                if !self.nodes.contains_key(member) || !self.nodes.contains_key(other) {
                    continue;
                }
                hit |= self.collide(member, other, t, dt, action.as_mut().map(|a| &mut **a as _))?;
            }
            return Ok(hit);
        }

        if !self.node(other)?.kind.is_simple() {
            return self.collide(other, id, t, dt, action);
        }

        let mut points = Vec::new();
        let hit = {
            let own = &self.node(id)?.kind;
            let theirs = &self.node(other)?.kind;
            if !own.bounding_box().intersects(&theirs.bounding_box()) {
                return Ok(false);
            }
            match (own.primitive(), theirs.primitive()) {
                (Some(own), Some(theirs)) => theirs.intersection(&own, &mut points),
                _ => false,
            }
        };
        if !hit {
            return Ok(false);
        }

        match action {
            Some(action) => action.execute(id, other, &points, t, dt),
            None => {
                self.run_collision_action(id, other, &points, t, dt);
                self.run_collision_action(other, id, &points, t, dt);
            }
        }
        Ok(true)
    }

    fn run_collision_action(&mut self, id: ShapeId, other: ShapeId, points: &[Vec2], t: Real, dt: Real) {
        if let Some(action) = self.nodes.get_mut(id).and_then(|n| n.actions.collision.as_mut()) {
            action.execute(id, other, points, t, dt);
        }
    }

    /// Check whether `point` lies inside `id` in the time window `[t, t + dt]`
    ///
    /// On a hit `action` runs on the containing shape, or the shape's stored
    /// inside action when no explicit action is given. Groups test their
    /// members under the same clock budget as [`ShapeWorld::collide`].
    pub fn inside(
        &mut self,
        id: ShapeId,
        point: &Vec2,
        t: Real,
        dt: Real,
        mut action: Option<&mut dyn ShapeAction>,
    ) -> ShapeResult<bool> {
        let node = self.node_mut(id)?;
        node.kind.refresh();

        if let Some(group) = node.kind.as_group() {
            let members = group.members().to_vec();
            let mut hit = false;
            for member in members {
                if self.clock.seconds_passed() > t + dt {
                    trace!("Containment budget of group {:?} exhausted", id);
                    break;
                }
                if !self.nodes.contains_key(member) {
                    continue;
                }
                hit |= self.inside(member, point, t, dt, action.as_mut().map(|a| &mut **a as _))?;
            }
            return Ok(hit);
        }

        let contained = node.kind.bounding_box().contains_point(point) &&
            node.kind.primitive().is_some_and(|p| p.contains_point(point));
        if !contained {
            return Ok(false);
        }

        match action {
            Some(action) => action.execute(id, &mut node.kind, t, dt),
            None => {
                if let Some(stored) = node.actions.inside.as_mut() {
                    stored.execute(id, &mut node.kind, t, dt);
                }
            }
        }
        node.kind.refresh();
        self.refresh_ancestor_bounds(id);
        Ok(true)
    }
}
