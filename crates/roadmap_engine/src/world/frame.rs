//! Per-frame work: update, planning and drawing

use std::cmp::Reverse;

use crate::error::ShapeResult;
use crate::foundation::collections::ShapeId;
use crate::foundation::math::Real;
use crate::geometry::Rect;
use crate::render::Renderer;
use crate::shapes::ShapeKind;

use super::ShapeWorld;

impl ShapeWorld {
    /// Advance a shape by `dt` seconds, then run its update action
    ///
    /// Groups update every member and afterwards reset their aggregate box
    /// to the union of the members' boxes.
    pub fn update(&mut self, id: ShapeId, t: Real, dt: Real) -> ShapeResult<()> {
        let members = self.node(id)?.kind.as_group().map(|g| g.members().to_vec());
        match members {
            Some(members) => {
                for member in members {
                    if self.nodes.contains_key(member) {
                        self.update(member, t, dt)?;
                    }
                }
                self.recompute_group_bounds(id);
            }
            None => self.node_mut(id)?.kind.advance(dt),
        }

        if let Some(node) = self.nodes.get_mut(id) {
            if let Some(action) = node.actions.update.as_mut() {
                action.execute(id, &mut node.kind, t, dt);
            }
        }
        Ok(())
    }

    /// Give one planning step to a shape
    ///
    /// A simple shape runs its plan action. A group hands the step to the
    /// member under its round-robin cursor and moves the cursor on, so each
    /// member is planned once every `len` steps. Empty groups do nothing.
    /// Groups holding the planned shape get their aggregate box refreshed.
    pub fn do_planning(&mut self, id: ShapeId, t: Real, dt: Real) -> ShapeResult<()> {
        let node = self.node_mut(id)?;
        if let Some(group) = node.kind.as_group_mut() {
            return match group.next_shape() {
                Some(next) => self.do_planning(next, t, dt),
                None => Ok(()),
            };
        }

        if let Some(action) = node.actions.plan.as_mut() {
            action.execute(id, &mut node.kind, t, dt);
            node.kind.refresh();
            self.refresh_ancestor_bounds(id);
        }
        Ok(())
    }

    /// Submit a shape to `renderer` if it is visible and overlaps `view`
    ///
    /// Groups draw their members in descending depth order, ties kept in
    /// insertion order. A hidden group hides all of its members.
    pub fn draw(&self, id: ShapeId, view: &Rect, renderer: &mut dyn Renderer) -> ShapeResult<()> {
        let node = self.node(id)?;
        if !node.visible {
            return Ok(());
        }

        if let ShapeKind::Group(group) = &node.kind {
            let mut members = group.members().to_vec();
            members.sort_by_key(|&m| Reverse(self.nodes.get(m).map_or(0, |n| n.depth)));
            for member in members {
                self.draw(member, view, renderer)?;
            }
            return Ok(());
        }

        if !node.kind.bounding_box().intersects(view) {
            return Ok(());
        }
        match &node.kind {
            ShapeKind::Circle(circle) => renderer.draw_circle(id, circle),
            ShapeKind::Rect(rect) => renderer.draw_rect(id, rect),
            ShapeKind::Segment(segment) => renderer.draw_segment(id, segment),
            ShapeKind::Sprite(sprite) => renderer.draw_polygon(id, &sprite.collision_polygon()),
            ShapeKind::Group(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::foundation::math::Vec2;
    use crate::geometry::Circle;
    use crate::render::{DrawCommand, DrawRecorder};
    use crate::shapes::{Group, MotionState, Sprite};

    fn everywhere() -> Rect {
        Rect::from_bounds(-1000.0, -1000.0, 1000.0, 1000.0)
    }

    fn planned_log(world: &mut ShapeWorld, ids: &[ShapeId]) -> Rc<RefCell<Vec<ShapeId>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &id in ids {
            let log = log.clone();
            world
                .set_plan_action(id, move |id: ShapeId, _: &mut ShapeKind, _: Real, _: Real| {
                    log.borrow_mut().push(id)
                })
                .unwrap();
        }
        log
    }

    fn group_of_circles(world: &mut ShapeWorld, n: usize) -> (ShapeId, Vec<ShapeId>) {
        let group = world.create(Group::new()).unwrap();
        let members = (0..n)
            .map(|i| {
                let c = world.create(Circle::new(Vec2::new(i as f64 * 3.0, 0.0), 1.0)).unwrap();
                world.add_kid(group, c).unwrap();
                world.release(c).unwrap();
                c
            })
            .collect();
        (group, members)
    }

    #[test]
    fn test_update_moves_sprites_and_refreshes_group_box() {
        let mut world = ShapeWorld::new();
        let group = world.create(Group::new()).unwrap();
        let sprite = world
            .create(Sprite::new(
                Sprite::default().model_polygon().to_vec(),
                MotionState::heading(Vec2::zeros(), 0.0, 2.0),
            ))
            .unwrap();
        world.add_kid(group, sprite).unwrap();

        world.update(group, 0.0, 1.5).unwrap();
        let bbox = world.bounding_box(group).unwrap();
        assert_abs_diff_eq!(bbox.min, Vec2::new(2.0, -1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(bbox.max, Vec2::new(4.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_update_of_empty_group_is_noop() {
        let mut world = ShapeWorld::new();
        let group = world.create(Group::new()).unwrap();
        world.update(group, 0.0, 1.0).unwrap();
        assert!(world.bounding_box(group).unwrap().is_empty());
    }

    #[test]
    fn test_update_action_runs_after_advance() {
        let mut world = ShapeWorld::new();
        let sprite = world.create(Sprite::default()).unwrap();
        world.shape_mut(sprite).unwrap().as_sprite_mut().unwrap().set_velocity(Vec2::new(1.0, 0.0));
        world
            .set_update_action(sprite, |_: ShapeId, kind: &mut ShapeKind, _: Real, _: Real| {
                if let Some(sprite) = kind.as_sprite_mut() {
                    sprite.set_velocity(Vec2::zeros());
                }
            })
            .unwrap();

        world.update(sprite, 0.0, 1.0).unwrap();
        world.update(sprite, 1.0, 1.0).unwrap();
        let position = world.shape(sprite).unwrap().as_sprite().unwrap().position();
        assert_abs_diff_eq!(position, Vec2::new(1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_round_robin_is_fair() {
        let mut world = ShapeWorld::new();
        let (group, members) = group_of_circles(&mut world, 3);
        let log = planned_log(&mut world, &members);

        for step in 0..9 {
            world.do_planning(group, step as f64, 1.0).unwrap();
        }
        let log = log.borrow();
        for member in &members {
            assert_eq!(log.iter().filter(|&&id| id == *member).count(), 3);
        }
        assert_eq!(&log[..3], &members[..]);
    }

    #[test]
    fn test_removing_planned_member_skips_nothing() {
        let mut world = ShapeWorld::new();
        let (group, members) = group_of_circles(&mut world, 4);
        let log = planned_log(&mut world, &members);

        world.do_planning(group, 0.0, 1.0).unwrap();
        // Cursor now targets members[1]
        world.remove_kid(group, members[1]).unwrap();
        for _ in 0..3 {
            world.do_planning(group, 0.0, 1.0).unwrap();
        }
        assert_eq!(*log.borrow(), vec![members[0], members[2], members[3], members[0]]);
        assert!(!world.contains(members[1]));
    }

    #[test]
    fn test_destroyed_members_are_never_planned() {
        let mut world = ShapeWorld::new();
        let (group, members) = group_of_circles(&mut world, 3);
        let log = planned_log(&mut world, &members);

        world.kill(members[2]).unwrap();
        for _ in 0..4 {
            world.do_planning(group, 0.0, 1.0).unwrap();
        }
        assert!(!log.borrow().contains(&members[2]));
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn test_nested_groups_run_their_own_round_robin() {
        let mut world = ShapeWorld::new();
        let (inner, inner_members) = group_of_circles(&mut world, 2);
        let outer = world.create(Group::new()).unwrap();
        let single = world.create(Circle::new(Vec2::zeros(), 1.0)).unwrap();
        world.add_kid(outer, inner).unwrap();
        world.add_kid(outer, single).unwrap();
        let log = planned_log(&mut world, &[inner_members[0], inner_members[1], single]);

        for _ in 0..4 {
            world.do_planning(outer, 0.0, 1.0).unwrap();
        }
        assert_eq!(
            *log.borrow(),
            vec![inner_members[0], single, inner_members[1], single]
        );
    }

    #[test]
    fn test_empty_group_planning_is_noop() {
        let mut world = ShapeWorld::new();
        let group = world.create(Group::new()).unwrap();
        world.do_planning(group, 0.0, 1.0).unwrap();
    }

    #[test]
    fn test_draw_orders_by_depth_descending() {
        let mut world = ShapeWorld::new();
        let (group, members) = group_of_circles(&mut world, 4);
        world.set_depth(members[0], 1).unwrap();
        world.set_depth(members[1], 5).unwrap();
        world.set_depth(members[2], 1).unwrap();
        world.set_depth(members[3], 2).unwrap();

        let mut recorder = DrawRecorder::new();
        world.draw(group, &everywhere(), &mut recorder).unwrap();
        assert_eq!(
            recorder.drawn_shapes(),
            vec![members[1], members[3], members[0], members[2]]
        );

        // Order is recomputed on every call
        world.set_depth(members[2], 9).unwrap();
        recorder.clear();
        world.draw(group, &everywhere(), &mut recorder).unwrap();
        assert_eq!(recorder.drawn_shapes()[0], members[2]);
    }

    #[test]
    fn test_draw_skips_hidden_and_offscreen_shapes() {
        let mut world = ShapeWorld::new();
        let (group, members) = group_of_circles(&mut world, 3);
        world.set_visible(members[0], false).unwrap();

        let mut recorder = DrawRecorder::new();
        let view = Rect::from_bounds(2.5, -1.0, 4.0, 1.0);
        world.draw(group, &view, &mut recorder).unwrap();
        assert_eq!(
            recorder.commands(),
            &[DrawCommand::Circle { shape: members[1], circle: Circle::new(Vec2::new(3.0, 0.0), 1.0) }]
        );

        world.set_visible(group, false).unwrap();
        recorder.clear();
        world.draw(group, &everywhere(), &mut recorder).unwrap();
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn test_sprite_draws_world_polygon() {
        let mut world = ShapeWorld::new();
        let sprite = world.create(Sprite::default()).unwrap();
        world.shape_mut(sprite).unwrap().as_sprite_mut().unwrap().set_position(Vec2::new(5.0, 0.0));

        let mut recorder = DrawRecorder::new();
        world.draw(sprite, &everywhere(), &mut recorder).unwrap();
        match &recorder.commands()[0] {
            DrawCommand::Polygon { points, .. } => assert_eq!(points[0], Vec2::new(4.0, -1.0)),
            other => panic!("unexpected draw call {other:?}"),
        }
    }

    #[test]
    fn test_plan_action_refreshes_group_box() {
        let mut world = ShapeWorld::new();
        let group = world.create(Group::new()).unwrap();
        let sprite = world.create(Sprite::default()).unwrap();
        world.add_kid(group, sprite).unwrap();
        world
            .set_plan_action(sprite, |_: ShapeId, kind: &mut ShapeKind, _: Real, _: Real| {
                if let Some(sprite) = kind.as_sprite_mut() {
                    sprite.move_by(Vec2::new(0.0, 5.0));
                }
            })
            .unwrap();

        world.do_planning(group, 0.0, 0.1).unwrap();
        assert_eq!(world.bounding_box(group).unwrap(), Rect::from_bounds(-1.0, 4.0, 1.0, 6.0));
    }
}
