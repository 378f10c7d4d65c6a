//! Shape arena, ownership and lifecycle
//!
//! Every shape lives in a [`ShapeWorld`] and is addressed by a [`ShapeId`].
//! The world owns everything that relates shapes to each other:
//!
//! - ownership shares: a shape is destroyed when its last share is released
//! - group membership: a group holds one share of each member
//! - listener registrations: groups and external observers hear about
//!   destroyed and killed shapes
//! - release pools: deferred releases drained in one go
//!
//! Queries (`collide`, `inside`) live in [`queries`], per-frame work
//! (`update`, `do_planning`, `draw`) in [`frame`].

pub mod queries;
pub mod frame;

use crate::error::{ShapeError, ShapeResult};
use crate::foundation::collections::{ObserverId, ShapeId, ShapeMap, SlotMap};
use crate::foundation::logging::{debug, trace, warn};
use crate::foundation::math::Real;
use crate::foundation::time::{Clock, SystemClock};
use crate::geometry::Rect;
use crate::shapes::{
    CollisionAction, Listener, ShapeAction, ShapeActions, ShapeEvent, ShapeKind, ShapeListener,
};

/// Arena entry of a shape
#[derive(Debug)]
struct ShapeNode {
    kind: ShapeKind,
    ref_count: usize,
    listeners: Vec<Listener>,
    depth: i32,
    visible: bool,
    killed: bool,
    name: Option<String>,
    actions: ShapeActions,
}

impl ShapeNode {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ref_count: 1,
            listeners: Vec::new(),
            depth: 0,
            visible: true,
            killed: false,
            name: None,
            actions: ShapeActions::default(),
        }
    }
}

/// Owner of all shapes and their relationships
pub struct ShapeWorld {
    nodes: ShapeMap<ShapeNode>,
    observers: SlotMap<ObserverId, Box<dyn ShapeListener>>,
    pools: Vec<Vec<ShapeId>>,
    clock: Box<dyn Clock>,
}

impl Default for ShapeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShapeWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeWorld")
            .field("shapes", &self.nodes.len())
            .field("observers", &self.observers.len())
            .field("pools", &self.pools.len())
            .finish()
    }
}

impl ShapeWorld {
    /// Create an empty world timed by the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }

    /// Create an empty world timed by `clock`
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            nodes: ShapeMap::with_key(),
            observers: SlotMap::with_key(),
            pools: Vec::new(),
            clock: Box::new(clock),
        }
    }

    /// Seconds reported by the world's clock
    pub fn seconds_passed(&self) -> Real {
        self.clock.seconds_passed()
    }

    /// Number of live shapes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the world holds no shapes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether `id` names a live shape
    pub fn contains(&self, id: ShapeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn node(&self, id: ShapeId) -> ShapeResult<&ShapeNode> {
        self.nodes.get(id).ok_or(ShapeError::UnknownShape(id))
    }

    fn node_mut(&mut self, id: ShapeId) -> ShapeResult<&mut ShapeNode> {
        self.nodes.get_mut(id).ok_or(ShapeError::UnknownShape(id))
    }

    // ---- creation and ownership ----

    /// Register a shape, returning its handle with one ownership share held
    /// by the caller
    pub fn create(&mut self, kind: impl Into<ShapeKind>) -> ShapeResult<ShapeId> {
        let mut kind = kind.into();
        kind.validate()?;
        if let Some(group) = kind.as_group() {
            if !group.is_empty() {
                return Err(ShapeError::InvalidGeometry(
                    "groups must be created empty and filled with add_kid".to_string(),
                ));
            }
        }
        kind.refresh();

        let type_name = kind.type_name();
        let id = self.nodes.insert(ShapeNode::new(kind));
        trace!("Created {} {:?}", type_name, id);
        Ok(id)
    }

    /// Take an additional ownership share
    pub fn retain(&mut self, id: ShapeId) -> ShapeResult<()> {
        self.node_mut(id)?.ref_count += 1;
        Ok(())
    }

    /// Give up one ownership share, destroying the shape when none remain
    ///
    /// Returns true when this call destroyed the shape.
    pub fn release(&mut self, id: ShapeId) -> ShapeResult<bool> {
        let node = self.node_mut(id)?;
        node.ref_count -= 1;
        if node.ref_count > 0 {
            return Ok(false);
        }
        self.destroy(id);
        Ok(true)
    }

    /// Number of ownership shares currently held
    pub fn ref_count(&self, id: ShapeId) -> ShapeResult<usize> {
        Ok(self.node(id)?.ref_count)
    }

    fn destroy(&mut self, id: ShapeId) {
        let listeners = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.listeners),
            None => return,
        };

        for listener in listeners {
            match listener {
                Listener::Observer(observer) => self.notify_observer(observer, id, ShapeEvent::Destroyed),
                // A member is kept alive by its group's share, so this only
                // happens when the share was released behind the group's back
                Listener::Group(group) => self.forget_member(group, id),
            }
        }

        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        debug!("Destroyed {} {:?} ({})", node.kind.type_name(), id, node.name.as_deref().unwrap_or("unnamed"));

        if let ShapeKind::Group(group) = node.kind {
            for &member in group.members() {
                self.unregister(member, Listener::Group(id));
                if let Err(err) = self.release(member) {
                    warn!("Destroyed group {:?} held stale member: {}", id, err);
                }
            }
        }
    }

    /// Logically remove a shape from play
    ///
    /// Observers hear `shape_killed`, then every group holding the shape drops
    /// it and releases its share. The caller's own shares are untouched, so
    /// the shape survives if anybody else still owns it.
    pub fn kill(&mut self, id: ShapeId) -> ShapeResult<()> {
        let node = self.node_mut(id)?;
        node.killed = true;
        let listeners = node.listeners.clone();
        debug!("Killed {:?}", id);

        for listener in &listeners {
            if let Listener::Observer(observer) = *listener {
                self.notify_observer(observer, id, ShapeEvent::Killed);
            }
        }
        for listener in &listeners {
            if let Listener::Group(group) = *listener {
                if self.nodes.contains_key(group) {
                    self.remove_kid(group, id)?;
                }
            }
        }
        Ok(())
    }

    /// Check whether the shape was killed
    pub fn is_killed(&self, id: ShapeId) -> ShapeResult<bool> {
        Ok(self.node(id)?.killed)
    }

    // ---- release pools ----

    /// Open a release pool nested inside the current one
    pub fn push_release_pool(&mut self) {
        self.pools.push(Vec::new());
    }

    /// Defer one release of `id` to the innermost open pool
    pub fn autorelease(&mut self, id: ShapeId) -> ShapeResult<()> {
        self.node(id)?;
        let pool = self.pools.last_mut().ok_or(ShapeError::NoReleasePool)?;
        pool.push(id);
        Ok(())
    }

    /// Close the innermost pool, releasing everything deferred into it
    pub fn pop_release_pool(&mut self) -> ShapeResult<()> {
        let pool = self.pools.pop().ok_or(ShapeError::NoReleasePool)?;
        trace!("Draining release pool of {} shapes", pool.len());
        for id in pool {
            self.release(id)?;
        }
        Ok(())
    }

    /// Run `f` inside a fresh release pool, draining it afterwards
    pub fn with_release_pool<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> ShapeResult<R> {
        self.push_release_pool();
        let result = f(self);
        self.pop_release_pool()?;
        Ok(result)
    }

    // ---- shape access ----

    /// Geometry of a shape
    pub fn shape(&self, id: ShapeId) -> ShapeResult<&ShapeKind> {
        Ok(&self.node(id)?.kind)
    }

    /// Mutable geometry of a shape
    ///
    /// Group membership cannot be changed through this reference; use
    /// [`ShapeWorld::add_kid`] and [`ShapeWorld::remove_kid`]. Aggregate
    /// boxes of groups holding the shape are left as they were until the
    /// next [`ShapeWorld::update`] of those groups; use
    /// [`ShapeWorld::modify_shape`] to have them follow right away.
    pub fn shape_mut(&mut self, id: ShapeId) -> ShapeResult<&mut ShapeKind> {
        Ok(&mut self.node_mut(id)?.kind)
    }

    /// Change a shape's geometry through `f`, then bring the aggregate boxes
    /// of every group holding it up to date
    pub fn modify_shape<R>(&mut self, id: ShapeId, f: impl FnOnce(&mut ShapeKind) -> R) -> ShapeResult<R> {
        let node = self.node_mut(id)?;
        let result = f(&mut node.kind);
        node.kind.refresh();
        self.refresh_ancestor_bounds(id);
        Ok(result)
    }

    /// Current bounding box of a shape
    pub fn bounding_box(&self, id: ShapeId) -> ShapeResult<Rect> {
        Ok(self.node(id)?.kind.bounding_box())
    }

    /// Check whether the shape is a primitive rather than a group
    pub fn is_simple(&self, id: ShapeId) -> ShapeResult<bool> {
        Ok(self.node(id)?.kind.is_simple())
    }

    /// Draw order key; higher depths are drawn first
    pub fn depth(&self, id: ShapeId) -> ShapeResult<i32> {
        Ok(self.node(id)?.depth)
    }

    /// Set the draw order key
    pub fn set_depth(&mut self, id: ShapeId, depth: i32) -> ShapeResult<()> {
        self.node_mut(id)?.depth = depth;
        Ok(())
    }

    /// Check whether the shape is drawn
    pub fn is_visible(&self, id: ShapeId) -> ShapeResult<bool> {
        Ok(self.node(id)?.visible)
    }

    /// Show or hide the shape
    pub fn set_visible(&mut self, id: ShapeId, visible: bool) -> ShapeResult<()> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    /// Debug name of the shape
    pub fn name(&self, id: ShapeId) -> ShapeResult<Option<&str>> {
        Ok(self.node(id)?.name.as_deref())
    }

    /// Set the debug name of the shape
    pub fn set_name(&mut self, id: ShapeId, name: impl Into<String>) -> ShapeResult<()> {
        self.node_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Install the shape's default collision action
    pub fn set_collision_action(
        &mut self,
        id: ShapeId,
        action: impl CollisionAction + 'static,
    ) -> ShapeResult<()> {
        self.node_mut(id)?.actions.collision = Some(Box::new(action));
        Ok(())
    }

    /// Install the shape's default containment action
    pub fn set_inside_action(&mut self, id: ShapeId, action: impl ShapeAction + 'static) -> ShapeResult<()> {
        self.node_mut(id)?.actions.inside = Some(Box::new(action));
        Ok(())
    }

    /// Install the action run after each update of the shape
    pub fn set_update_action(&mut self, id: ShapeId, action: impl ShapeAction + 'static) -> ShapeResult<()> {
        self.node_mut(id)?.actions.update = Some(Box::new(action));
        Ok(())
    }

    /// Install the action run when the shape receives a planning step
    pub fn set_plan_action(&mut self, id: ShapeId, action: impl ShapeAction + 'static) -> ShapeResult<()> {
        self.node_mut(id)?.actions.plan = Some(Box::new(action));
        Ok(())
    }

    /// Remove every stored action of the shape
    pub fn clear_actions(&mut self, id: ShapeId) -> ShapeResult<()> {
        self.node_mut(id)?.actions = ShapeActions::default();
        Ok(())
    }

    // ---- groups ----

    /// Members of a group in insertion order
    pub fn members(&self, group: ShapeId) -> ShapeResult<&[ShapeId]> {
        let node = self.node(group)?;
        node.kind.as_group().map(|g| g.members()).ok_or(ShapeError::NotAGroup(group))
    }

    /// Add `kid` to `group`
    ///
    /// The group takes one ownership share of `kid` and listens to it.
    /// Returns false when `kid` already was a member.
    pub fn add_kid(&mut self, group: ShapeId, kid: ShapeId) -> ShapeResult<bool> {
        self.node(kid)?;
        let node = self.node(group)?;
        let members = node.kind.as_group().ok_or(ShapeError::NotAGroup(group))?;
        if members.contains(kid) {
            return Ok(false);
        }
        if group == kid || self.reaches(kid, group) {
            warn!("Rejected adding {:?} to group {:?}: cycle", kid, group);
            return Err(ShapeError::WouldCreateCycle { group, kid });
        }

        let kid_node = self.node_mut(kid)?;
        kid_node.kind.refresh();
        kid_node.ref_count += 1;
        kid_node.listeners.push(Listener::Group(group));
        let bbox = kid_node.kind.bounding_box();

        if let Some(members) = self.node_mut(group)?.kind.as_group_mut() {
            members.insert(kid, &bbox);
        }
        trace!("Added {:?} to group {:?}", kid, group);
        Ok(true)
    }

    /// Remove `kid` from `group`, releasing the group's share of it
    ///
    /// Returns false when `kid` was not a member.
    pub fn remove_kid(&mut self, group: ShapeId, kid: ShapeId) -> ShapeResult<bool> {
        let node = self.node_mut(group)?;
        let members = node.kind.as_group_mut().ok_or(ShapeError::NotAGroup(group))?;
        if !members.remove(kid) {
            return Ok(false);
        }

        self.unregister(kid, Listener::Group(group));
        self.recompute_group_bounds(group);
        self.release(kid)?;
        trace!("Removed {:?} from group {:?}", kid, group);
        Ok(true)
    }

    /// Check whether `target` is `root` or nested somewhere inside it
    fn reaches(&self, root: ShapeId, target: ShapeId) -> bool {
        if root == target {
            return true;
        }
        let Some(group) = self.nodes.get(root).and_then(|n| n.kind.as_group()) else {
            return false;
        };
        group.members().iter().any(|&member| self.reaches(member, target))
    }

    /// Drop `member` from `group` without touching ownership
    fn forget_member(&mut self, group: ShapeId, member: ShapeId) {
        let Some(node) = self.nodes.get_mut(group) else {
            return;
        };
        let Some(members) = node.kind.as_group_mut() else {
            return;
        };
        if !members.contains(member) {
            return;
        }
        members.shape_destroyed(member);
        self.recompute_group_bounds(group);
    }

    /// Recompute the aggregate box of every group holding `id`, outwards
    pub(crate) fn refresh_ancestor_bounds(&mut self, id: ShapeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let groups: Vec<ShapeId> = node.listeners
            .iter()
            .filter_map(|l| match *l {
                Listener::Group(group) => Some(group),
                Listener::Observer(_) => None,
            })
            .collect();

        for group in groups {
            self.recompute_group_bounds(group);
            self.refresh_ancestor_bounds(group);
        }
    }

    /// Set a group's aggregate box to the union of its members' boxes
    fn recompute_group_bounds(&mut self, group: ShapeId) {
        let Some(members) = self.nodes.get(group).and_then(|n| n.kind.as_group()) else {
            return;
        };
        let bbox = members
            .members()
            .iter()
            .filter_map(|&m| self.nodes.get(m))
            .map(|n| n.kind.bounding_box())
            .fold(Rect::empty(), |acc, b| acc.union(&b));

        if let Some(members) = self.nodes.get_mut(group).and_then(|n| n.kind.as_group_mut()) {
            members.set_bounding_box(bbox);
        }
    }

    // ---- observers ----

    /// Register an external listener, returning its handle
    pub fn add_observer(&mut self, listener: impl ShapeListener + 'static) -> ObserverId {
        self.observers.insert(Box::new(listener))
    }

    /// Unregister an external listener and detach it from every shape
    pub fn remove_observer(&mut self, observer: ObserverId) -> ShapeResult<Box<dyn ShapeListener>> {
        let listener = self.observers.remove(observer).ok_or(ShapeError::UnknownObserver(observer))?;
        for node in self.nodes.values_mut() {
            node.listeners.retain(|l| *l != Listener::Observer(observer));
        }
        Ok(listener)
    }

    /// Make `observer` hear lifecycle events of `shape`
    pub fn listen(&mut self, shape: ShapeId, observer: ObserverId) -> ShapeResult<()> {
        if !self.observers.contains_key(observer) {
            return Err(ShapeError::UnknownObserver(observer));
        }
        let node = self.node_mut(shape)?;
        let listener = Listener::Observer(observer);
        if !node.listeners.contains(&listener) {
            node.listeners.push(listener);
        }
        Ok(())
    }

    /// Stop `observer` hearing lifecycle events of `shape`
    pub fn unlisten(&mut self, shape: ShapeId, observer: ObserverId) -> ShapeResult<()> {
        self.node(shape)?;
        self.unregister(shape, Listener::Observer(observer));
        Ok(())
    }

    fn unregister(&mut self, shape: ShapeId, listener: Listener) {
        if let Some(node) = self.nodes.get_mut(shape) {
            node.listeners.retain(|l| *l != listener);
        }
    }

    fn notify_observer(&mut self, observer: ObserverId, shape: ShapeId, event: ShapeEvent) {
        if let Some(listener) = self.observers.get_mut(observer) {
            listener.on_event(shape, event);
        }
    }
}
