//! Polygon-backed moving shape
//!
//! A sprite stores its collision polygon in model space and a motion state
//! describing where it currently is. The world-space polygon and bounding box
//! are derived on demand and cached until the motion state changes again.

use std::borrow::Cow;

use crate::foundation::math::{rotate_degrees, Real, Vec2};
use crate::geometry::Rect;

/// Unit square used when no model polygon is given
const DEFAULT_MODEL: [(Real, Real); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Position, rotation and their rates of change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    /// Position in world space
    pub position: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: Real,
    /// Angular velocity in degrees per second
    pub angular_velocity: Real,
    /// Angular acceleration in degrees per second squared
    pub angular_acceleration: Real,
}

impl Default for MotionState {
    fn default() -> Self {
        Self::at(Vec2::zeros())
    }
}

impl MotionState {
    /// Stationary state at `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::zeros(),
            rotation: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }

    /// State at `position` heading `degrees` with the given speed
    pub fn heading(position: Vec2, degrees: Real, speed: Real) -> Self {
        Self {
            position,
            velocity: rotate_degrees(&Vec2::new(speed, 0.0), degrees),
            rotation: degrees,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }

    /// Integrate the state forward by `dt` seconds
    ///
    /// Rotation moves at the angular velocity held at the start of the step;
    /// the angular acceleration then applies for the next one.
    pub fn advance(&mut self, dt: Real) {
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
        self.angular_velocity += self.angular_acceleration * dt;
    }

    /// Position after `dt` more seconds at the current velocity
    pub fn next_position(&self, dt: Real) -> Vec2 {
        self.position + self.velocity * dt
    }

    /// Magnitude of the velocity
    pub fn speed(&self) -> Real {
        self.velocity.norm()
    }

    /// Heading of travel in degrees
    ///
    /// Falls back to the rotation while stationary.
    pub fn direction(&self) -> Real {
        if self.velocity == Vec2::zeros() {
            self.rotation
        } else {
            self.velocity.y.atan2(self.velocity.x).to_degrees()
        }
    }

    /// Set the speed keeping the current heading
    pub fn set_speed(&mut self, speed: Real) {
        self.velocity = rotate_degrees(&Vec2::new(speed, 0.0), self.direction());
    }

    /// Head in `degrees` keeping the current speed, turning to face it
    pub fn set_direction(&mut self, degrees: Real) {
        self.velocity = rotate_degrees(&Vec2::new(self.speed(), 0.0), degrees);
        self.rotation = degrees;
    }

    /// Change the speed by `amount`, never below zero
    pub fn accelerate(&mut self, amount: Real) {
        self.set_speed((self.speed() + amount).max(0.0));
    }

    /// Travel the opposite way
    pub fn reverse(&mut self) {
        self.velocity = -self.velocity;
    }

    /// Halt movement and spinning
    pub fn stop(&mut self) {
        self.velocity = Vec2::zeros();
        self.angular_velocity = 0.0;
        self.angular_acceleration = 0.0;
    }
}

#[derive(Debug, Clone)]
struct WorldGeometry {
    polygon: Vec<Vec2>,
    bbox: Rect,
}

/// Shape whose collision geometry is a convex polygon carried by a motion state
#[derive(Debug, Clone)]
pub struct Sprite {
    model: Vec<Vec2>,
    state: MotionState,
    prev_position: Vec2,
    cache: WorldGeometry,
    dirty: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        let model = DEFAULT_MODEL.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        Self::new(model, MotionState::default())
    }
}

impl Sprite {
    /// Create a sprite from a model-space convex polygon and a motion state
    pub fn new(model: Vec<Vec2>, state: MotionState) -> Self {
        let mut sprite = Self {
            model,
            state,
            prev_position: state.position,
            cache: WorldGeometry { polygon: Vec::new(), bbox: Rect::empty() },
            dirty: true,
        };
        sprite.refresh();
        sprite
    }

    /// Create a stationary sprite whose model polygon is already in world space
    pub fn from_polygon(points: Vec<Vec2>) -> Self {
        Self::new(points, MotionState::default())
    }

    /// Model-space polygon
    pub fn model_polygon(&self) -> &[Vec2] {
        &self.model
    }

    /// Current motion state
    pub fn motion_state(&self) -> &MotionState {
        &self.state
    }

    /// Replace the motion state
    pub fn set_motion_state(&mut self, state: MotionState) {
        if self.state != state {
            self.state = state;
            self.touch();
        }
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    /// Position before the last move
    pub fn prev_position(&self) -> Vec2 {
        self.prev_position
    }

    /// Move to `position`
    pub fn set_position(&mut self, position: Vec2) {
        self.prev_position = self.state.position;
        self.state.position = position;
        self.touch();
    }

    /// Move by `delta`
    pub fn move_by(&mut self, delta: Vec2) {
        self.set_position(self.state.position + delta);
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    /// Set velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.state.velocity = velocity;
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> Real {
        self.state.rotation
    }

    /// Set rotation in degrees
    pub fn set_rotation(&mut self, degrees: Real) {
        if degrees != self.state.rotation {
            self.state.rotation = degrees;
            self.touch();
        }
    }

    /// Rotate by `degrees`
    pub fn rotate_by(&mut self, degrees: Real) {
        self.set_rotation(self.state.rotation + degrees);
    }

    /// Set angular velocity in degrees per second
    pub fn set_angular_velocity(&mut self, degrees_per_second: Real) {
        self.state.angular_velocity = degrees_per_second;
    }

    /// Set angular acceleration in degrees per second squared
    pub fn set_angular_acceleration(&mut self, degrees_per_second_sq: Real) {
        self.state.angular_acceleration = degrees_per_second_sq;
    }

    /// Current speed
    pub fn speed(&self) -> Real {
        self.state.speed()
    }

    /// Set the speed keeping the heading
    pub fn set_speed(&mut self, speed: Real) {
        self.state.set_speed(speed);
    }

    /// Heading of travel in degrees
    pub fn direction(&self) -> Real {
        self.state.direction()
    }

    /// Head and face `degrees`
    pub fn set_direction(&mut self, degrees: Real) {
        let rotation = self.state.rotation;
        self.state.set_direction(degrees);
        if rotation != degrees {
            self.touch();
        }
    }

    /// Change the speed by `amount`, never below zero
    pub fn accelerate(&mut self, amount: Real) {
        self.state.accelerate(amount);
    }

    /// Travel the opposite way
    pub fn reverse(&mut self) {
        self.state.reverse();
    }

    /// Halt movement and spinning
    pub fn stop(&mut self) {
        self.state.stop();
    }

    /// Position after `dt` more seconds at the current velocity
    pub fn next_position(&self, dt: Real) -> Vec2 {
        self.state.next_position(dt)
    }

    /// Advance the motion state by `dt` seconds
    pub fn advance(&mut self, dt: Real) {
        self.prev_position = self.state.position;
        self.state.advance(dt);
        self.touch();
    }

    /// Mark the cached world geometry as out of date
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    /// Check whether the cached world geometry is out of date
    pub fn touched(&self) -> bool {
        self.dirty
    }

    /// Recompute the cached world geometry if it is out of date
    pub fn refresh(&mut self) {
        if self.dirty {
            let polygon = self.world_polygon();
            self.cache = WorldGeometry { bbox: Rect::from_points(&polygon), polygon };
            self.dirty = false;
        }
    }

    /// World-space collision polygon
    ///
    /// Borrowed from the cache when it is current, computed otherwise.
    pub fn collision_polygon(&self) -> Cow<'_, [Vec2]> {
        if self.dirty {
            Cow::Owned(self.world_polygon())
        } else {
            Cow::Borrowed(&self.cache.polygon)
        }
    }

    /// World-space bounding box
    pub fn bounding_box(&self) -> Rect {
        if self.dirty {
            Rect::from_points(&self.world_polygon())
        } else {
            self.cache.bbox
        }
    }

    fn world_polygon(&self) -> Vec<Vec2> {
        self.model
            .iter()
            .map(|p| rotate_degrees(p, self.state.rotation) + self.state.position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_sprite_is_unit_square() {
        let sprite = Sprite::default();
        let bbox = sprite.bounding_box();
        assert_eq!(bbox.min, Vec2::new(-1.0, -1.0));
        assert_eq!(bbox.max, Vec2::new(1.0, 1.0));
        assert!(!sprite.touched());
    }

    #[test]
    fn test_bounding_box_never_stale() {
        let mut sprite = Sprite::default();
        sprite.set_position(Vec2::new(10.0, 0.0));
        assert!(sprite.touched());

        // Read before refresh still reflects the move
        assert_eq!(sprite.bounding_box().min, Vec2::new(9.0, -1.0));

        sprite.refresh();
        assert!(!sprite.touched());
        assert_eq!(sprite.bounding_box().max, Vec2::new(11.0, 1.0));
        assert_eq!(sprite.prev_position(), Vec2::zeros());
    }

    #[test]
    fn test_rotation_changes_polygon() {
        let mut sprite = Sprite::from_polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        sprite.set_rotation(90.0);
        let polygon = sprite.collision_polygon();
        assert_abs_diff_eq!(polygon[1], Vec2::new(0.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(polygon[2], Vec2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_advance_integrates_motion() {
        let mut sprite = Sprite::new(
            Sprite::default().model_polygon().to_vec(),
            MotionState::heading(Vec2::zeros(), 90.0, 2.0),
        );
        sprite.set_angular_velocity(10.0);
        sprite.advance(0.5);

        assert_abs_diff_eq!(sprite.position(), Vec2::new(0.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(sprite.rotation(), 95.0, epsilon = 1e-12);
        assert_eq!(sprite.prev_position(), Vec2::zeros());
    }

    #[test]
    fn test_speed_and_direction() {
        let mut state = MotionState::heading(Vec2::zeros(), 90.0, 2.0);
        assert_abs_diff_eq!(state.speed(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.direction(), 90.0, epsilon = 1e-12);

        state.set_speed(5.0);
        assert_abs_diff_eq!(state.velocity, Vec2::new(0.0, 5.0), epsilon = 1e-12);

        state.set_direction(180.0);
        assert_abs_diff_eq!(state.velocity, Vec2::new(-5.0, 0.0), epsilon = 1e-12);
        assert_eq!(state.rotation, 180.0);
        assert_abs_diff_eq!(state.next_position(2.0), Vec2::new(-10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_stationary_state_uses_rotation_as_heading() {
        let mut state = MotionState::at(Vec2::new(1.0, 1.0));
        state.rotation = 90.0;
        assert_eq!(state.direction(), 90.0);

        state.set_speed(3.0);
        assert_abs_diff_eq!(state.velocity, Vec2::new(0.0, 3.0), epsilon = 1e-12);
        assert_eq!(state.next_position(0.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_accelerate_reverse_and_stop() {
        let mut state = MotionState::heading(Vec2::zeros(), 0.0, 2.0);
        state.accelerate(1.5);
        assert_abs_diff_eq!(state.velocity, Vec2::new(3.5, 0.0), epsilon = 1e-12);

        state.accelerate(-10.0);
        assert_eq!(state.speed(), 0.0);

        state.set_speed(2.0);
        state.reverse();
        assert_abs_diff_eq!(state.velocity, Vec2::new(-2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(state.direction().abs(), 180.0, epsilon = 1e-12);

        state.angular_velocity = 30.0;
        state.angular_acceleration = 5.0;
        state.stop();
        assert_eq!(state.velocity, Vec2::zeros());
        assert_eq!(state.angular_velocity, 0.0);
        assert_eq!(state.angular_acceleration, 0.0);
    }

    #[test]
    fn test_angular_acceleration_ramps_spin() {
        let mut sprite = Sprite::default();
        sprite.set_angular_acceleration(20.0);
        sprite.advance(0.5);
        assert_eq!(sprite.rotation(), 0.0);
        assert_abs_diff_eq!(sprite.motion_state().angular_velocity, 10.0, epsilon = 1e-12);

        sprite.advance(0.5);
        assert_abs_diff_eq!(sprite.rotation(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sprite.motion_state().angular_velocity, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sprite_set_direction_turns_polygon() {
        let mut sprite = Sprite::new(
            Sprite::default().model_polygon().to_vec(),
            MotionState::heading(Vec2::zeros(), 0.0, 1.0),
        );
        assert!(!sprite.touched());
        sprite.set_direction(45.0);
        assert!(sprite.touched());
        assert_abs_diff_eq!(sprite.direction(), 45.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sprite.speed(), 1.0, epsilon = 1e-12);

        sprite.stop();
        assert_eq!(sprite.next_position(3.0), sprite.position());
    }
}
