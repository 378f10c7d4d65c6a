//! Shape variants and their capability sets
//!
//! Collision dispatch only ever asks one question of a shape kind: is it
//! simple? Simple kinds expose a [`Primitive`] and are tested directly;
//! composite kinds iterate their members.

use crate::error::{ShapeError, ShapeResult};
use crate::foundation::math::{is_finite, Real, Vec2};
use crate::geometry::{Circle, Primitive, Rect, Segment};

use super::group::Group;
use super::sprite::Sprite;

bitflags::bitflags! {
    /// Operations a shape kind supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShapeCapabilities: u8 {
        /// Has a bounding box
        const BOUNDING_BOX = 1 << 0;
        /// Takes part in collision tests
        const COLLIDE = 1 << 1;
        /// Answers point containment
        const INSIDE = 1 << 2;
        /// Submits itself to a renderer
        const DRAW = 1 << 3;
        /// Changes state on update
        const UPDATE = 1 << 4;
        /// Receives planning steps
        const PLANNING = 1 << 5;
        /// Holds child shapes
        const CHILDREN = 1 << 6;
        /// Convex primitive tested directly, not by iteration
        const SIMPLE = 1 << 7;

        /// Capabilities shared by every shape
        const BASE = Self::BOUNDING_BOX.bits() | Self::COLLIDE.bits() | Self::INSIDE.bits()
            | Self::DRAW.bits() | Self::UPDATE.bits() | Self::PLANNING.bits();
    }
}

/// Geometry of a shape stored in the world
#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// Solid disc
    Circle(Circle),
    /// Solid axis-aligned rectangle
    Rect(Rect),
    /// Line segment
    Segment(Segment),
    /// Moving convex polygon
    Sprite(Sprite),
    /// Composite of other shapes
    Group(Group),
}

impl ShapeKind {
    /// Human readable name of the variant
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Circle(_) => "Circle",
            Self::Rect(_) => "Rect",
            Self::Segment(_) => "Segment",
            Self::Sprite(_) => "Sprite",
            Self::Group(_) => "Group",
        }
    }

    /// Supported operations
    pub fn capabilities(&self) -> ShapeCapabilities {
        match self {
            Self::Group(_) => ShapeCapabilities::BASE | ShapeCapabilities::CHILDREN,
            _ => ShapeCapabilities::BASE | ShapeCapabilities::SIMPLE,
        }
    }

    /// True for primitives, false for composites
    pub fn is_simple(&self) -> bool {
        self.capabilities().contains(ShapeCapabilities::SIMPLE)
    }

    /// Conservative axis-aligned box around the current geometry
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Circle(circle) => circle.bounding_box(),
            Self::Rect(rect) => *rect,
            Self::Segment(segment) => segment.bounding_box(),
            Self::Sprite(sprite) => sprite.bounding_box(),
            Self::Group(group) => group.bounding_box(),
        }
    }

    /// Geometry of a simple shape, `None` for composites
    pub fn primitive(&self) -> Option<Primitive<'_>> {
        match self {
            Self::Circle(circle) => Some(Primitive::Circle(*circle)),
            Self::Rect(rect) => Some(Primitive::Rect(*rect)),
            Self::Segment(segment) => Some(Primitive::Segment(*segment)),
            Self::Sprite(sprite) => Some(Primitive::Polygon(sprite.collision_polygon())),
            Self::Group(_) => None,
        }
    }

    /// Borrow as a group
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Mutably borrow as a group
    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Borrow as a sprite
    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Mutably borrow as a sprite
    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Advance the shape's own state by `dt` seconds
    pub(crate) fn advance(&mut self, dt: Real) {
        if let Self::Sprite(sprite) = self {
            sprite.advance(dt);
            sprite.refresh();
        }
    }

    /// Bring cached geometry up to date
    pub(crate) fn refresh(&mut self) {
        if let Self::Sprite(sprite) = self {
            sprite.refresh();
        }
    }

    /// Reject geometry the collision routines cannot work with
    pub fn validate(&self) -> ShapeResult<()> {
        match self {
            Self::Circle(circle) => {
                if !is_finite(&circle.center) || !circle.radius.is_finite() || circle.radius < 0.0 {
                    return Err(ShapeError::InvalidGeometry(format!("bad circle {circle:?}")));
                }
            }
            Self::Rect(rect) => {
                if !finite(&[rect.min, rect.max]) || rect.is_empty() {
                    return Err(ShapeError::InvalidGeometry(format!("bad rectangle {rect:?}")));
                }
            }
            Self::Segment(segment) => {
                if !finite(&[segment.start, segment.end]) {
                    return Err(ShapeError::InvalidGeometry(format!("bad segment {segment:?}")));
                }
            }
            Self::Sprite(sprite) => {
                let model = sprite.model_polygon();
                if model.is_empty() || !finite(model) {
                    return Err(ShapeError::InvalidGeometry(
                        "sprite polygon must have finite vertices".to_string(),
                    ));
                }
            }
            Self::Group(_) => {}
        }
        Ok(())
    }
}

fn finite(points: &[Vec2]) -> bool {
    points.iter().all(is_finite)
}

impl From<Circle> for ShapeKind {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<Rect> for ShapeKind {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Segment> for ShapeKind {
    fn from(segment: Segment) -> Self {
        Self::Segment(segment)
    }
}

impl From<Sprite> for ShapeKind {
    fn from(sprite: Sprite) -> Self {
        Self::Sprite(sprite)
    }
}

impl From<Group> for ShapeKind {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}
