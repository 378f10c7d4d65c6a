//! Rendering interface
//!
//! The engine never rasterizes anything itself. [`ShapeWorld::draw`](crate::world::ShapeWorld::draw)
//! walks the visible part of the shape graph and hands each primitive to a
//! [`Renderer`] supplied by the caller.

use crate::foundation::collections::ShapeId;
use crate::foundation::math::Vec2;
use crate::geometry::{Circle, Rect, Segment};

/// Receiver of draw calls, one per visible simple shape
pub trait Renderer {
    /// Draw a solid disc
    fn draw_circle(&mut self, shape: ShapeId, circle: &Circle);

    /// Draw an axis-aligned rectangle
    fn draw_rect(&mut self, shape: ShapeId, rect: &Rect);

    /// Draw a line segment
    fn draw_segment(&mut self, shape: ShapeId, segment: &Segment);

    /// Draw a convex polygon given as a cyclic vertex list
    fn draw_polygon(&mut self, shape: ShapeId, points: &[Vec2]);
}

/// A recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Disc
    Circle {
        /// Shape that issued the call
        shape: ShapeId,
        /// Geometry
        circle: Circle,
    },

    /// Rectangle
    Rect {
        /// Shape that issued the call
        shape: ShapeId,
        /// Geometry
        rect: Rect,
    },

    /// Segment
    Segment {
        /// Shape that issued the call
        shape: ShapeId,
        /// Geometry
        segment: Segment,
    },

    /// Polygon
    Polygon {
        /// Shape that issued the call
        shape: ShapeId,
        /// World-space vertices
        points: Vec<Vec2>,
    },
}

impl DrawCommand {
    /// Shape that issued the call
    pub fn shape(&self) -> ShapeId {
        match self {
            DrawCommand::Circle { shape, .. } => *shape,
            DrawCommand::Rect { shape, .. } => *shape,
            DrawCommand::Segment { shape, .. } => *shape,
            DrawCommand::Polygon { shape, .. } => *shape,
        }
    }
}

/// Renderer that records every call, for debugging and tests
#[derive(Clone, Debug, Default)]
pub struct DrawRecorder {
    commands: Vec<DrawCommand>,
}

impl DrawRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Shapes in the order they were drawn
    pub fn drawn_shapes(&self) -> Vec<ShapeId> {
        self.commands.iter().map(DrawCommand::shape).collect()
    }

    /// Forget all recorded calls
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for DrawRecorder {
    fn draw_circle(&mut self, shape: ShapeId, circle: &Circle) {
        self.commands.push(DrawCommand::Circle { shape, circle: *circle });
    }

    fn draw_rect(&mut self, shape: ShapeId, rect: &Rect) {
        self.commands.push(DrawCommand::Rect { shape, rect: *rect });
    }

    fn draw_segment(&mut self, shape: ShapeId, segment: &Segment) {
        self.commands.push(DrawCommand::Segment { shape, segment: *segment });
    }

    fn draw_polygon(&mut self, shape: ShapeId, points: &[Vec2]) {
        self.commands.push(DrawCommand::Polygon { shape, points: points.to_vec() });
    }
}
