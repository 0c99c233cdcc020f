//! CPU-side line batching
//!
//! [`LineBatch`] is the [`DebugDraw`] sink the scenes draw into. Every
//! primitive is flattened into pairs of [`LineVertex`] for the line pipeline.

use std::f32::consts::TAU;

use wheel_math::{Color, Transform2D, Vec2};
use wheel_physics::DebugDraw;

use crate::pipeline::LineVertex;

/// Segments used to approximate a circle
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 16;

/// Length of the axes drawn for a transform, in meters
const TRANSFORM_AXIS_LENGTH: f32 = 0.4;

/// Accumulates line-list vertices for one frame
#[derive(Clone, Debug)]
pub struct LineBatch {
    vertices: Vec<LineVertex>,
    circle_segments: usize,
}

impl Default for LineBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBatch {
    pub fn new() -> Self {
        Self::with_circle_segments(DEFAULT_CIRCLE_SEGMENTS)
    }

    pub fn with_circle_segments(segments: usize) -> Self {
        Self {
            vertices: Vec::new(),
            circle_segments: segments.max(3),
        }
    }

    /// Forget the previous frame's lines, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn line_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push_line(&mut self, a: Vec2, b: Vec2, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        self.vertices.push(LineVertex::new(a, color));
        self.vertices.push(LineVertex::new(b, color));
    }

    fn push_loop(&mut self, vertices: &[Vec2], color: Color) {
        if vertices.len() < 2 {
            return;
        }
        let mut prev = vertices[vertices.len() - 1];
        for &v in vertices {
            self.push_line(prev, v, color);
            prev = v;
        }
    }

    fn circle_points(&self, center: Vec2, radius: f32) -> Vec<Vec2> {
        let step = TAU / self.circle_segments as f32;
        (0..self.circle_segments)
            .map(|i| center + Vec2::from_angle(i as f32 * step) * radius)
            .collect()
    }
}

impl DebugDraw for LineBatch {
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color) {
        self.push_loop(vertices, color);
    }

    fn draw_solid_polygon(&mut self, vertices: &[Vec2], color: Color) {
        // Lines only: the outline stands in for the fill
        self.push_loop(vertices, color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let points = self.circle_points(center, radius);
        self.push_loop(&points, color);
    }

    fn draw_solid_circle(&mut self, center: Vec2, radius: f32, axis: Vec2, color: Color) {
        let points = self.circle_points(center, radius);
        self.push_loop(&points, color);
        self.push_line(center, center + axis * radius, color);
    }

    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: Color) {
        self.push_line(p1, p2, color);
    }

    fn draw_transform(&mut self, xf: &Transform2D) {
        let p = xf.position;
        self.push_line(p, p + xf.rotation.x_axis() * TRANSFORM_AXIS_LENGTH, Color::RED);
        self.push_line(p, p + xf.rotation.y_axis() * TRANSFORM_AXIS_LENGTH, Color::GREEN);
    }

    fn draw_point(&mut self, p: Vec2, size: f32, color: Color) {
        // Small cross
        let h = size * 0.5;
        self.push_line(p - Vec2::new(h, 0.0), p + Vec2::new(h, 0.0), color);
        self.push_line(p - Vec2::new(0.0, h), p + Vec2::new(0.0, h), color);
    }
}
