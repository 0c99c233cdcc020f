//! Scene layers
//!
//! A scene is composed of layers stacked in draw order. Each layer owns a
//! [`Node`] for its placement and visibility, and draws itself through the
//! physics [`DebugDraw`] sink so the same primitives feed both the physics
//! overlay and the decorative layers.

use wheel_math::{Color, Transform2D, Vec2};
use wheel_physics::{DebugDraw, PhysicsWorld};

use crate::node::Node;
use crate::viewport::Viewport;

/// Read-only state passed to [`Layer::update`]
pub struct FrameContext<'a> {
    pub viewport: &'a Viewport,
    pub physics: Option<&'a PhysicsWorld>,
    /// World positions the scene wants traced this frame (for example the ball)
    pub tracked_points: &'a [Vec2],
}

/// Read-only state passed to [`Layer::draw`]
pub struct DrawContext<'a> {
    pub viewport: &'a Viewport,
    pub physics: Option<&'a PhysicsWorld>,
    /// Opacity applied by scene transitions (1.0 when fully shown)
    pub alpha: f32,
}

/// A drawable, updatable slice of a scene
pub trait Layer {
    fn name(&self) -> &str;

    fn node(&self) -> &Node;

    fn node_mut(&mut self) -> &mut Node;

    /// Called when the owning scene enters the stage
    fn on_enter(&mut self) {}

    /// Called when the owning scene leaves the stage
    fn on_exit(&mut self) {}

    /// Advance layer state by `dt` seconds
    fn update(&mut self, _dt: f32, _ctx: &FrameContext<'_>) {}

    /// Emit primitives in world meters
    fn draw(&self, ctx: &DrawContext<'_>, out: &mut dyn DebugDraw);
}

/// Wraps a [`DebugDraw`] sink, fading colors and offsetting positions
///
/// Used to apply transition effects and node placement without every layer
/// handling them itself.
pub struct EffectDraw<'a> {
    inner: &'a mut dyn DebugDraw,
    alpha: f32,
    offset: Vec2,
}

impl<'a> EffectDraw<'a> {
    pub fn new(inner: &'a mut dyn DebugDraw, alpha: f32, offset: Vec2) -> Self {
        Self {
            inner,
            alpha: alpha.clamp(0.0, 1.0),
            offset,
        }
    }

    #[inline]
    fn color(&self, color: Color) -> Color {
        color.fade(self.alpha)
    }

    fn shifted(&self, vertices: &[Vec2]) -> Vec<Vec2> {
        vertices.iter().map(|v| *v + self.offset).collect()
    }
}

impl DebugDraw for EffectDraw<'_> {
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color) {
        let vertices = self.shifted(vertices);
        let color = self.color(color);
        self.inner.draw_polygon(&vertices, color);
    }

    fn draw_solid_polygon(&mut self, vertices: &[Vec2], color: Color) {
        let vertices = self.shifted(vertices);
        let color = self.color(color);
        self.inner.draw_solid_polygon(&vertices, color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let color = self.color(color);
        self.inner.draw_circle(center + self.offset, radius, color);
    }

    fn draw_solid_circle(&mut self, center: Vec2, radius: f32, axis: Vec2, color: Color) {
        let color = self.color(color);
        self.inner
            .draw_solid_circle(center + self.offset, radius, axis, color);
    }

    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: Color) {
        let color = self.color(color);
        self.inner
            .draw_segment(p1 + self.offset, p2 + self.offset, color);
    }

    fn draw_transform(&mut self, xf: &Transform2D) {
        // Axis colors are fixed by the sink, so only the offset applies here
        let shifted = Transform2D {
            position: xf.position + self.offset,
            rotation: xf.rotation,
        };
        self.inner.draw_transform(&shifted);
    }

    fn draw_point(&mut self, p: Vec2, size: f32, color: Color) {
        let color = self.color(color);
        self.inner.draw_point(p + self.offset, size, color);
    }
}
