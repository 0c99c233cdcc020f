//! Background grid in world meters

use wheel_math::{Color, Vec2};
use wheel_physics::DebugDraw;

use crate::layer::{DrawContext, Layer};
use crate::node::Node;

/// Upper bound on lines per axis so extreme zoom-out stays cheap
const MAX_LINES_PER_AXIS: usize = 200;

/// Regular grid covering the visible part of the world
///
/// Lines are placed at multiples of `spacing` meters. The world axes are
/// drawn in a brighter color.
pub struct GridLayer {
    node: Node,
    spacing: f32,
    color: Color,
    axis_color: Color,
}

impl GridLayer {
    pub fn new(spacing: f32) -> Self {
        Self {
            node: Node::new("Grid"),
            spacing: if spacing > 0.0 { spacing } else { 1.0 },
            color: Color::rgba(0.3, 0.3, 0.35, 0.5),
            axis_color: Color::rgba(0.55, 0.55, 0.6, 0.8),
        }
    }

    pub fn with_colors(mut self, color: Color, axis_color: Color) -> Self {
        self.color = color;
        self.axis_color = axis_color;
        self
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Spacing actually drawn over `[min, max]`
    ///
    /// Widened to a whole multiple of `spacing` when the range would need
    /// more than `MAX_LINES_PER_AXIS` lines.
    fn effective_spacing(&self, min: f32, max: f32) -> f32 {
        let needed = ((max - min) / self.spacing).ceil().max(0.0) as usize + 1;
        let stride = needed.div_ceil(MAX_LINES_PER_AXIS - 2).max(1);
        self.spacing * stride as f32
    }

    /// Grid-line coordinates covering `[min, max]`
    fn line_positions(&self, min: f32, max: f32) -> impl Iterator<Item = f32> {
        let spacing = self.effective_spacing(min, max);
        let first = (min / spacing).floor() as i64;
        let last = (max / spacing).ceil() as i64;
        let count = ((last - first + 1).max(0) as usize).min(MAX_LINES_PER_AXIS);
        (0..count).map(move |i| (first + i as i64) as f32 * spacing)
    }
}

impl Default for GridLayer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Layer for GridLayer {
    fn name(&self) -> &str {
        &self.node.name
    }

    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut dyn DebugDraw) {
        let bounds = ctx.viewport.visible_world_bounds();

        for x in self.line_positions(bounds.min.x, bounds.max.x) {
            let color = if x == 0.0 { self.axis_color } else { self.color };
            out.draw_segment(
                Vec2::new(x, bounds.min.y),
                Vec2::new(x, bounds.max.y),
                color,
            );
        }

        for y in self.line_positions(bounds.min.y, bounds.max.y) {
            let color = if y == 0.0 { self.axis_color } else { self.color };
            out.draw_segment(
                Vec2::new(bounds.min.x, y),
                Vec2::new(bounds.max.x, y),
                color,
            );
        }
    }
}
