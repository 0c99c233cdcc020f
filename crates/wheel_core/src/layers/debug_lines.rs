//! Free-form line overlay with motion trails

use std::collections::VecDeque;

use wheel_math::{Color, Vec2};
use wheel_physics::DebugDraw;

use crate::layer::{DrawContext, FrameContext, Layer};
use crate::node::Node;

/// Default number of lines kept before the oldest are dropped
pub const DEFAULT_MAX_LINES: usize = 2000;

/// Minimum movement (meters) before a trail segment is recorded
const MIN_TRAIL_STEP: f32 = 0.01;

/// A single line in world meters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Color,
}

/// Layer holding arbitrary debug lines and trails of tracked points
///
/// Every frame the scene can hand over points to trace (see
/// [`FrameContext::tracked_points`]). Once a point has moved far enough a
/// segment from its last recorded position is appended. The buffer is
/// bounded and drops the oldest lines first.
pub struct DebugLinesLayer {
    node: Node,
    lines: VecDeque<DebugLine>,
    max_lines: usize,
    trail_color: Color,
    last_points: Vec<Vec2>,
}

impl DebugLinesLayer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_LINES)
    }

    pub fn with_capacity(max_lines: usize) -> Self {
        Self {
            node: Node::new("DebugLines"),
            lines: VecDeque::with_capacity(max_lines.min(DEFAULT_MAX_LINES)),
            max_lines: max_lines.max(1),
            trail_color: Color::rgba(1.0, 0.85, 0.2, 0.6),
            last_points: Vec::new(),
        }
    }

    pub fn with_trail_color(mut self, color: Color) -> Self {
        self.trail_color = color;
        self
    }

    pub fn add_line(&mut self, start: Vec2, end: Vec2, color: Color) {
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(DebugLine { start, end, color });
    }

    /// Remove all lines and forget tracked positions
    pub fn clear(&mut self) {
        self.lines.clear();
        self.last_points.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &DebugLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }
}

impl Default for DebugLinesLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer for DebugLinesLayer {
    fn name(&self) -> &str {
        &self.node.name
    }

    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    fn on_exit(&mut self) {
        self.last_points.clear();
    }

    fn update(&mut self, _dt: f32, ctx: &FrameContext<'_>) {
        if self.last_points.len() != ctx.tracked_points.len() {
            // Tracked set changed; restart trails without a connecting jump
            self.last_points = ctx.tracked_points.to_vec();
            return;
        }

        for i in 0..ctx.tracked_points.len() {
            let current = ctx.tracked_points[i];
            let previous = self.last_points[i];
            if previous.distance(current) >= MIN_TRAIL_STEP {
                let color = self.trail_color;
                self.add_line(previous, current, color);
                self.last_points[i] = current;
            }
        }
    }

    fn draw(&self, _ctx: &DrawContext<'_>, out: &mut dyn DebugDraw) {
        for line in &self.lines {
            out.draw_segment(line.start, line.end, line.color);
        }
    }
}
