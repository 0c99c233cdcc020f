//! Debug drawing hooks for visualising the physics world

use bitflags::bitflags;

use wheel_math::{Color, Transform2D, Vec2};

bitflags! {
    /// Which parts of the world to draw
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DebugDrawFlags: u32 {
        /// Fixture outlines
        const SHAPES = 1 << 0;
        /// Fixture bounding boxes
        const AABBS = 1 << 1;
        /// Center-of-mass frames
        const CENTER_OF_MASS = 1 << 2;
        /// Active contact points and normals
        const CONTACT_POINTS = 1 << 3;
    }
}

impl Default for DebugDrawFlags {
    fn default() -> Self {
        DebugDrawFlags::SHAPES
    }
}

/// Colors used for fixtures by body state
pub mod colors {
    use wheel_math::Color;

    pub const STATIC: Color = Color::rgb(0.5, 0.9, 0.5);
    pub const KINEMATIC: Color = Color::rgb(0.5, 0.5, 0.9);
    pub const SLEEPING: Color = Color::rgb(0.6, 0.6, 0.6);
    pub const AWAKE: Color = Color::rgb(0.9, 0.7, 0.7);
    pub const AABB: Color = Color::rgb(0.9, 0.3, 0.9);
    pub const CONTACT: Color = Color::rgb(0.3, 0.95, 0.3);
}

/// Receives primitives from [`PhysicsWorld::debug_draw`](crate::PhysicsWorld::debug_draw)
///
/// All coordinates are in world meters.
pub trait DebugDraw {
    /// Closed polygon outline
    fn draw_polygon(&mut self, vertices: &[Vec2], color: Color);

    /// Filled polygon
    fn draw_solid_polygon(&mut self, vertices: &[Vec2], color: Color);

    /// Circle outline
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Filled circle with a line marking its orientation
    fn draw_solid_circle(&mut self, center: Vec2, radius: f32, axis: Vec2, color: Color);

    fn draw_segment(&mut self, p1: Vec2, p2: Vec2, color: Color);

    /// Coordinate frame (red x axis, green y axis)
    fn draw_transform(&mut self, xf: &Transform2D);

    /// Point marker of `size` meters
    fn draw_point(&mut self, p: Vec2, size: f32, color: Color);
}
