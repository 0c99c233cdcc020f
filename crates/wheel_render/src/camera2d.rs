//! Orthographic 2D camera
//!
//! The camera mirrors a scene [`Viewport`]: it looks at the viewport center
//! and maps `ptm_ratio` pixels to one meter. World +y is up on screen.

use wheel_core::Viewport;
use wheel_math::Vec2;

/// Orthographic camera derived from a viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    /// World point at the center of the screen
    pub center: Vec2,
    /// Half the visible width and height in meters
    pub half_extents: Vec2,
}

impl Camera2D {
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            center: viewport.center(),
            half_extents: viewport.half_extents(),
        }
    }

    /// Column-major world-to-clip matrix
    pub fn view_projection(&self) -> [[f32; 4]; 4] {
        ortho_matrix(self.center, self.half_extents)
    }
}

/// Orthographic projection of the rectangle `center ± half_extents` onto clip space
pub fn ortho_matrix(center: Vec2, half_extents: Vec2) -> [[f32; 4]; 4] {
    let sx = 1.0 / half_extents.x.max(f32::EPSILON);
    let sy = 1.0 / half_extents.y.max(f32::EPSILON);

    [
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-center.x * sx, -center.y * sy, 0.0, 1.0],
    ]
}
