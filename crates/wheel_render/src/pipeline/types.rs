//! GPU-compatible data types for the line pipeline
//!
//! These types match the layouts in `line.wgsl`. All types derive Pod and
//! Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};

use wheel_math::{Color, Vec2};

/// A line endpoint in world meters with color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Uniforms for the line shader
///
/// Layout: 64 bytes (must match line.wgsl LineUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LineUniforms {
    /// Column-major world-to-clip matrix
    pub view_projection: [[f32; 4]; 4],
}

impl Default for LineUniforms {
    fn default() -> Self {
        Self {
            view_projection: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}
