//! 2D line rendering for the roulette wheel
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera2d::Camera2D`] - orthographic camera matching a scene viewport
//! - [`line_batch::LineBatch`] - [`DebugDraw`] sink that collects line vertices
//! - [`pipeline::LinePipeline`] - line-list render pipeline

pub mod camera2d;
pub mod context;
pub mod line_batch;
pub mod pipeline;

pub use camera2d::Camera2D;
pub use line_batch::LineBatch;

// Re-export the drawing trait the batch implements
pub use wheel_physics::DebugDraw;
