//! Rendering pipeline components
//!
//! The wheel is drawn entirely from colored line segments, so a single
//! line-list pipeline covers every layer.

pub mod line_pipeline;
pub mod types;

pub use line_pipeline::LinePipeline;
pub use types::{LineUniforms, LineVertex};
