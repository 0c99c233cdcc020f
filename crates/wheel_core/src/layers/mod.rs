//! Built-in layers for the wheel scene

mod debug_lines;
mod grid;
mod physics_debug;

pub use debug_lines::{DebugLine, DebugLinesLayer};
pub use grid::GridLayer;
pub use physics_debug::PhysicsDebugLayer;
