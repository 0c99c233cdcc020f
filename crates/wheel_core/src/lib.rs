//! Scene framework for the roulette wheel demo
//!
//! This crate provides the pieces a scene is built from:
//!
//! - [`Node`] and [`adjust_node_scale`] - placement and pixel-to-meter sizing
//! - [`Viewport`] - mapping between world meters and screen pixels
//! - [`Layer`] - drawable slices of a scene ([`layers`] has the built-in ones)
//! - [`Scene`] and [`SceneBase`] - the scene lifecycle
//! - [`SceneManager`] - the scene stack and transitions

mod layer;
pub mod layers;
mod node;
mod scene;
mod scene_manager;
mod scene_transition;
mod viewport;

pub use layer::{DrawContext, EffectDraw, FrameContext, Layer};
pub use node::{adjust_node_scale, Node, NodeError, Size};
pub use scene::{Scene, SceneBase, SceneError};
pub use scene_manager::SceneManager;
pub use scene_transition::{SceneTransition, SlideDirection, TransitionEffect};
pub use viewport::Viewport;

// Re-export physics types scenes commonly need
pub use wheel_physics::{DebugDraw, DebugDrawFlags, PhysicsWorld};
