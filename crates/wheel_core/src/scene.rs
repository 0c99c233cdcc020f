//! Scenes and their lifecycle
//!
//! A scene owns a root [`Node`], a [`Viewport`] and an ordered list of
//! [`Layer`]s. The [`SceneManager`](crate::SceneManager) drives the
//! lifecycle hooks:
//!
//! 1. `on_enter` when the scene becomes visible
//! 2. `on_enter_transition_did_finish` once any transition into it is done
//! 3. `on_exit_transition_did_start` when a transition away from it begins
//! 4. `on_exit` once it is no longer visible
//!
//! Per-frame updates only run between 2 and 3: the default hooks schedule
//! and unschedule them.

use std::fmt;

use wheel_math::Vec2;
use wheel_physics::{DebugDraw, PhysicsError, PhysicsWorld};

use crate::layer::{DrawContext, EffectDraw, FrameContext, Layer};
use crate::node::{Node, NodeError};
use crate::viewport::Viewport;

/// Errors from scene construction and management
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Creating bodies or fixtures failed
    Physics(PhysicsError),
    /// A node helper rejected its input
    Node(NodeError),
    /// The operation needs a running scene and the stack is empty
    NoRunningScene,
}

impl From<PhysicsError> for SceneError {
    fn from(e: PhysicsError) -> Self {
        SceneError::Physics(e)
    }
}

impl From<NodeError> for SceneError {
    fn from(e: NodeError) -> Self {
        SceneError::Node(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Physics(e) => write!(f, "Physics error: {}", e),
            SceneError::Node(e) => write!(f, "Node error: {}", e),
            SceneError::NoRunningScene => write!(f, "No running scene"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Physics(e) => Some(e),
            SceneError::Node(e) => Some(e),
            SceneError::NoRunningScene => None,
        }
    }
}

/// State shared by every scene
pub struct SceneBase {
    pub root: Node,
    viewport: Viewport,
    layers: Vec<Box<dyn Layer>>,
    update_scheduled: bool,
    running: bool,
}

impl SceneBase {
    pub fn new(name: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            root: Node::new(name),
            viewport,
            layers: Vec::new(),
            update_scheduled: false,
            running: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Append a layer; later layers draw on top
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) {
        log::debug!("Scene '{}': added layer '{}'", self.root.name, layer.name());
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// First layer with the given name
    pub fn layer(&self, name: &str) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|layer| layer.name() == name)
            .map(|layer| layer.as_ref())
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Box<dyn Layer>> {
        self.layers.iter_mut().find(|layer| layer.name() == name)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Start receiving per-frame updates
    pub fn schedule_update(&mut self) {
        if !self.update_scheduled {
            log::debug!("Scene '{}': update scheduled", self.root.name);
        }
        self.update_scheduled = true;
    }

    /// Stop receiving per-frame updates
    pub fn unschedule_update(&mut self) {
        if self.update_scheduled {
            log::debug!("Scene '{}': update unscheduled", self.root.name);
        }
        self.update_scheduled = false;
    }

    pub fn is_update_scheduled(&self) -> bool {
        self.update_scheduled
    }

    /// True between `on_enter` and `on_exit`
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn on_enter(&mut self) {
        self.running = true;
        for layer in &mut self.layers {
            layer.on_enter();
        }
    }

    pub fn on_exit(&mut self) {
        self.running = false;
        for layer in &mut self.layers {
            layer.on_exit();
        }
    }

    /// Update every layer with this scene's viewport
    pub fn update_layers(&mut self, dt: f32, physics: Option<&PhysicsWorld>, tracked_points: &[Vec2]) {
        let ctx = FrameContext {
            viewport: &self.viewport,
            physics,
            tracked_points,
        };
        for layer in &mut self.layers {
            layer.update(dt, &ctx);
        }
    }

    /// Draw visible layers in order, offset by the root and layer positions
    pub fn draw_layers(&self, physics: Option<&PhysicsWorld>, alpha: f32, out: &mut dyn DebugDraw) {
        if !self.root.visible || alpha <= 0.0 {
            return;
        }
        let ctx = DrawContext {
            viewport: &self.viewport,
            physics,
            alpha,
        };
        for layer in &self.layers {
            let node = layer.node();
            if !node.visible {
                continue;
            }
            let mut effect = EffectDraw::new(out, alpha, self.root.position + node.position);
            layer.draw(&ctx, &mut effect);
        }
    }
}

/// A screen managed by the [`SceneManager`](crate::SceneManager)
pub trait Scene {
    fn base(&self) -> &SceneBase;

    fn base_mut(&mut self) -> &mut SceneBase;

    fn name(&self) -> &str {
        self.base().name()
    }

    /// Physics world shown by the debug layer, if the scene has one
    fn physics(&self) -> Option<&PhysicsWorld> {
        None
    }

    fn on_enter(&mut self) {
        self.base_mut().on_enter();
    }

    fn on_exit(&mut self) {
        self.base_mut().on_exit();
    }

    /// The scene is fully shown; start per-frame updates
    fn on_enter_transition_did_finish(&mut self) {
        self.base_mut().schedule_update();
    }

    /// The scene is about to be hidden; stop per-frame updates
    fn on_exit_transition_did_start(&mut self) {
        self.base_mut().unschedule_update();
    }

    /// Per-frame update, only called while an update is scheduled
    fn update(&mut self, dt: f32) {
        self.base_mut().update_layers(dt, None, &[]);
    }

    /// Emit this frame's primitives at the given opacity
    fn draw(&self, out: &mut dyn DebugDraw, alpha: f32) {
        self.base().draw_layers(self.physics(), alpha, out);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.base_mut().viewport_mut().resize(width, height);
    }

    fn is_paused(&self) -> bool {
        false
    }

    /// Pause or resume the scene's simulation; returns the new state.
    /// Scenes without a simulation stay unpaused.
    fn toggle_pause(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::test_support::Recorder;
    use crate::layers::{DebugLinesLayer, GridLayer};
    use wheel_math::Color;

    struct Plain {
        base: SceneBase,
    }

    impl Scene for Plain {
        fn base(&self) -> &SceneBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SceneBase {
            &mut self.base
        }
    }

    fn plain() -> Plain {
        Plain {
            base: SceneBase::new("plain", Viewport::new(10.0, 800, 600)),
        }
    }

    #[test]
    fn test_default_hooks_schedule_updates() {
        let mut scene = plain();
        assert!(!scene.base().is_update_scheduled());

        scene.on_enter();
        assert!(scene.base().is_running());
        assert!(!scene.base().is_update_scheduled());

        scene.on_enter_transition_did_finish();
        assert!(scene.base().is_update_scheduled());

        scene.on_exit_transition_did_start();
        assert!(!scene.base().is_update_scheduled());

        scene.on_exit();
        assert!(!scene.base().is_running());
    }

    #[test]
    fn test_scene_without_simulation_never_pauses() {
        let mut scene = plain();
        assert!(!scene.toggle_pause());
        assert!(!scene.is_paused());
    }

    #[test]
    fn test_layers_draw_in_order_with_offset() {
        let mut scene = plain();
        let mut lines = DebugLinesLayer::new();
        lines.add_line(Vec2::ZERO, Vec2::X, Color::RED);
        lines.node_mut().position = Vec2::new(0.0, 2.0);
        scene.base_mut().add_layer(Box::new(lines));

        let mut recorder = Recorder::default();
        scene.draw(&mut recorder, 1.0);
        assert_eq!(recorder.segments.len(), 1);
        assert_eq!(recorder.segments[0].0, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_hidden_layers_are_skipped() {
        let mut scene = plain();
        let mut grid = GridLayer::default();
        grid.node_mut().visible = false;
        scene.base_mut().add_layer(Box::new(grid));

        let mut recorder = Recorder::default();
        scene.draw(&mut recorder, 1.0);
        assert!(recorder.segments.is_empty());
    }

    #[test]
    fn test_transparent_scene_draws_nothing() {
        let mut scene = plain();
        scene.base_mut().add_layer(Box::new(GridLayer::default()));
        let mut recorder = Recorder::default();
        scene.draw(&mut recorder, 0.0);
        assert!(recorder.segments.is_empty());
    }

    #[test]
    fn test_layer_lookup() {
        let mut scene = plain();
        scene.base_mut().add_layer(Box::new(GridLayer::default()));
        scene.base_mut().add_layer(Box::new(DebugLinesLayer::new()));
        assert_eq!(scene.base().layer_count(), 2);
        assert!(scene.base().layer("Grid").is_some());
        assert!(scene.base().layer("Missing").is_none());
    }

    #[test]
    fn test_scene_error_from_node_error() {
        let err: SceneError = NodeError::DegenerateContentSize { max_pixels: 0.0 }.into();
        assert!(matches!(err, SceneError::Node(_)));
        assert!(err.to_string().starts_with("Node error"));
    }
}
