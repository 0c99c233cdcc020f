//! Physics debug-draw overlay

use wheel_physics::{DebugDraw, DebugDrawFlags};

use crate::layer::{DrawContext, Layer};
use crate::node::Node;

/// Draws the scene's physics world through [`PhysicsWorld::debug_draw`]
///
/// [`PhysicsWorld::debug_draw`]: wheel_physics::PhysicsWorld::debug_draw
pub struct PhysicsDebugLayer {
    node: Node,
    flags: DebugDrawFlags,
}

impl PhysicsDebugLayer {
    pub fn new(flags: DebugDrawFlags) -> Self {
        Self {
            node: Node::new("PhysicsDebug"),
            flags,
        }
    }

    pub fn flags(&self) -> DebugDrawFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: DebugDrawFlags) {
        self.flags = flags;
    }

    /// Flip one flag on or off
    pub fn toggle(&mut self, flag: DebugDrawFlags) {
        self.flags.toggle(flag);
        log::debug!("Physics debug flags: {:?}", self.flags);
    }
}

impl Default for PhysicsDebugLayer {
    fn default() -> Self {
        Self::new(DebugDrawFlags::default())
    }
}

impl Layer for PhysicsDebugLayer {
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
        if let Some(world) = ctx.physics {
            world.debug_draw(out, self.flags);
        }
    }
}
