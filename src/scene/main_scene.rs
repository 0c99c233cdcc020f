//! The roulette wheel scene
//!
//! A dynamic wheel (solid disc plus a spiked rim) spins at a fixed rate
//! while a small ball bounces between the disc and the rim. Both angular
//! velocities are forced every frame, so the only free motion is the
//! ball's path, which the debug-lines layer traces.

use std::f32::consts::TAU;

use wheel_core::layers::{DebugLinesLayer, GridLayer, PhysicsDebugLayer};
use wheel_core::{
    adjust_node_scale, DebugDraw, EffectDraw, Layer, Node, Scene, SceneBase, SceneError, Size,
    Viewport,
};
use wheel_math::{Color, Vec2};
use wheel_physics::{
    BodyDef, BodyKey, ChainShape, CircleShape, CollisionFilter, CollisionLayer, FixtureDef,
    PhysicsWorld, Shape,
};

use crate::config::{AppConfig, PhysicsConfig, WheelConfig};

const BALL_MARKER_COLOR: Color = Color::rgb(1.0, 0.85, 0.2);

/// Vertices of the closed spiked rim
///
/// For each of `divisions` angles the rim gets a spike point at
/// `angle - spike_half_angle` on `radius`, a notch at `angle` on
/// `radius * notch_scale`, and a spike point at `angle + spike_half_angle`
/// on `radius`. The first vertex is repeated at the end to close the loop,
/// giving `3 * divisions + 1` vertices.
pub fn spiked_rim_vertices(
    radius: f32,
    divisions: usize,
    spike_half_angle: f32,
    notch_scale: f32,
) -> Vec<Vec2> {
    let mut vertices = Vec::with_capacity(divisions * 3 + 1);
    for i in 0..divisions {
        let angle = TAU * i as f32 / divisions as f32;
        vertices.push(Vec2::from_angle(angle - spike_half_angle) * radius);
        vertices.push(Vec2::from_angle(angle) * (radius * notch_scale));
        vertices.push(Vec2::from_angle(angle + spike_half_angle) * radius);
    }
    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    vertices
}

/// Fixed-step parameters for the world
#[derive(Clone, Copy, Debug)]
struct StepSettings {
    time_step: f32,
    velocity_iterations: usize,
    position_iterations: usize,
}

impl From<&PhysicsConfig> for StepSettings {
    fn from(config: &PhysicsConfig) -> Self {
        Self {
            time_step: config.time_step,
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
        }
    }
}

/// Scene hosting the wheel, the ball and the debug layers
pub struct MainScene {
    base: SceneBase,
    physics: PhysicsWorld,
    wheel: BodyKey,
    ball: BodyKey,
    /// Screen-space marker following the ball
    ball_marker: Node,
    wheel_config: WheelConfig,
    step: StepSettings,
    paused: bool,
}

impl MainScene {
    /// Build the scene: physics, bodies, then layers
    pub fn create(config: &AppConfig) -> Result<Self, SceneError> {
        let mut viewport = Viewport::new(
            config.viewport.world_size_meters,
            config.window.width,
            config.window.height,
        );
        viewport.set_scale(config.viewport.scale);

        let mut physics = Self::create_physics(&config.physics);
        let (wheel, ball) = Self::create_body(&mut physics, &config.wheel)?;

        let mut ball_marker = Node::new("BallMarker")
            .with_content_size(Size::new(
                config.wheel.ball_marker_pixels,
                config.wheel.ball_marker_pixels,
            ))
            .with_position(physics.body(ball).map_or(Vec2::ZERO, |b| b.position()));
        adjust_node_scale(
            &mut ball_marker,
            config.wheel.ball_radius * 2.0,
            viewport.ptm_ratio(),
        )?;

        let mut base = SceneBase::new("MainScene", viewport);

        let mut lines = DebugLinesLayer::with_capacity(config.debug.trail_max_lines);
        lines.node_mut().visible = config.debug.ball_trail;
        base.add_layer(Box::new(lines));

        base.add_layer(Box::new(PhysicsDebugLayer::new(config.debug.draw_flags())));

        let mut grid = GridLayer::new(1.0);
        grid.node_mut().visible = config.debug.show_grid;
        base.add_layer(Box::new(grid));

        log::info!(
            "Created wheel scene: {} bodies, rim of {} divisions",
            physics.body_count(),
            config.wheel.rim_divisions
        );

        Ok(Self {
            base,
            physics,
            wheel,
            ball,
            ball_marker,
            wheel_config: config.wheel.clone(),
            step: StepSettings::from(&config.physics),
            paused: false,
        })
    }

    /// World with the configured gravity, sleeping and continuous collision
    fn create_physics(config: &PhysicsConfig) -> PhysicsWorld {
        let mut physics = PhysicsWorld::with_config(config.to_physics_config());
        physics.set_allow_sleeping(config.allow_sleeping);
        physics.set_continuous_physics(config.continuous_physics);
        physics
    }

    /// Create the wheel (disc + spiked rim) and the ball
    fn create_body(
        physics: &mut PhysicsWorld,
        config: &WheelConfig,
    ) -> Result<(BodyKey, BodyKey), SceneError> {
        let surface = |shape: Shape, filter: CollisionFilter| {
            FixtureDef::new(shape)
                .with_density(config.density)
                .with_friction(config.friction)
                .with_restitution(config.restitution)
                .with_filter(filter)
        };
        let wheel_filter = CollisionFilter::new(CollisionLayer::WHEEL, CollisionLayer::BALL);
        let ball_filter = CollisionFilter::new(
            CollisionLayer::BALL,
            CollisionLayer::WHEEL | CollisionLayer::BALL,
        );

        let wheel = physics.create_body(
            &BodyDef::dynamic(Vec2::ZERO).with_angular_velocity(config.angular_velocity),
        )?;
        physics.create_fixture(
            wheel,
            &surface(CircleShape::new(config.disc_radius).into(), wheel_filter),
        )?;

        let rim = ChainShape::new(spiked_rim_vertices(
            config.rim_radius,
            config.rim_divisions,
            config.spike_half_angle_degrees.to_radians(),
            config.notch_scale,
        ))?;
        physics.create_fixture(wheel, &surface(rim.into(), wheel_filter))?;

        let ball = physics.create_body(
            &BodyDef::dynamic(config.ball_start())
                .with_linear_velocity(Vec2::from(config.ball_velocity)),
        )?;
        physics.create_fixture(
            ball,
            &surface(CircleShape::new(config.ball_radius).into(), ball_filter),
        )?;

        log::debug!("Wheel {:?}, ball {:?}", wheel, ball);
        Ok((wheel, ball))
    }

    /// Advance the world by one fixed step, ignoring the frame delta
    pub fn update_physics(&mut self) {
        self.physics.step(
            self.step.time_step,
            self.step.velocity_iterations,
            self.step.position_iterations,
        );
    }

    /// Force the scripted spin of the wheel and the ball
    pub fn update_body(&mut self) {
        if let Some(wheel) = self.physics.body_mut(self.wheel) {
            wheel.set_angular_velocity(self.wheel_config.angular_velocity);
        }
        if let Some(ball) = self.physics.body_mut(self.ball) {
            ball.set_angular_velocity(self.wheel_config.ball_angular_velocity);
        }
    }

    pub fn physics_world(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn wheel(&self) -> BodyKey {
        self.wheel
    }

    pub fn ball(&self) -> BodyKey {
        self.ball
    }

    pub fn ball_marker(&self) -> &Node {
        &self.ball_marker
    }

    fn sync_ball_marker(&mut self) {
        if let Some(ball) = self.physics.body(self.ball) {
            self.ball_marker.position = ball.position();
            self.ball_marker.rotation = ball.angle();
        }
    }

    /// Marker outline in world meters, sized from its scaled content
    fn draw_ball_marker(&self, out: &mut dyn DebugDraw, alpha: f32) {
        let marker = &self.ball_marker;
        let ptm = self.base.viewport().ptm_ratio();
        if !marker.visible || alpha <= 0.0 || ptm <= 0.0 {
            return;
        }
        let radius = marker.scaled_max_pixels() * 0.5 / ptm;
        let mut effect = EffectDraw::new(out, alpha, self.base.root.position);
        effect.draw_circle(marker.position, radius, BALL_MARKER_COLOR);
    }

    fn rescale_ball_marker(&mut self) {
        let ptm = self.base.viewport().ptm_ratio();
        if let Err(e) = adjust_node_scale(
            &mut self.ball_marker,
            self.wheel_config.ball_radius * 2.0,
            ptm,
        ) {
            log::warn!("Ball marker not rescaled: {}", e);
        }
    }
}

impl Scene for MainScene {
    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }

    fn physics(&self) -> Option<&PhysicsWorld> {
        Some(&self.physics)
    }

    fn on_enter(&mut self) {
        self.base.on_enter();
        log::debug!("MainScene entered");
    }

    fn on_exit(&mut self) {
        self.base.on_exit();
        log::debug!("MainScene exited");
    }

    fn on_enter_transition_did_finish(&mut self) {
        self.base.schedule_update();
    }

    fn on_exit_transition_did_start(&mut self) {
        self.base.unschedule_update();
    }

    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.update_physics();
        self.update_body();
        self.sync_ball_marker();

        let tracked = [self.ball_marker.position];
        self.base.update_layers(dt, Some(&self.physics), &tracked);
    }

    fn draw(&self, out: &mut dyn DebugDraw, alpha: f32) {
        if !self.base.root.visible {
            return;
        }
        self.base.draw_layers(Some(&self.physics), alpha, out);
        self.draw_ball_marker(out, alpha);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.base.viewport_mut().resize(width, height);
        self.rescale_ball_marker();
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }
}
