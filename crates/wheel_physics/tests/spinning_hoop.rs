//! Integration tests for a ball trapped inside a spinning hoop
//!
//! These exercise the whole step: chain-edge contacts on a rotating
//! dynamic body, circle-circle contacts, restitution, and continuous
//! collision against static geometry.

use std::f32::consts::PI;

use wheel_math::Vec2;
use wheel_physics::{
    BodyDef, BodyKey, ChainShape, CircleShape, ContactEventKind, FixtureDef, PhysicsWorld,
};

const DT: f32 = 1.0 / 60.0;

fn hoop_vertices(radius: f32, segments: usize) -> Vec<Vec2> {
    let mut vertices: Vec<Vec2> = (0..segments)
        .map(|i| Vec2::from_angle(2.0 * PI * i as f32 / segments as f32) * radius)
        .collect();
    vertices.push(vertices[0]);
    vertices
}

fn surface() -> FixtureDef {
    FixtureDef::new(CircleShape::new(1.0))
        .with_density(1.0)
        .with_friction(1.0)
        .with_restitution(0.9)
}

/// Disc of radius 2.5 inside a hoop of radius 3, ball in between
fn hoop_world() -> (PhysicsWorld, BodyKey, BodyKey) {
    let mut world = PhysicsWorld::new(Vec2::ZERO);
    world.set_allow_sleeping(false);
    world.set_continuous_physics(true);

    let wheel = world.create_body(&BodyDef::dynamic(Vec2::ZERO)).unwrap();
    let mut disc = surface();
    disc.shape = CircleShape::new(2.5).into();
    world.create_fixture(wheel, &disc).unwrap();
    let mut rim = surface();
    rim.shape = ChainShape::new(hoop_vertices(3.0, 72)).unwrap().into();
    world.create_fixture(wheel, &rim).unwrap();
    world.body_mut(wheel).unwrap().set_angular_velocity(PI / 8.0);

    let ball = world
        .create_body(&BodyDef::dynamic(Vec2::new(2.75, 0.0)).with_linear_velocity(Vec2::new(-0.5, 0.5)))
        .unwrap();
    let mut ball_fixture = surface();
    ball_fixture.shape = CircleShape::new(0.1).into();
    world.create_fixture(ball, &ball_fixture).unwrap();

    (world, wheel, ball)
}

#[test]
fn test_wheel_mass_ignores_rim() {
    let (world, wheel, _) = hoop_world();
    let body = world.body(wheel).unwrap();
    assert!((body.mass() - PI * 2.5 * 2.5).abs() < 0.001);
    assert_eq!(body.fixture_count(), 2);
}

#[test]
fn test_ball_stays_between_disc_and_rim() {
    let (mut world, wheel, ball) = hoop_world();

    for frame in 0..600 {
        world.step(DT, 8, 1);
        world.body_mut(wheel).unwrap().set_angular_velocity(PI / 8.0);
        world.body_mut(ball).unwrap().set_angular_velocity(PI);

        let center = world.body(wheel).unwrap().world_center();
        let r = world.body(ball).unwrap().position().distance(center);
        assert!(
            (2.55..=2.95).contains(&r),
            "ball left the annulus at frame {}: r = {}",
            frame,
            r
        );
    }
}

#[test]
fn test_scripted_angular_velocities_hold_after_step() {
    let (mut world, wheel, ball) = hoop_world();
    for _ in 0..120 {
        world.step(DT, 8, 1);
        world.body_mut(wheel).unwrap().set_angular_velocity(PI / 8.0);
        world.body_mut(ball).unwrap().set_angular_velocity(PI);
        assert_eq!(world.body(wheel).unwrap().angular_velocity(), PI / 8.0);
        assert_eq!(world.body(ball).unwrap().angular_velocity(), PI);
    }
    // Nothing sleeps while sleeping is disabled
    assert!(world.body(wheel).unwrap().is_awake());
    assert!(world.body(ball).unwrap().is_awake());
}

#[test]
fn test_ball_touches_the_disc() {
    let (mut world, _, _) = hoop_world();
    let mut began = 0;
    for _ in 0..120 {
        world.step(DT, 8, 1);
        began += world
            .contact_events()
            .iter()
            .filter(|e| e.kind == ContactEventKind::Began)
            .count();
    }
    // Moving inward at 0.5 m/s, the ball reaches the disc within half a second
    assert!(began >= 1);
}

#[test]
fn test_fast_ball_stays_inside_static_hoop() {
    let mut world = PhysicsWorld::new(Vec2::ZERO);
    let hoop = world.create_body(&BodyDef::fixed(Vec2::ZERO)).unwrap();
    let mut rim = surface();
    rim.shape = ChainShape::new(hoop_vertices(1.0, 36)).unwrap().into();
    world.create_fixture(hoop, &rim).unwrap();

    // About 0.43 m per step, twice the ball's diameter
    let ball = world
        .create_body(&BodyDef::dynamic(Vec2::ZERO).with_linear_velocity(Vec2::new(24.0, 9.0)))
        .unwrap();
    let mut ball_fixture = surface();
    ball_fixture.shape = CircleShape::new(0.1).into();
    world.create_fixture(ball, &ball_fixture).unwrap();

    for frame in 0..300 {
        world.step(DT, 8, 3);
        let r = world.body(ball).unwrap().position().length();
        assert!(r < 1.0, "ball escaped at frame {}: r = {}", frame, r);
    }
}
