//! Rigid bodies for 2D physics simulation

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use wheel_math::{Rot2, Transform2D, Vec2};

use crate::error::PhysicsError;
use crate::fixture::Fixture;

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing: once a body is destroyed, old keys
    /// return `None` instead of pointing at whatever reuses the slot.
    pub struct BodyKey;
}

/// How a body takes part in the simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves, infinite mass
    #[default]
    Static,
    /// Moves by its velocity only, unaffected by contacts
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Everything needed to create a body
#[derive(Clone, Debug)]
pub struct BodyDef {
    pub body_type: BodyType,
    /// World position of the body origin
    pub position: Vec2,
    /// World angle in radians
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    /// Whether the body may fall asleep when still
    pub allow_sleep: bool,
    pub awake: bool,
    /// Continuous collision against other dynamic bodies
    pub bullet: bool,
    pub fixed_rotation: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            allow_sleep: true,
            awake: true,
            bullet: false,
            fixed_rotation: false,
        }
    }
}

impl BodyDef {
    /// A dynamic body at `position`
    pub fn dynamic(position: Vec2) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position,
            ..Default::default()
        }
    }

    /// A static body at `position`
    pub fn fixed(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, omega: f32) -> Self {
        self.angular_velocity = omega;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_bullet(mut self, bullet: bool) -> Self {
        self.bullet = bullet;
        self
    }

    pub fn with_allow_sleep(mut self, allow: bool) -> Self {
        self.allow_sleep = allow;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        if !self.position.is_finite() || !self.angle.is_finite() {
            return Err(PhysicsError::InvalidDefinition(
                "body position and angle must be finite".to_string(),
            ));
        }
        if !self.linear_velocity.is_finite() || !self.angular_velocity.is_finite() {
            return Err(PhysicsError::InvalidDefinition(
                "body velocity must be finite".to_string(),
            ));
        }
        if !(self.linear_damping >= 0.0 && self.angular_damping >= 0.0) {
            return Err(PhysicsError::InvalidDefinition(format!(
                "damping must be non-negative, got ({}, {})",
                self.linear_damping, self.angular_damping
            )));
        }
        if !self.gravity_scale.is_finite() {
            return Err(PhysicsError::InvalidDefinition(
                "gravity scale must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Motion of a body's center of mass over one step
///
/// `c0`/`a0` hold the pose at the start of the step, `c`/`a` the pose at
/// the end. Continuous collision interpolates between the two.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Sweep {
    pub local_center: Vec2,
    pub c0: Vec2,
    pub c: Vec2,
    pub a0: f32,
    pub a: f32,
}

impl Sweep {
    /// Body transform at fraction `beta` of the step
    pub fn transform_at(&self, beta: f32) -> Transform2D {
        let c = self.c0.lerp(self.c, beta);
        let a = (1.0 - beta) * self.a0 + beta * self.a;
        let rotation = Rot2::from_angle(a);
        Transform2D {
            position: c - rotation.apply(self.local_center),
            rotation,
        }
    }

    /// Move the end pose back to fraction `alpha` of the step
    pub fn rewind_to(&mut self, alpha: f32) {
        self.c = self.c0.lerp(self.c, alpha);
        self.a = (1.0 - alpha) * self.a0 + alpha * self.a;
    }
}

/// A 2D rigid body owning its fixtures
#[derive(Clone, Debug)]
pub struct RigidBody {
    body_type: BodyType,
    pub(crate) transform: Transform2D,
    pub(crate) sweep: Sweep,
    pub(crate) linear_velocity: Vec2,
    pub(crate) angular_velocity: f32,
    force: Vec2,
    torque: f32,
    mass: f32,
    pub(crate) inv_mass: f32,
    /// Rotational inertia about the center of mass
    inertia: f32,
    pub(crate) inv_inertia: f32,
    pub(crate) linear_damping: f32,
    pub(crate) angular_damping: f32,
    pub(crate) gravity_scale: f32,
    allow_sleep: bool,
    awake: bool,
    bullet: bool,
    fixed_rotation: bool,
    pub(crate) sleep_time: f32,
    pub(crate) fixtures: Vec<Fixture>,
}

impl RigidBody {
    pub(crate) fn from_def(def: &BodyDef) -> Self {
        let transform = Transform2D::new(def.position, def.angle);
        let is_static = def.body_type == BodyType::Static;
        let mut body = Self {
            body_type: def.body_type,
            transform,
            sweep: Sweep {
                local_center: Vec2::ZERO,
                c0: def.position,
                c: def.position,
                a0: def.angle,
                a: def.angle,
            },
            linear_velocity: if is_static { Vec2::ZERO } else { def.linear_velocity },
            angular_velocity: if is_static { 0.0 } else { def.angular_velocity },
            force: Vec2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            linear_damping: def.linear_damping,
            angular_damping: def.angular_damping,
            gravity_scale: def.gravity_scale,
            allow_sleep: def.allow_sleep,
            awake: def.awake || !def.allow_sleep,
            bullet: def.bullet,
            fixed_rotation: def.fixed_rotation,
            sleep_time: 0.0,
            fixtures: Vec::new(),
        };
        if body.body_type == BodyType::Dynamic {
            body.mass = 1.0;
            body.inv_mass = 1.0;
        }
        if is_static {
            body.awake = false;
        }
        body
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// World position of the body origin
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// World angle in radians (not wrapped)
    pub fn angle(&self) -> f32 {
        self.sweep.a
    }

    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// World position of the center of mass
    pub fn world_center(&self) -> Vec2 {
        self.sweep.c
    }

    /// Center of mass in body-local coordinates
    pub fn local_center(&self) -> Vec2 {
        self.sweep.local_center
    }

    pub fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    /// Set the linear velocity of the center of mass
    ///
    /// Ignored for static bodies. A non-zero velocity wakes the body.
    pub fn set_linear_velocity(&mut self, velocity: Vec2) {
        if self.body_type == BodyType::Static {
            return;
        }
        if velocity.length_squared() > 0.0 {
            self.set_awake(true);
        }
        self.linear_velocity = velocity;
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Set the angular velocity in radians per second
    ///
    /// Ignored for static bodies. A non-zero value wakes the body.
    pub fn set_angular_velocity(&mut self, omega: f32) {
        if self.body_type == BodyType::Static {
            return;
        }
        if omega * omega > 0.0 {
            self.set_awake(true);
        }
        self.angular_velocity = omega;
    }

    /// Velocity of a world point attached to this body
    pub fn linear_velocity_at(&self, world_point: Vec2) -> Vec2 {
        self.linear_velocity + Vec2::scalar_cross(self.angular_velocity, world_point - self.sweep.c)
    }

    /// Apply a force at a world point, accumulated until the next step
    pub fn apply_force(&mut self, force: Vec2, point: Vec2, wake: bool) {
        if !self.is_dynamic() {
            return;
        }
        if wake {
            self.set_awake(true);
        }
        if self.awake {
            self.force += force;
            self.torque += (point - self.sweep.c).cross(force);
        }
    }

    pub fn apply_force_to_center(&mut self, force: Vec2, wake: bool) {
        let center = self.sweep.c;
        self.apply_force(force, center, wake);
    }

    pub fn apply_torque(&mut self, torque: f32, wake: bool) {
        if !self.is_dynamic() {
            return;
        }
        if wake {
            self.set_awake(true);
        }
        if self.awake {
            self.torque += torque;
        }
    }

    /// Apply an impulse at a world point, changing velocity immediately
    pub fn apply_linear_impulse(&mut self, impulse: Vec2, point: Vec2, wake: bool) {
        if !self.is_dynamic() {
            return;
        }
        if wake {
            self.set_awake(true);
        }
        if self.awake {
            self.linear_velocity += impulse * self.inv_mass;
            self.angular_velocity += self.inv_inertia * (point - self.sweep.c).cross(impulse);
        }
    }

    pub fn apply_angular_impulse(&mut self, impulse: f32, wake: bool) {
        if !self.is_dynamic() {
            return;
        }
        if wake {
            self.set_awake(true);
        }
        if self.awake {
            self.angular_velocity += self.inv_inertia * impulse;
        }
    }

    pub(crate) fn force(&self) -> Vec2 {
        self.force
    }

    pub(crate) fn torque(&self) -> f32 {
        self.torque
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Rotational inertia about the body origin
    pub fn inertia(&self) -> f32 {
        self.inertia + self.mass * self.sweep.local_center.length_squared()
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Wake or put the body to sleep
    ///
    /// Sleeping clears velocities and pending forces.
    pub fn set_awake(&mut self, awake: bool) {
        if self.body_type == BodyType::Static {
            return;
        }
        if awake {
            if !self.awake {
                self.awake = true;
                self.sleep_time = 0.0;
            }
        } else {
            self.awake = false;
            self.sleep_time = 0.0;
            self.linear_velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
            self.clear_forces();
        }
    }

    pub fn allows_sleep(&self) -> bool {
        self.allow_sleep
    }

    pub fn set_allow_sleep(&mut self, allow: bool) {
        self.allow_sleep = allow;
        if !allow {
            self.set_awake(true);
        }
    }

    pub fn is_bullet(&self) -> bool {
        self.bullet
    }

    pub fn set_bullet(&mut self, bullet: bool) {
        self.bullet = bullet;
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    /// Teleport the body origin, keeping velocities
    pub fn set_transform(&mut self, position: Vec2, angle: f32) {
        self.transform = Transform2D::new(position, angle);
        self.sweep.c = self.transform.apply(self.sweep.local_center);
        self.sweep.a = angle;
        self.sweep.c0 = self.sweep.c;
        self.sweep.a0 = angle;
        self.synchronize_fixtures();
    }

    pub(crate) fn add_fixture(&mut self, fixture: Fixture) -> usize {
        self.fixtures.push(fixture);
        if self.fixtures[self.fixtures.len() - 1].density() > 0.0 {
            self.reset_mass_data();
        }
        self.fixtures.len() - 1
    }

    /// Recompute mass, inertia and center of mass from the fixtures
    pub(crate) fn reset_mass_data(&mut self) {
        self.mass = 0.0;
        self.inv_mass = 0.0;
        self.inertia = 0.0;
        self.inv_inertia = 0.0;
        self.sweep.local_center = Vec2::ZERO;

        if self.body_type != BodyType::Dynamic {
            self.sweep.c0 = self.transform.position;
            self.sweep.c = self.transform.position;
            self.sweep.a0 = self.sweep.a;
            return;
        }

        let mut local_center = Vec2::ZERO;
        for fixture in &self.fixtures {
            if fixture.density() <= 0.0 {
                continue;
            }
            let md = fixture.shape().compute_mass(fixture.density());
            self.mass += md.mass;
            local_center += md.center * md.mass;
            self.inertia += md.inertia;
        }

        if self.mass > 0.0 {
            self.inv_mass = 1.0 / self.mass;
            local_center = local_center * self.inv_mass;
        } else {
            // Dynamic bodies always carry some mass
            self.mass = 1.0;
            self.inv_mass = 1.0;
        }

        if self.inertia > 0.0 && !self.fixed_rotation {
            // Shift inertia to the center of mass
            self.inertia -= self.mass * local_center.length_squared();
            self.inv_inertia = 1.0 / self.inertia;
        } else {
            self.inertia = 0.0;
            self.inv_inertia = 0.0;
        }

        let old_center = self.sweep.c;
        self.sweep.local_center = local_center;
        self.sweep.c = self.transform.apply(local_center);
        self.sweep.c0 = self.sweep.c;

        // Keep the velocity of the old center unchanged
        self.linear_velocity += Vec2::scalar_cross(self.angular_velocity, self.sweep.c - old_center);
    }

    /// Rebuild the transform from the end pose of the sweep
    pub(crate) fn synchronize_transform(&mut self) {
        self.transform = self.sweep.transform_at(1.0);
    }

    pub(crate) fn synchronize_fixtures(&mut self) {
        let xf = self.transform;
        for fixture in &mut self.fixtures {
            fixture.synchronize(&xf);
        }
    }

    /// Largest distance from the center of mass to any fixture surface
    pub(crate) fn extent(&self) -> f32 {
        self.fixtures
            .iter()
            .map(|f| f.shape().extent_from(self.sweep.local_center))
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureDef;
    use crate::shapes::{ChainShape, CircleShape};
    use std::f32::consts::PI;

    fn body_with_circle(def: BodyDef, circle: CircleShape, density: f32) -> RigidBody {
        let mut body = RigidBody::from_def(&def);
        let fixture = Fixture::new(
            &FixtureDef::new(circle).with_density(density),
            &body.transform,
        );
        body.add_fixture(fixture);
        body
    }

    #[test]
    fn test_body_def_defaults() {
        let def = BodyDef::default();
        assert_eq!(def.body_type, BodyType::Static);
        assert_eq!(def.gravity_scale, 1.0);
        assert!(def.allow_sleep);
        assert!(def.awake);
        assert!(!def.bullet);
    }

    #[test]
    fn test_body_def_builder() {
        let def = BodyDef::dynamic(Vec2::new(2.75, 0.0))
            .with_linear_velocity(Vec2::new(-0.5, 0.5))
            .with_angular_velocity(PI)
            .with_bullet(true);

        assert_eq!(def.body_type, BodyType::Dynamic);
        assert_eq!(def.position, Vec2::new(2.75, 0.0));
        assert_eq!(def.linear_velocity, Vec2::new(-0.5, 0.5));
        assert_eq!(def.angular_velocity, PI);
        assert!(def.bullet);
    }

    #[test]
    fn test_body_def_validation() {
        assert!(BodyDef::default().validate().is_ok());
        assert!(BodyDef::dynamic(Vec2::new(f32::NAN, 0.0)).validate().is_err());
        assert!(BodyDef::default().with_damping(-1.0, 0.0).validate().is_err());
        assert!(BodyDef::default()
            .with_angular_velocity(f32::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_dynamic_body_mass_from_circle() {
        let body = body_with_circle(BodyDef::dynamic(Vec2::ZERO), CircleShape::new(0.1), 1.0);
        assert!((body.mass() - PI * 0.01).abs() < 0.0001);
        assert!((body.inv_mass - 1.0 / (PI * 0.01)).abs() < 0.01);
        assert!(body.inv_inertia > 0.0);
    }

    #[test]
    fn test_chain_adds_no_mass() {
        let mut body = body_with_circle(BodyDef::dynamic(Vec2::ZERO), CircleShape::new(2.5), 1.0);
        let mass = body.mass();
        let chain = ChainShape::new(vec![Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)]).unwrap();
        let fixture = Fixture::new(&FixtureDef::new(chain).with_density(1.0), &body.transform);
        body.add_fixture(fixture);
        body.reset_mass_data();
        assert_eq!(body.mass(), mass);
        assert_eq!(body.fixture_count(), 2);
    }

    #[test]
    fn test_dynamic_body_without_density_gets_unit_mass() {
        let body = body_with_circle(BodyDef::dynamic(Vec2::ZERO), CircleShape::new(1.0), 0.0);
        assert_eq!(body.mass(), 1.0);
        assert_eq!(body.inv_inertia, 0.0);
    }

    #[test]
    fn test_static_body_ignores_velocity() {
        let mut body = RigidBody::from_def(&BodyDef::fixed(Vec2::ZERO));
        body.set_linear_velocity(Vec2::X);
        body.set_angular_velocity(1.0);
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
        assert_eq!(body.angular_velocity(), 0.0);
        assert_eq!(body.mass(), 0.0);
    }

    #[test]
    fn test_set_velocity_wakes_body() {
        let mut body = body_with_circle(BodyDef::dynamic(Vec2::ZERO), CircleShape::new(1.0), 1.0);
        body.set_awake(false);
        assert!(!body.is_awake());

        body.set_angular_velocity(PI / 8.0);
        assert!(body.is_awake());
        assert_eq!(body.angular_velocity(), PI / 8.0);
    }

    #[test]
    fn test_sleep_clears_motion() {
        let mut body = body_with_circle(
            BodyDef::dynamic(Vec2::ZERO).with_linear_velocity(Vec2::X),
            CircleShape::new(1.0),
            1.0,
        );
        body.apply_force_to_center(Vec2::Y, true);
        body.set_awake(false);
        assert_eq!(body.linear_velocity(), Vec2::ZERO);
        assert_eq!(body.force(), Vec2::ZERO);
    }

    #[test]
    fn test_offset_fixture_moves_center_of_mass() {
        let body = body_with_circle(
            BodyDef::dynamic(Vec2::new(1.0, 1.0)),
            CircleShape::at(Vec2::new(1.0, 0.0), 0.5),
            1.0,
        );
        assert_eq!(body.local_center(), Vec2::new(1.0, 0.0));
        assert_eq!(body.world_center(), Vec2::new(2.0, 1.0));
        assert_eq!(body.position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let mut body = body_with_circle(BodyDef::dynamic(Vec2::ZERO), CircleShape::new(1.0), 1.0);
        let mass = body.mass();
        body.apply_linear_impulse(Vec2::new(mass, 0.0), body.world_center(), true);
        assert!((body.linear_velocity() - Vec2::X).length() < 0.0001);
        assert_eq!(body.angular_velocity(), 0.0);
    }

    #[test]
    fn test_point_velocity_includes_spin() {
        let body = body_with_circle(
            BodyDef::dynamic(Vec2::ZERO).with_angular_velocity(2.0),
            CircleShape::new(1.0),
            1.0,
        );
        let v = body.linear_velocity_at(Vec2::new(1.0, 0.0));
        assert!((v - Vec2::new(0.0, 2.0)).length() < 0.0001);
    }

    #[test]
    fn test_sweep_interpolation() {
        let sweep = Sweep {
            local_center: Vec2::ZERO,
            c0: Vec2::ZERO,
            c: Vec2::new(2.0, 0.0),
            a0: 0.0,
            a: 1.0,
        };
        let xf = sweep.transform_at(0.5);
        assert_eq!(xf.position, Vec2::new(1.0, 0.0));
        assert!((xf.rotation.angle() - 0.5).abs() < 0.0001);

        let mut rewound = sweep;
        rewound.rewind_to(0.25);
        assert_eq!(rewound.c, Vec2::new(0.5, 0.0));
        assert!((rewound.a - 0.25).abs() < 0.0001);
    }
}
