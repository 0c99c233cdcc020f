//! Physics world and simulation

use std::collections::BTreeMap;

use log::{debug, trace};
use slotmap::{SecondaryMap, SlotMap};

use wheel_math::{Color, Transform2D, Vec2};

use crate::body::{BodyDef, BodyKey, BodyType, RigidBody};
use crate::ccd::{time_of_impact, SweptShape};
use crate::collision;
use crate::contact::{Contact, ContactEvent, ContactEventKind, ContactKey};
use crate::debug_draw::{colors, DebugDraw, DebugDrawFlags};
use crate::error::PhysicsError;
use crate::fixture::{Fixture, FixtureDef, FixtureId};
use crate::island::IslandBuilder;
use crate::settings::{
    ANGULAR_SLEEP_TOLERANCE, LINEAR_SLEEP_TOLERANCE, LINEAR_SLOP, MAX_ROTATION, MAX_TRANSLATION,
    TIME_TO_SLEEP,
};
use crate::shapes::{Aabb, Shape};
use crate::solver::{solve_position, ContactConstraint, SolverBody};

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration in m/s²
    pub gravity: Vec2,
    /// Let still islands fall asleep
    pub allow_sleeping: bool,
    /// Sweep dynamic bodies against static ones to prevent tunnelling
    pub continuous_physics: bool,
    /// Seed each step's solver with last step's impulses
    pub warm_starting: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -10.0),
            allow_sleeping: true,
            continuous_physics: true,
            warm_starting: true,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }
}

/// Counters from the most recent step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub contacts: usize,
    pub constraints: usize,
    pub islands: usize,
    pub sleeping_bodies: usize,
    pub toi_events: usize,
}

/// The physics world owning all bodies and contacts
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Touching contacts, ordered for a deterministic solve
    contacts: BTreeMap<ContactKey, Contact>,
    /// Contact transitions from the last step
    events: Vec<ContactEvent>,
    /// Physics configuration
    pub config: PhysicsConfig,
    /// Inverse of the previous step's dt (0 before the first step)
    inv_dt0: f32,
    stats: StepStats,
}

impl PhysicsWorld {
    /// Create a world with the given gravity and default settings
    pub fn new(gravity: Vec2) -> Self {
        Self::with_config(PhysicsConfig::new(gravity))
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            contacts: BTreeMap::new(),
            events: Vec::new(),
            config,
            inv_dt0: 0.0,
            stats: StepStats::default(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    pub fn allow_sleeping(&self) -> bool {
        self.config.allow_sleeping
    }

    /// Enable or disable sleeping; disabling wakes every body
    pub fn set_allow_sleeping(&mut self, allow: bool) {
        if allow == self.config.allow_sleeping {
            return;
        }
        self.config.allow_sleeping = allow;
        if !allow {
            for body in self.bodies.values_mut() {
                body.set_awake(true);
            }
        }
    }

    pub fn continuous_physics(&self) -> bool {
        self.config.continuous_physics
    }

    pub fn set_continuous_physics(&mut self, enabled: bool) {
        self.config.continuous_physics = enabled;
    }

    /// Create a body with no fixtures
    pub fn create_body(&mut self, def: &BodyDef) -> Result<BodyKey, PhysicsError> {
        def.validate()?;
        let key = self.bodies.insert(RigidBody::from_def(def));
        debug!(
            "Created {:?} body {:?} at ({:.2}, {:.2})",
            def.body_type, key, def.position.x, def.position.y
        );
        Ok(key)
    }

    /// Attach a fixture to a body, updating its mass if the fixture has density
    pub fn create_fixture(&mut self, body: BodyKey, def: &FixtureDef) -> Result<FixtureId, PhysicsError> {
        def.shape.validate()?;
        if !(def.density.is_finite() && def.density >= 0.0) {
            return Err(PhysicsError::InvalidDefinition(format!(
                "density must be finite and non-negative, got {}",
                def.density
            )));
        }
        if !(def.material.friction.is_finite() && def.material.restitution.is_finite()) {
            return Err(PhysicsError::InvalidDefinition(
                "friction and restitution must be finite".to_string(),
            ));
        }

        let rigid_body = self
            .bodies
            .get_mut(body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        let fixture = Fixture::new(def, rigid_body.transform());
        let index = rigid_body.add_fixture(fixture);
        debug!(
            "Attached {} fixture {} to body {:?} (density {}, sensor {})",
            def.shape.kind(),
            index,
            body,
            def.density,
            def.is_sensor
        );
        Ok(FixtureId { body, index })
    }

    /// Remove a body, ending any contacts it was part of
    pub fn destroy_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let body = self.bodies.remove(key)?;
        let ended: Vec<ContactKey> = self
            .contacts
            .keys()
            .filter(|k| k.involves(key))
            .copied()
            .collect();
        for contact_key in ended {
            if let Some(contact) = self.contacts.remove(&contact_key) {
                self.events.push(ContactEvent {
                    kind: ContactEventKind::Ended,
                    key: contact_key,
                    is_sensor: contact.is_sensor,
                });
            }
        }
        debug!("Destroyed body {:?}", key);
        Some(body)
    }

    /// Get an immutable reference to a body by key
    pub fn body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all bodies with their keys
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> {
        self.bodies.iter()
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.bodies.get(id.body)?.fixtures.get(id.index)
    }

    /// Contacts touching after the last step
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Begin/end events produced by the last step
    pub fn contact_events(&self) -> &[ContactEvent] {
        &self.events
    }

    pub fn last_step_stats(&self) -> StepStats {
        self.stats
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Updates contacts, solves velocities then positions, puts still
    /// islands to sleep, and finally sweeps fast bodies for impacts.
    /// A non-positive `dt` does nothing.
    pub fn step(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize) {
        self.events.clear();
        self.stats = StepStats::default();
        if !(dt > 0.0) {
            return;
        }

        self.update_contacts();
        self.solve(dt, velocity_iterations, position_iterations);
        if self.config.continuous_physics {
            self.solve_toi();
        }

        for body in self.bodies.values_mut() {
            body.clear_forces();
        }
        self.inv_dt0 = 1.0 / dt;
        self.stats.contacts = self.contacts.len();

        trace!(
            "Step dt={:.4}: {} contacts, {} constraints, {} islands, {} asleep, {} toi",
            dt,
            self.stats.contacts,
            self.stats.constraints,
            self.stats.islands,
            self.stats.sleeping_bodies,
            self.stats.toi_events
        );
    }

    /// Run the narrow phase and diff against the previous contact set
    fn update_contacts(&mut self) {
        struct Proxy {
            id: FixtureId,
            aabb: Aabb,
            dynamic: bool,
        }

        let mut proxies = Vec::new();
        for (key, body) in &self.bodies {
            for (index, fixture) in body.fixtures.iter().enumerate() {
                proxies.push(Proxy {
                    id: FixtureId { body: key, index },
                    aabb: fixture.aabb(),
                    dynamic: body.is_dynamic(),
                });
            }
        }

        let mut found = BTreeMap::new();
        for (i, pa) in proxies.iter().enumerate() {
            for pb in &proxies[i + 1..] {
                if pa.id.body == pb.id.body || !(pa.dynamic || pb.dynamic) {
                    continue;
                }
                if !pa.aabb.overlaps(&pb.aabb) {
                    continue;
                }
                let (Some(fa), Some(fb)) = (self.fixture(pa.id), self.fixture(pb.id)) else {
                    continue;
                };
                if !fa.filter().collides_with(&fb.filter()) {
                    continue;
                }
                // Chains always sit on side A
                match (fa.shape(), fb.shape()) {
                    (Shape::Chain(_), Shape::Chain(_)) => {}
                    (Shape::Circle(_), Shape::Chain(_)) => self.collide_pair(pb.id, pa.id, &mut found),
                    _ => self.collide_pair(pa.id, pb.id, &mut found),
                }
            }
        }

        for (key, contact) in found.iter_mut() {
            match self.contacts.get(key) {
                Some(old) => {
                    contact.normal_impulse = old.normal_impulse;
                    contact.tangent_impulse = old.tangent_impulse;
                }
                None => self.events.push(ContactEvent {
                    kind: ContactEventKind::Began,
                    key: *key,
                    is_sensor: contact.is_sensor,
                }),
            }
        }
        for (key, old) in &self.contacts {
            if !found.contains_key(key) {
                self.events.push(ContactEvent {
                    kind: ContactEventKind::Ended,
                    key: *key,
                    is_sensor: old.is_sensor,
                });
            }
        }
        self.contacts = found;
    }

    fn collide_pair(&self, id_a: FixtureId, id_b: FixtureId, out: &mut BTreeMap<ContactKey, Contact>) {
        let (Some(body_a), Some(body_b)) = (self.bodies.get(id_a.body), self.bodies.get(id_b.body)) else {
            return;
        };
        let (Some(fa), Some(fb)) = (body_a.fixtures.get(id_a.index), body_b.fixtures.get(id_b.index)) else {
            return;
        };
        let is_sensor = fa.is_sensor() || fb.is_sensor();
        let material = fa.material().combine(&fb.material());
        let bounds_b = fb.aabb();

        for child in 0..fa.shape().child_count() {
            if let Shape::Chain(chain) = fa.shape() {
                if !chain.edge(child).compute_aabb(body_a.transform()).overlaps(&bounds_b) {
                    continue;
                }
            }
            let Some(manifold) =
                collision::collide(fa.shape(), child, body_a.transform(), fb.shape(), body_b.transform())
            else {
                continue;
            };
            let key = ContactKey {
                fixture_a: id_a,
                child_a: child,
                fixture_b: id_b,
            };
            out.insert(
                key,
                Contact {
                    key,
                    manifold,
                    material,
                    is_sensor,
                    normal_impulse: 0.0,
                    tangent_impulse: 0.0,
                },
            );
        }
    }

    /// Group dynamic bodies connected by solid contacts
    fn build_islands(&self) -> Vec<Vec<BodyKey>> {
        let dynamic: Vec<BodyKey> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic())
            .map(|(k, _)| k)
            .collect();
        let mut builder = IslandBuilder::new(dynamic);
        for contact in self.contacts.values().filter(|c| !c.is_sensor) {
            builder.connect(contact.key.fixture_a.body, contact.key.fixture_b.body);
        }
        builder.finish()
    }

    /// Wake sleeping bodies pushed by moving kinematic bodies or by awake island mates
    fn propagate_wake(&mut self, islands: &[Vec<BodyKey>]) {
        let mut woken = Vec::new();
        for contact in self.contacts.values().filter(|c| !c.is_sensor) {
            let (ka, kb) = (contact.key.fixture_a.body, contact.key.fixture_b.body);
            let (Some(a), Some(b)) = (self.bodies.get(ka), self.bodies.get(kb)) else {
                continue;
            };
            let kinematic_moving = |body: &RigidBody| {
                body.body_type() == BodyType::Kinematic && body.is_awake()
            };
            if kinematic_moving(a) && b.is_dynamic() {
                woken.push(kb);
            } else if kinematic_moving(b) && a.is_dynamic() {
                woken.push(ka);
            }
        }
        for key in woken {
            if let Some(body) = self.bodies.get_mut(key) {
                body.set_awake(true);
            }
        }

        for island in islands {
            if island.iter().any(|k| self.bodies.get(*k).is_some_and(|b| b.is_awake())) {
                for key in island {
                    if let Some(body) = self.bodies.get_mut(*key) {
                        body.set_awake(true);
                    }
                }
            }
        }
    }

    fn solve(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize) {
        for body in self.bodies.values_mut() {
            body.sweep.c0 = body.sweep.c;
            body.sweep.a0 = body.sweep.a;
        }

        let islands = self.build_islands();
        self.stats.islands = islands.len();
        self.propagate_wake(&islands);

        // Integrate velocities into the working copies
        let gravity = self.config.gravity;
        let mut index: SecondaryMap<BodyKey, usize> = SecondaryMap::new();
        let mut solver_bodies = Vec::with_capacity(self.bodies.len());
        for (key, body) in &self.bodies {
            let moving = body.body_type() != BodyType::Static && body.is_awake();
            let dynamic = body.is_dynamic() && body.is_awake();
            let mut v = body.linear_velocity;
            let mut w = body.angular_velocity;
            if dynamic {
                v += (gravity * body.gravity_scale + body.force() * body.inv_mass) * dt;
                w += dt * body.inv_inertia * body.torque();
                v *= 1.0 / (1.0 + dt * body.linear_damping);
                w *= 1.0 / (1.0 + dt * body.angular_damping);
            }
            index.insert(key, solver_bodies.len());
            solver_bodies.push(SolverBody {
                key,
                c: body.sweep.c,
                a: body.sweep.a,
                v,
                w,
                inv_mass: if dynamic { body.inv_mass } else { 0.0 },
                inv_inertia: if dynamic { body.inv_inertia } else { 0.0 },
                local_center: body.sweep.local_center,
                moving,
                dynamic,
            });
        }

        let dt_ratio = if self.config.warm_starting {
            self.inv_dt0 * dt
        } else {
            0.0
        };
        let mut constraints = Vec::new();
        for contact in self.contacts.values().filter(|c| !c.is_sensor) {
            let (Some(&a), Some(&b)) = (
                index.get(contact.key.fixture_a.body),
                index.get(contact.key.fixture_b.body),
            ) else {
                continue;
            };
            if !(solver_bodies[a].dynamic || solver_bodies[b].dynamic) {
                continue;
            }
            constraints.push(ContactConstraint::new(contact, a, b, &solver_bodies, dt_ratio));
        }
        self.stats.constraints = constraints.len();

        if self.config.warm_starting {
            for con in &constraints {
                con.warm_start(&mut solver_bodies);
            }
        }
        for _ in 0..velocity_iterations {
            for con in constraints.iter_mut() {
                con.solve_velocity(&mut solver_bodies);
            }
        }
        for con in &constraints {
            if let Some(contact) = self.contacts.get_mut(&con.key) {
                contact.normal_impulse = con.normal_impulse;
                contact.tangent_impulse = con.tangent_impulse;
            }
        }

        // Integrate positions, clamping large motions
        for sb in solver_bodies.iter_mut().filter(|sb| sb.moving) {
            let translation = sb.v * dt;
            if translation.length_squared() > MAX_TRANSLATION * MAX_TRANSLATION {
                sb.v *= MAX_TRANSLATION / translation.length();
            }
            let rotation = dt * sb.w;
            if rotation * rotation > MAX_ROTATION * MAX_ROTATION {
                sb.w *= MAX_ROTATION / rotation.abs();
            }
            sb.c += sb.v * dt;
            sb.a += sb.w * dt;
        }

        for _ in 0..position_iterations {
            let mut min_separation = 0.0f32;
            for con in &constraints {
                let (Some(fa), Some(fb)) = (self.fixture(con.key.fixture_a), self.fixture(con.key.fixture_b)) else {
                    continue;
                };
                let xf_a = solver_bodies[con.a].transform();
                let xf_b = solver_bodies[con.b].transform();
                let Some(manifold) =
                    collision::collide(fa.shape(), con.key.child_a, &xf_a, fb.shape(), &xf_b)
                else {
                    continue;
                };
                let separation = solve_position(con.a, con.b, &manifold, &mut solver_bodies);
                min_separation = min_separation.min(separation);
            }
            if min_separation >= -3.0 * LINEAR_SLOP {
                break;
            }
        }

        for sb in solver_bodies.iter().filter(|sb| sb.moving) {
            if let Some(body) = self.bodies.get_mut(sb.key) {
                body.sweep.c = sb.c;
                body.sweep.a = sb.a;
                body.linear_velocity = sb.v;
                body.angular_velocity = sb.w;
                body.synchronize_transform();
                body.synchronize_fixtures();
            }
        }

        if self.config.allow_sleeping {
            self.update_sleep(&islands, dt);
        }
        self.stats.sleeping_bodies = self
            .bodies
            .values()
            .filter(|b| b.is_dynamic() && !b.is_awake())
            .count();
    }

    /// Put islands to sleep once every body in them has been still long enough
    fn update_sleep(&mut self, islands: &[Vec<BodyKey>], dt: f32) {
        let lin_tol_sq = LINEAR_SLEEP_TOLERANCE * LINEAR_SLEEP_TOLERANCE;
        let ang_tol_sq = ANGULAR_SLEEP_TOLERANCE * ANGULAR_SLEEP_TOLERANCE;

        for island in islands {
            let mut min_sleep_time = f32::MAX;
            let mut any_awake = false;
            for key in island {
                let Some(body) = self.bodies.get_mut(*key) else {
                    continue;
                };
                if !body.is_awake() {
                    continue;
                }
                any_awake = true;
                if !body.allows_sleep()
                    || body.angular_velocity * body.angular_velocity > ang_tol_sq
                    || body.linear_velocity.length_squared() > lin_tol_sq
                {
                    body.sleep_time = 0.0;
                    min_sleep_time = 0.0;
                } else {
                    body.sleep_time += dt;
                    min_sleep_time = min_sleep_time.min(body.sleep_time);
                }
            }

            if any_awake && min_sleep_time >= TIME_TO_SLEEP {
                debug!("Island of {} bodies fell asleep", island.len());
                for key in island {
                    if let Some(body) = self.bodies.get_mut(*key) {
                        body.set_awake(false);
                    }
                }
            }
        }
    }

    /// Pull fast bodies back to their first impact with static geometry
    /// (or with anything, for bullets)
    fn solve_toi(&mut self) {
        let movers: Vec<BodyKey> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_dynamic() && b.is_awake() && !b.fixtures.is_empty())
            .map(|(k, _)| k)
            .collect();

        for key in movers {
            let Some(body) = self.bodies.get(key) else {
                continue;
            };
            let swept = swept_bounds(body);
            let extent = body.extent();
            let mut min_toi = 1.0f32;

            for (other_key, other) in &self.bodies {
                if other_key == key {
                    continue;
                }
                let needs_ccd = !other.is_dynamic() || body.is_bullet() || other.is_bullet();
                if !needs_ccd || !swept.overlaps(&swept_bounds(other)) {
                    continue;
                }
                let other_extent = other.extent();

                for fa in body.fixtures.iter().filter(|f| !f.is_sensor()) {
                    for fb in other.fixtures.iter().filter(|f| !f.is_sensor()) {
                        if !fa.filter().collides_with(&fb.filter()) {
                            continue;
                        }
                        let mine = (fa.shape(), &body.sweep, extent);
                        let theirs = (fb.shape(), &other.sweep, other_extent);
                        let (first, second) = match (fa.shape(), fb.shape()) {
                            (Shape::Chain(_), Shape::Chain(_)) => continue,
                            (Shape::Circle(_), Shape::Chain(_)) => (theirs, mine),
                            _ => (mine, theirs),
                        };
                        for child in 0..first.0.child_count() {
                            let a = SweptShape {
                                shape: first.0,
                                child,
                                sweep: first.1,
                                extent: first.2,
                            };
                            let b = SweptShape {
                                shape: second.0,
                                child: 0,
                                sweep: second.1,
                                extent: second.2,
                            };
                            if let Some(toi) = time_of_impact(&a, &b) {
                                min_toi = min_toi.min(toi);
                            }
                        }
                    }
                }
            }

            if min_toi < 1.0 {
                if let Some(body) = self.bodies.get_mut(key) {
                    body.sweep.rewind_to(min_toi);
                    body.synchronize_transform();
                    body.synchronize_fixtures();
                    self.stats.toi_events += 1;
                    trace!("Body {:?} stopped at toi {:.3}", key, min_toi);
                }
            }
        }
    }

    /// Emit debug geometry for the parts selected by `flags`
    pub fn debug_draw(&self, draw: &mut dyn DebugDraw, flags: DebugDrawFlags) {
        if flags.contains(DebugDrawFlags::SHAPES) {
            for body in self.bodies.values() {
                let color = body_color(body);
                let xf = body.transform();
                for fixture in &body.fixtures {
                    draw_shape(draw, fixture.shape(), xf, color);
                }
            }
        }

        if flags.contains(DebugDrawFlags::AABBS) {
            for body in self.bodies.values() {
                for fixture in &body.fixtures {
                    draw.draw_polygon(&fixture.aabb().corners(), colors::AABB);
                }
            }
        }

        if flags.contains(DebugDrawFlags::CENTER_OF_MASS) {
            for body in self.bodies.values() {
                draw.draw_transform(&Transform2D {
                    position: body.world_center(),
                    rotation: body.transform().rotation,
                });
            }
        }

        if flags.contains(DebugDrawFlags::CONTACT_POINTS) {
            for contact in self.contacts.values() {
                let m = &contact.manifold;
                draw.draw_point(m.point, 0.05, colors::CONTACT);
                draw.draw_segment(m.point, m.point + m.normal * 0.3, Color::YELLOW);
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_config(PhysicsConfig::default())
    }
}

fn body_color(body: &RigidBody) -> Color {
    match body.body_type() {
        BodyType::Static => colors::STATIC,
        BodyType::Kinematic => colors::KINEMATIC,
        BodyType::Dynamic if !body.is_awake() => colors::SLEEPING,
        BodyType::Dynamic => colors::AWAKE,
    }
}

fn draw_shape(draw: &mut dyn DebugDraw, shape: &Shape, xf: &Transform2D, color: Color) {
    match shape {
        Shape::Circle(circle) => {
            draw.draw_solid_circle(xf.apply(circle.center), circle.radius, xf.rotation.x_axis(), color);
        }
        Shape::Chain(chain) => {
            let mut prev = xf.apply(chain.vertices()[0]);
            for v in &chain.vertices()[1..] {
                let next = xf.apply(*v);
                draw.draw_segment(prev, next, color);
                prev = next;
            }
        }
    }
}

/// Region covered by a body's fixtures over the last step
fn swept_bounds(body: &RigidBody) -> Aabb {
    let extent = body.extent();
    Aabb::around_circle(body.sweep.c0, extent).union(&Aabb::around_circle(body.sweep.c, extent))
}
