//! Sequential impulse contact solver
//!
//! Bodies are copied into a flat array for the duration of a step; each
//! constraint refers to its two bodies by index.

use wheel_math::{Rot2, Transform2D, Vec2};

use crate::body::BodyKey;
use crate::collision::Manifold;
use crate::contact::{Contact, ContactKey};
use crate::settings::{BAUMGARTE, LINEAR_SLOP, MAX_LINEAR_CORRECTION, VELOCITY_THRESHOLD};

/// Per-step working copy of a body
#[derive(Clone, Copy, Debug)]
pub(crate) struct SolverBody {
    pub key: BodyKey,
    pub c: Vec2,
    pub a: f32,
    pub v: Vec2,
    pub w: f32,
    pub inv_mass: f32,
    pub inv_inertia: f32,
    pub local_center: Vec2,
    /// Integrates its pose this step (awake and not static)
    pub moving: bool,
    /// Responds to contact impulses
    pub dynamic: bool,
}

impl SolverBody {
    pub fn transform(&self) -> Transform2D {
        let rotation = Rot2::from_angle(self.a);
        Transform2D {
            position: self.c - rotation.apply(self.local_center),
            rotation,
        }
    }

    fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.v += impulse * self.inv_mass;
        self.w += self.inv_inertia * r.cross(impulse);
    }
}

/// Velocity constraint for one contact point
#[derive(Clone, Copy, Debug)]
pub(crate) struct ContactConstraint {
    pub key: ContactKey,
    pub a: usize,
    pub b: usize,
    normal: Vec2,
    tangent: Vec2,
    ra: Vec2,
    rb: Vec2,
    normal_mass: f32,
    tangent_mass: f32,
    friction: f32,
    velocity_bias: f32,
    pub normal_impulse: f32,
    pub tangent_impulse: f32,
}

fn effective_mass(ba: &SolverBody, bb: &SolverBody, ra: Vec2, rb: Vec2, axis: Vec2) -> f32 {
    let rna = ra.cross(axis);
    let rnb = rb.cross(axis);
    let k = ba.inv_mass + bb.inv_mass + ba.inv_inertia * rna * rna + bb.inv_inertia * rnb * rnb;
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

fn relative_velocity(ba: &SolverBody, bb: &SolverBody, ra: Vec2, rb: Vec2) -> Vec2 {
    bb.v + Vec2::scalar_cross(bb.w, rb) - ba.v - Vec2::scalar_cross(ba.w, ra)
}

impl ContactConstraint {
    /// Build a constraint from a contact, scaling last step's impulses by `dt_ratio`
    pub fn new(contact: &Contact, a: usize, b: usize, bodies: &[SolverBody], dt_ratio: f32) -> Self {
        let ba = &bodies[a];
        let bb = &bodies[b];
        let normal = contact.manifold.normal;
        let tangent = normal.cross_scalar(1.0);
        let ra = contact.manifold.point - ba.c;
        let rb = contact.manifold.point - bb.c;

        // Restitution only above the threshold to keep resting contacts quiet
        let vn = normal.dot(relative_velocity(ba, bb, ra, rb));
        let velocity_bias = if vn < -VELOCITY_THRESHOLD {
            -contact.material.restitution * vn
        } else {
            0.0
        };

        Self {
            key: contact.key,
            a,
            b,
            normal,
            tangent,
            ra,
            rb,
            normal_mass: effective_mass(ba, bb, ra, rb, normal),
            tangent_mass: effective_mass(ba, bb, ra, rb, tangent),
            friction: contact.material.friction,
            velocity_bias,
            normal_impulse: contact.normal_impulse * dt_ratio,
            tangent_impulse: contact.tangent_impulse * dt_ratio,
        }
    }

    /// Apply the carried-over impulses
    pub fn warm_start(&self, bodies: &mut [SolverBody]) {
        let p = self.normal * self.normal_impulse + self.tangent * self.tangent_impulse;
        bodies[self.a].apply_impulse(-p, self.ra);
        bodies[self.b].apply_impulse(p, self.rb);
    }

    pub fn solve_velocity(&mut self, bodies: &mut [SolverBody]) {
        // Friction first, bounded by the current normal impulse
        let dv = relative_velocity(&bodies[self.a], &bodies[self.b], self.ra, self.rb);
        let vt = dv.dot(self.tangent);
        let max_friction = self.friction * self.normal_impulse;
        let new_impulse = (self.tangent_impulse - self.tangent_mass * vt).clamp(-max_friction, max_friction);
        let lambda = new_impulse - self.tangent_impulse;
        self.tangent_impulse = new_impulse;
        let p = self.tangent * lambda;
        bodies[self.a].apply_impulse(-p, self.ra);
        bodies[self.b].apply_impulse(p, self.rb);

        let dv = relative_velocity(&bodies[self.a], &bodies[self.b], self.ra, self.rb);
        let vn = dv.dot(self.normal);
        let new_impulse = (self.normal_impulse - self.normal_mass * (vn - self.velocity_bias)).max(0.0);
        let lambda = new_impulse - self.normal_impulse;
        self.normal_impulse = new_impulse;
        let p = self.normal * lambda;
        bodies[self.a].apply_impulse(-p, self.ra);
        bodies[self.b].apply_impulse(p, self.rb);
    }
}

/// Push two bodies apart along a freshly computed manifold
///
/// Returns the separation before correction.
pub(crate) fn solve_position(a: usize, b: usize, manifold: &Manifold, bodies: &mut [SolverBody]) -> f32 {
    let (ca, ma, ia) = (bodies[a].c, bodies[a].inv_mass, bodies[a].inv_inertia);
    let (cb, mb, ib) = (bodies[b].c, bodies[b].inv_mass, bodies[b].inv_inertia);
    let ra = manifold.point - ca;
    let rb = manifold.point - cb;

    let c = (BAUMGARTE * (manifold.separation + LINEAR_SLOP)).clamp(-MAX_LINEAR_CORRECTION, 0.0);
    let rna = ra.cross(manifold.normal);
    let rnb = rb.cross(manifold.normal);
    let k = ma + mb + ia * rna * rna + ib * rnb * rnb;
    let impulse = if k > 0.0 { -c / k } else { 0.0 };
    let p = manifold.normal * impulse;

    bodies[a].c -= p * ma;
    bodies[a].a -= ia * ra.cross(p);
    bodies[b].c += p * mb;
    bodies[b].a += ib * rb.cross(p);

    manifold.separation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureId;
    use crate::material::PhysicsMaterial;

    fn solver_body(c: Vec2, v: Vec2, inv_mass: f32) -> SolverBody {
        SolverBody {
            key: BodyKey::default(),
            c,
            a: 0.0,
            v,
            w: 0.0,
            inv_mass,
            inv_inertia: 0.0,
            local_center: Vec2::ZERO,
            moving: inv_mass > 0.0,
            dynamic: inv_mass > 0.0,
        }
    }

    fn head_on_contact(restitution: f32) -> Contact {
        let id = FixtureId {
            body: BodyKey::default(),
            index: 0,
        };
        Contact {
            key: ContactKey {
                fixture_a: id,
                child_a: 0,
                fixture_b: id,
            },
            manifold: Manifold {
                normal: Vec2::Y,
                point: Vec2::ZERO,
                separation: -0.01,
            },
            material: PhysicsMaterial::new(0.0, restitution),
            is_sensor: false,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
        }
    }

    #[test]
    fn test_elastic_bounce_off_static_body() {
        // Ground (static) below, ball falling onto it at 4 m/s
        let mut bodies = vec![
            solver_body(Vec2::new(0.0, -1.0), Vec2::ZERO, 0.0),
            solver_body(Vec2::new(0.0, 0.5), Vec2::new(0.0, -4.0), 1.0),
        ];
        let mut con = ContactConstraint::new(&head_on_contact(1.0), 0, 1, &bodies, 1.0);
        for _ in 0..8 {
            con.solve_velocity(&mut bodies);
        }
        assert!((bodies[1].v.y - 4.0).abs() < 0.001);
        assert_eq!(bodies[0].v, Vec2::ZERO);
    }

    #[test]
    fn test_slow_impact_does_not_bounce() {
        let mut bodies = vec![
            solver_body(Vec2::new(0.0, -1.0), Vec2::ZERO, 0.0),
            solver_body(Vec2::new(0.0, 0.5), Vec2::new(0.0, -0.5), 1.0),
        ];
        let mut con = ContactConstraint::new(&head_on_contact(1.0), 0, 1, &bodies, 1.0);
        con.solve_velocity(&mut bodies);
        assert!(bodies[1].v.y.abs() < 0.001);
    }

    #[test]
    fn test_normal_impulse_never_pulls() {
        // Already separating: the solver must not apply an attractive impulse
        let mut bodies = vec![
            solver_body(Vec2::new(0.0, -1.0), Vec2::ZERO, 0.0),
            solver_body(Vec2::new(0.0, 0.5), Vec2::new(0.0, 2.0), 1.0),
        ];
        let mut con = ContactConstraint::new(&head_on_contact(0.0), 0, 1, &bodies, 1.0);
        con.solve_velocity(&mut bodies);
        assert_eq!(con.normal_impulse, 0.0);
        assert_eq!(bodies[1].v, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_position_correction_separates() {
        let mut bodies = vec![
            solver_body(Vec2::new(0.0, -1.0), Vec2::ZERO, 0.0),
            solver_body(Vec2::new(0.0, 0.5), Vec2::ZERO, 1.0),
        ];
        let manifold = Manifold {
            normal: Vec2::Y,
            point: Vec2::ZERO,
            separation: -0.1,
        };
        let before = bodies[1].c.y;
        solve_position(0, 1, &manifold, &mut bodies);
        assert!(bodies[1].c.y > before);
        assert_eq!(bodies[0].c, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_solver_body_transform_respects_local_center() {
        let mut body = solver_body(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0);
        body.local_center = Vec2::new(1.0, 0.0);
        assert_eq!(body.transform().position, Vec2::ZERO);
    }
}
