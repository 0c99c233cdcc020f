//! Contacts between fixtures and the events they produce

use crate::collision::Manifold;
use crate::fixture::FixtureId;
use crate::material::PhysicsMaterial;

/// Identifies a contact: a child of fixture A touching fixture B
///
/// Chain fixtures are always on side A, one contact per touching segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactKey {
    pub fixture_a: FixtureId,
    pub child_a: usize,
    pub fixture_b: FixtureId,
}

impl ContactKey {
    /// Check whether either side belongs to `body`
    pub fn involves(&self, body: crate::BodyKey) -> bool {
        self.fixture_a.body == body || self.fixture_b.body == body
    }
}

/// A touching pair of fixtures
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub key: ContactKey,
    pub manifold: Manifold,
    /// Mixed surface of both fixtures
    pub material: PhysicsMaterial,
    pub is_sensor: bool,
    /// Accumulated normal impulse from the last step
    pub normal_impulse: f32,
    /// Accumulated friction impulse from the last step
    pub tangent_impulse: f32,
}

/// Whether a contact started or stopped touching
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEventKind {
    Began,
    Ended,
}

/// Reported once per transition of a contact during a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub kind: ContactEventKind,
    pub key: ContactKey,
    pub is_sensor: bool,
}

impl ContactEvent {
    pub fn began(&self) -> bool {
        self.kind == ContactEventKind::Began
    }
}
