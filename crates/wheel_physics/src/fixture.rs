//! Fixtures attach shapes and surface properties to bodies

use wheel_math::Transform2D;

use crate::body::BodyKey;
use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb, Shape};

/// Identifies a fixture by its body and its index on that body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureId {
    pub body: BodyKey,
    pub index: usize,
}

/// Everything needed to create a fixture
#[derive(Clone, Debug)]
pub struct FixtureDef {
    pub shape: Shape,
    /// Mass per square meter
    pub density: f32,
    pub material: PhysicsMaterial,
    /// Sensors report overlaps without a collision response
    pub is_sensor: bool,
    pub filter: CollisionFilter,
}

impl FixtureDef {
    /// Fixture with zero density and default surface
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            density: 0.0,
            material: PhysicsMaterial::default(),
            is_sensor: false,
            filter: CollisionFilter::default(),
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.material.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.material.restitution = restitution;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// A shape attached to a body
#[derive(Clone, Debug)]
pub struct Fixture {
    shape: Shape,
    density: f32,
    material: PhysicsMaterial,
    is_sensor: bool,
    filter: CollisionFilter,
    /// World bounds, refreshed after every step
    aabb: Aabb,
}

impl Fixture {
    pub(crate) fn new(def: &FixtureDef, xf: &Transform2D) -> Self {
        Self {
            aabb: def.shape.compute_aabb(xf),
            shape: def.shape.clone(),
            density: def.density,
            material: PhysicsMaterial::new(def.material.friction, def.material.restitution),
            is_sensor: def.is_sensor,
            filter: def.filter,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn material(&self) -> PhysicsMaterial {
        self.material
    }

    pub fn friction(&self) -> f32 {
        self.material.friction
    }

    pub fn restitution(&self) -> f32 {
        self.material.restitution
    }

    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CollisionFilter) {
        self.filter = filter;
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    pub(crate) fn synchronize(&mut self, xf: &Transform2D) {
        self.aabb = self.shape.compute_aabb(xf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::CircleShape;
    use wheel_math::Vec2;

    #[test]
    fn test_fixture_def_builder() {
        let def = FixtureDef::new(CircleShape::new(0.1))
            .with_density(1.0)
            .with_friction(1.0)
            .with_restitution(0.9)
            .with_sensor(false);

        assert_eq!(def.density, 1.0);
        assert_eq!(def.material.friction, 1.0);
        assert_eq!(def.material.restitution, 0.9);
        assert!(!def.is_sensor);
        assert_eq!(def.filter, CollisionFilter::default());
    }

    #[test]
    fn test_fixture_clamps_material() {
        let def = FixtureDef::new(CircleShape::new(0.1)).with_restitution(3.0);
        let fixture = Fixture::new(&def, &Transform2D::IDENTITY);
        assert_eq!(fixture.restitution(), 1.0);
    }

    #[test]
    fn test_fixture_aabb_tracks_transform() {
        let def = FixtureDef::new(CircleShape::new(0.5));
        let mut fixture = Fixture::new(&def, &Transform2D::IDENTITY);
        assert_eq!(fixture.aabb().center(), Vec2::ZERO);

        fixture.synchronize(&Transform2D::new(Vec2::new(2.0, 1.0), 0.0));
        assert_eq!(fixture.aabb().center(), Vec2::new(2.0, 1.0));
    }
}
