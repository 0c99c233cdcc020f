//! Surface properties used when two fixtures touch

use serde::{Deserialize, Serialize};

/// Friction and restitution of a fixture surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Coulomb friction coefficient (0.0 = frictionless)
    pub friction: f32,
    /// Bounciness (0.0 = inelastic, 1.0 = perfectly elastic)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Create a material; friction is clamped to be non-negative and
    /// restitution to [0.0, 1.0]
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction: friction.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Mix two surfaces for a contact
    ///
    /// Friction is the geometric mean so a frictionless surface always
    /// slides; restitution takes the bouncier of the two.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = PhysicsMaterial::default();
        assert_eq!(material.friction, 0.2);
        assert_eq!(material.restitution, 0.0);
    }

    #[test]
    fn test_new_clamps_values() {
        let material = PhysicsMaterial::new(-0.5, 1.5);
        assert_eq!(material.friction, 0.0);
        assert_eq!(material.restitution, 1.0);

        // Friction above one is legal (rubber on rubber)
        let material = PhysicsMaterial::new(1.2, -2.0);
        assert_eq!(material.friction, 1.2);
        assert_eq!(material.restitution, 0.0);
    }

    #[test]
    fn test_combine_geometric_mean_friction() {
        let combined = PhysicsMaterial::new(0.04, 0.1).combine(&PhysicsMaterial::new(1.0, 0.9));
        assert!((combined.friction - 0.2).abs() < 0.0001);
    }

    #[test]
    fn test_combine_max_restitution() {
        let a = PhysicsMaterial::new(1.0, 0.3);
        let b = PhysicsMaterial::new(1.0, 0.9);
        assert_eq!(a.combine(&b).restitution, 0.9);
        assert_eq!(b.combine(&a).restitution, 0.9);
    }

    #[test]
    fn test_combine_frictionless_slides() {
        let ice = PhysicsMaterial::new(0.0, 0.0);
        let rough = PhysicsMaterial::new(1.0, 0.0);
        assert_eq!(ice.combine(&rough).friction, 0.0);
    }
}
