//! 2D rotation and rigid transform

use serde::{Serialize, Deserialize};

use crate::Vec2;

/// A 2D rotation stored as sine/cosine
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rot2 {
    pub sin: f32,
    pub cos: f32,
}

impl Default for Rot2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rot2 {
    pub const IDENTITY: Self = Self { sin: 0.0, cos: 1.0 };

    /// Rotation by `angle` radians (counter-clockwise)
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { sin, cos }
    }

    /// The rotation angle in radians, in (-PI, PI]
    #[inline]
    pub fn angle(self) -> f32 {
        self.sin.atan2(self.cos)
    }

    /// Rotate a vector
    #[inline]
    pub fn apply(self, v: Vec2) -> Vec2 {
        Vec2::new(self.cos * v.x - self.sin * v.y, self.sin * v.x + self.cos * v.y)
    }

    /// Rotate a vector by the inverse rotation
    #[inline]
    pub fn apply_inverse(self, v: Vec2) -> Vec2 {
        Vec2::new(self.cos * v.x + self.sin * v.y, -self.sin * v.x + self.cos * v.y)
    }

    /// Local x axis of the rotated frame
    #[inline]
    pub fn x_axis(self) -> Vec2 {
        Vec2::new(self.cos, self.sin)
    }

    /// Local y axis of the rotated frame
    #[inline]
    pub fn y_axis(self) -> Vec2 {
        Vec2::new(-self.sin, self.cos)
    }
}

/// Position plus rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: Rot2,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: Rot2::IDENTITY,
    };

    /// Create a transform from a position and an angle in radians
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            rotation: Rot2::from_angle(angle),
        }
    }

    /// Map a local point to world space
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.rotation.apply(local) + self.position
    }

    /// Map a world point to local space
    #[inline]
    pub fn apply_inverse(&self, world: Vec2) -> Vec2 {
        self.rotation.apply_inverse(world - self.position)
    }
}
