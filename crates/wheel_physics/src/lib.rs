//! 2D rigid body physics
//!
//! This crate provides a small sequential-impulse physics engine:
//! - Circle and chain shapes attached to bodies through fixtures
//! - Contact detection, filtering and begin/end events
//! - Velocity and position solving with friction and restitution
//! - Island sleeping and continuous collision against static geometry
//! - Debug drawing through the [`DebugDraw`] trait

pub mod body;
mod ccd;
pub mod collision;
pub mod contact;
pub mod debug_draw;
pub mod error;
pub mod fixture;
mod island;
pub mod material;
pub mod settings;
pub mod shapes;
mod solver;
pub mod world;

// Re-export commonly used types
pub use body::{BodyDef, BodyKey, BodyType, RigidBody};
pub use collision::{CollisionFilter, CollisionLayer, Manifold};
pub use contact::{Contact, ContactEvent, ContactEventKind, ContactKey};
pub use debug_draw::{DebugDraw, DebugDrawFlags};
pub use error::PhysicsError;
pub use fixture::{Fixture, FixtureDef, FixtureId};
pub use material::PhysicsMaterial;
pub use shapes::{Aabb, ChainShape, CircleShape, EdgeShape, MassData, Shape};
pub use world::{PhysicsConfig, PhysicsWorld, StepStats};
