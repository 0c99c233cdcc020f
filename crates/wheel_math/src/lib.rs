//! 2D Mathematics Library
//!
//! This crate provides the vector, rotation, and color types shared by the
//! physics, scene, and render crates.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Rot2`] - 2D rotation stored as sine/cosine
//! - [`Transform2D`] - Position plus rotation
//! - [`Color`] - Linear RGBA color

mod vec2;
mod rot2;
mod color;

pub use vec2::Vec2;
pub use rot2::{Rot2, Transform2D};
pub use color::Color;
