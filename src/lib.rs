//! Roulette wheel demo
//!
//! A ball bouncing inside a spinning, spiked roulette wheel, simulated with
//! `wheel_physics` and drawn as debug lines.

pub mod config;
pub mod scene;
pub mod systems;
