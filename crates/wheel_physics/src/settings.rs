//! Global tuning constants for the solver
//!
//! Lengths are in meters, angles in radians, times in seconds.

use std::f32::consts::PI;

/// Collision and constraint tolerance
pub const LINEAR_SLOP: f32 = 0.005;

/// Skin radius around chain edges
pub const POLYGON_RADIUS: f32 = 2.0 * LINEAR_SLOP;

/// Extra room added to fixture bounds before pairing
pub const AABB_MARGIN: f32 = 0.1;

/// Maximum translation of a body per step
pub const MAX_TRANSLATION: f32 = 2.0;

/// Maximum rotation of a body per step
pub const MAX_ROTATION: f32 = 0.5 * PI;

/// Fraction of overlap resolved per position iteration
pub const BAUMGARTE: f32 = 0.2;

/// Largest positional correction applied by one constraint pass
pub const MAX_LINEAR_CORRECTION: f32 = 0.2;

/// Approach speed above which restitution kicks in (m/s)
pub const VELOCITY_THRESHOLD: f32 = 1.0;

/// Time an island must stay still before it sleeps
pub const TIME_TO_SLEEP: f32 = 0.5;

/// Linear speed below which a body counts as still
pub const LINEAR_SLEEP_TOLERANCE: f32 = 0.01;

/// Angular speed below which a body counts as still
pub const ANGULAR_SLEEP_TOLERANCE: f32 = 2.0 / 180.0 * PI;

/// Conservative advancement iteration cap
pub const MAX_TOI_ITERATIONS: usize = 20;
