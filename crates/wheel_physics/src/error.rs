//! Physics error types

use std::fmt;

use crate::body::BodyKey;

/// Error returned when building bodies and fixtures
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The shape is degenerate (zero radius, too few or coincident vertices)
    InvalidShape(String),
    /// A body or fixture definition holds a non-finite or out-of-range value
    InvalidDefinition(String),
    /// The body key is stale or was never issued by this world
    UnknownBody(BodyKey),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidShape(msg) => write!(f, "Invalid shape: {}", msg),
            PhysicsError::InvalidDefinition(msg) => write!(f, "Invalid definition: {}", msg),
            PhysicsError::UnknownBody(key) => write!(f, "Unknown body: {:?}", key),
        }
    }
}

impl std::error::Error for PhysicsError {}
