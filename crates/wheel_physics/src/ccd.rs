//! Continuous collision by conservative advancement
//!
//! Finds the earliest fraction of a step at which two swept shapes come
//! within touching distance, so fast bodies cannot tunnel through thin
//! chains.

use crate::body::Sweep;
use crate::collision;
use crate::settings::{LINEAR_SLOP, MAX_TOI_ITERATIONS};
use crate::shapes::Shape;

/// A shape moving with its body over one step
pub(crate) struct SweptShape<'a> {
    pub shape: &'a Shape,
    pub child: usize,
    pub sweep: &'a Sweep,
    /// Largest distance from the center of mass to the shape surface
    pub extent: f32,
}

/// Surface overlap targeted at impact, so the next step sees a contact
const TARGET_SEPARATION: f32 = -LINEAR_SLOP;
const TOLERANCE: f32 = 0.25 * LINEAR_SLOP;

/// Fraction of the step in [0, 1) at which `a` and `b` first touch
///
/// Returns `None` if they never touch during the step. A pair that starts
/// out touching is only stopped if it would sink deeper than it began.
pub(crate) fn time_of_impact(a: &SweptShape<'_>, b: &SweptShape<'_>) -> Option<f32> {
    let separation_at = |t: f32| {
        collision::separation(
            a.shape,
            a.child,
            &a.sweep.transform_at(t),
            b.shape,
            &b.sweep.transform_at(t),
        )
    };

    // Upper bound on how fast any two surface points approach each other
    let da = a.sweep.c - a.sweep.c0;
    let db = b.sweep.c - b.sweep.c0;
    let bound = (db - da).length()
        + (a.sweep.a - a.sweep.a0).abs() * a.extent
        + (b.sweep.a - b.sweep.a0).abs() * b.extent;
    if bound <= f32::EPSILON {
        return None;
    }

    let s0 = separation_at(0.0)?;
    let target = if s0 <= TARGET_SEPARATION + TOLERANCE {
        s0 - LINEAR_SLOP
    } else {
        TARGET_SEPARATION
    };

    let mut t = 0.0;
    for _ in 0..MAX_TOI_ITERATIONS {
        let s = separation_at(t)?;
        if s <= target + TOLERANCE {
            return Some(t);
        }
        t += (s - target) / bound;
        if t >= 1.0 {
            return None;
        }
    }
    Some(t)
}
