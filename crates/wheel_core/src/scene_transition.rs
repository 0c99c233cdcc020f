//! Scene transition effects
//!
//! Transitions are driven by the frame clock: the director calls
//! [`SceneTransition::advance`] with the frame delta, so a paused or
//! stepped simulation transitions at the same pace as it simulates.

use std::time::Duration;

use wheel_math::Vec2;

/// Direction for slide transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    /// Unit vector in world space (y up)
    pub fn vector(self) -> Vec2 {
        match self {
            SlideDirection::Left => -Vec2::X,
            SlideDirection::Right => Vec2::X,
            SlideDirection::Up => Vec2::Y,
            SlideDirection::Down => -Vec2::Y,
        }
    }
}

/// Transition effect between scenes
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionEffect {
    /// Instant cut
    Instant,
    /// Fade the old scene out, then fade the new one in
    Fade {
        /// Total duration (out + in)
        duration: Duration,
    },
    /// Blend from the old scene to the new one
    Crossfade { duration: Duration },
    /// Slide the old scene out while the new one slides in
    Slide {
        duration: Duration,
        direction: SlideDirection,
    },
}

impl TransitionEffect {
    /// Duration of this effect (Instant returns Duration::ZERO)
    pub fn duration(&self) -> Duration {
        match self {
            TransitionEffect::Instant => Duration::ZERO,
            TransitionEffect::Fade { duration } => *duration,
            TransitionEffect::Crossfade { duration } => *duration,
            TransitionEffect::Slide { duration, .. } => *duration,
        }
    }
}

/// Active transition between two scenes
#[derive(Clone, Debug)]
pub struct SceneTransition {
    effect: TransitionEffect,
    from_scene: String,
    to_scene: String,
    elapsed: f32,
    /// 0.0 at the start, 1.0 when complete
    progress: f32,
}

impl SceneTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, effect: TransitionEffect) -> Self {
        let progress = if effect.duration().is_zero() { 1.0 } else { 0.0 };
        Self {
            effect,
            from_scene: from.into(),
            to_scene: to.into(),
            elapsed: 0.0,
            progress,
        }
    }

    /// Advance by `dt` seconds
    ///
    /// Returns true when the transition is complete.
    pub fn advance(&mut self, dt: f32) -> bool {
        let duration = self.effect.duration().as_secs_f32();
        if duration <= 0.0 {
            self.progress = 1.0;
            return true;
        }

        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.progress = (self.elapsed / duration).min(1.0);
        self.is_complete()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn to_scene(&self) -> &str {
        &self.to_scene
    }

    pub fn from_scene(&self) -> &str {
        &self.from_scene
    }

    pub fn effect(&self) -> &TransitionEffect {
        &self.effect
    }

    /// Alpha for the incoming scene
    ///
    /// For Fade this is 0.0 during the first half and rises to 1.0 over the
    /// second. For Crossfade it rises linearly. Instant and Slide are always
    /// fully opaque.
    pub fn incoming_alpha(&self) -> f32 {
        match &self.effect {
            TransitionEffect::Instant | TransitionEffect::Slide { .. } => 1.0,
            TransitionEffect::Fade { .. } => ((self.progress - 0.5) * 2.0).max(0.0),
            TransitionEffect::Crossfade { .. } => self.progress,
        }
    }

    /// Alpha for the outgoing scene
    pub fn outgoing_alpha(&self) -> f32 {
        match &self.effect {
            TransitionEffect::Instant => 0.0,
            TransitionEffect::Slide { .. } => 1.0,
            TransitionEffect::Fade { .. } => (1.0 - self.progress * 2.0).max(0.0),
            TransitionEffect::Crossfade { .. } => 1.0 - self.progress,
        }
    }

    /// World-space offsets `(outgoing, incoming)` for a slide spanning `extent` meters
    pub fn slide_offsets(&self, extent: Vec2) -> (Vec2, Vec2) {
        match &self.effect {
            TransitionEffect::Slide { direction, .. } => {
                let dir = direction.vector();
                let span = Vec2::new(dir.x * extent.x, dir.y * extent.y);
                // Incoming starts one span behind and ends in place
                (span * self.progress, span * (self.progress - 1.0))
            }
            _ => (Vec2::ZERO, Vec2::ZERO),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(secs: u64) -> TransitionEffect {
        TransitionEffect::Fade {
            duration: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_instant_transition_completes_immediately() {
        let mut transition = SceneTransition::new("a", "b", TransitionEffect::Instant);
        assert!(transition.is_complete());
        assert!(transition.advance(0.0));
        assert_eq!(transition.progress(), 1.0);
        assert_eq!(transition.incoming_alpha(), 1.0);
    }

    #[test]
    fn test_progress_follows_frame_time() {
        let mut transition = SceneTransition::new("a", "b", fade(1));
        assert_eq!(transition.progress(), 0.0);

        assert!(!transition.advance(0.25));
        assert!((transition.progress() - 0.25).abs() < 0.0001);

        assert!(transition.advance(1.0));
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut transition = SceneTransition::new("a", "b", fade(1));
        transition.advance(0.5);
        transition.advance(-0.25);
        transition.advance(f32::NAN);
        assert!((transition.progress() - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_fade_alpha_progression() {
        let mut transition = SceneTransition::new("a", "b", fade(2));

        transition.advance(0.5);
        assert!((transition.outgoing_alpha() - 0.5).abs() < 0.001);
        assert_eq!(transition.incoming_alpha(), 0.0);

        transition.advance(0.5);
        assert!(transition.outgoing_alpha().abs() < 0.001);
        assert!(transition.incoming_alpha().abs() < 0.001);

        transition.advance(0.5);
        assert!((transition.incoming_alpha() - 0.5).abs() < 0.001);

        transition.advance(0.5);
        assert!((transition.incoming_alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_crossfade_alphas_sum_to_one() {
        let mut transition = SceneTransition::new(
            "a",
            "b",
            TransitionEffect::Crossfade {
                duration: Duration::from_secs(1),
            },
        );
        transition.advance(0.3);
        let sum = transition.incoming_alpha() + transition.outgoing_alpha();
        assert!((sum - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_slide_offsets() {
        let mut transition = SceneTransition::new(
            "a",
            "b",
            TransitionEffect::Slide {
                duration: Duration::from_secs(1),
                direction: SlideDirection::Left,
            },
        );
        let extent = Vec2::new(20.0, 10.0);

        let (out, inc) = transition.slide_offsets(extent);
        assert_eq!(out, Vec2::ZERO);
        assert_eq!(inc, Vec2::new(20.0, 0.0));

        transition.advance(1.0);
        let (out, inc) = transition.slide_offsets(extent);
        assert_eq!(out, Vec2::new(-20.0, 0.0));
        assert_eq!(inc, Vec2::ZERO);
    }

    #[test]
    fn test_non_slide_has_no_offset() {
        let transition = SceneTransition::new("a", "b", fade(1));
        assert_eq!(
            transition.slide_offsets(Vec2::new(5.0, 5.0)),
            (Vec2::ZERO, Vec2::ZERO)
        );
    }

    #[test]
    fn test_transition_scene_accessors() {
        let transition = SceneTransition::new("from_scene", "to_scene", TransitionEffect::Instant);
        assert_eq!(transition.from_scene(), "from_scene");
        assert_eq!(transition.to_scene(), "to_scene");
        assert_eq!(transition.effect(), &TransitionEffect::Instant);
    }

    #[test]
    fn test_transition_effect_duration() {
        assert_eq!(TransitionEffect::Instant.duration(), Duration::ZERO);
        assert_eq!(fade(2).duration(), Duration::from_secs(2));
        assert_eq!(
            TransitionEffect::Slide {
                duration: Duration::from_millis(500),
                direction: SlideDirection::Up,
            }
            .duration(),
            Duration::from_millis(500)
        );
    }
}
