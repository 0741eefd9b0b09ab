//! Animated scroll transitions

use std::time::{Duration, Instant};

/// An in-flight smooth scroll from one offset to another.
///
/// A newer request replaces the animation outright; nothing is cancelled
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    from: f64,
    to: f64,
    started_at: Instant,
    duration: Duration,
}

impl SmoothScroll {
    pub fn new(from: f64, to: f64, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Progress in `0.0..=1.0` at `now`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Offset at `now`, eased out cubically
    pub fn offset_at(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}
