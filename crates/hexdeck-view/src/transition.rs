//! Eased pose transitions.
//!
//! Applying a pose preset animates from the current pose to the target
//! over a fixed duration. The reconciler holds at most one transition;
//! starting a new one replaces (cancels) the one in flight.

use hexdeck_core::BodyPose;
use std::time::{Duration, Instant};

/// An in-flight animation from one pose to another.
#[derive(Debug, Clone)]
pub struct PoseTransition {
    from: BodyPose,
    to: BodyPose,
    started: Instant,
    duration: Duration,
}

impl PoseTransition {
    pub fn new(from: BodyPose, to: BodyPose, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn target(&self) -> BodyPose {
        self.to
    }

    pub fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Pose at `now`, smoothstep-eased between the endpoints.
    pub fn sample(&self, now: Instant) -> BodyPose {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64()
            / self.duration.as_secs_f64();
        let t = t.clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.from.lerp(&self.to, eased)
    }
}
