//! Offline gait simulation.
//!
//! With no live telemetry, walking is previewed locally: each gait
//! pattern assigns every leg a phase offset within a stride cycle, and a
//! leg whose cycle position passes its duty fraction is in swing. A small
//! body bob keeps the preview from looking frozen.

use hexdeck_core::{FootContacts, LEG_COUNT};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Leg sequencing scheme of a gait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitPattern {
    /// Two alternating tripods.
    Tripod,
    /// One leg at a time.
    Wave,
    /// Overlapping pairs.
    Ripple,
}

impl GaitPattern {
    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tripod" => Some(Self::Tripod),
            "wave" => Some(Self::Wave),
            "ripple" => Some(Self::Ripple),
            _ => None,
        }
    }

    /// Phase offset of each leg within the stride cycle, wire order
    /// FR, MR, RR, RL, ML, FL.
    fn offsets(self) -> [f64; LEG_COUNT] {
        match self {
            // FR+RR+ML step together, MR+RL+FL half a cycle later.
            Self::Tripod => [0.0, 0.5, 0.0, 0.5, 0.0, 0.5],
            Self::Wave => [
                0.0,
                1.0 / 6.0,
                2.0 / 6.0,
                3.0 / 6.0,
                4.0 / 6.0,
                5.0 / 6.0,
            ],
            // Opposite sides interleaved.
            Self::Ripple => [
                0.0,
                2.0 / 6.0,
                4.0 / 6.0,
                1.0 / 6.0,
                3.0 / 6.0,
                5.0 / 6.0,
            ],
        }
    }

    fn default_period(self) -> Duration {
        match self {
            Self::Tripod => Duration::from_millis(1200),
            Self::Wave => Duration::from_millis(3000),
            Self::Ripple => Duration::from_millis(1800),
        }
    }

    fn default_duty(self) -> f64 {
        match self {
            Self::Tripod => 0.5,
            // Exactly one leg in swing at a time.
            Self::Wave => 5.0 / 6.0,
            Self::Ripple => 0.66,
        }
    }
}

/// Previews one gait's leg sequencing over time.
#[derive(Debug, Clone)]
pub struct GaitSimulator {
    pattern: GaitPattern,
    period: Duration,
    /// Stance fraction of the cycle; the rest is swing.
    duty: f64,
    started: Instant,
}

impl GaitSimulator {
    /// Build a simulator from a gait's name and metadata. The metadata
    /// keys `pattern`, `period_s`, and `duty` override defaults; an
    /// unrecognized pattern falls back to matching the gait name, then
    /// to tripod.
    pub fn from_gait(name: &str, metadata: &Value, started: Instant) -> Self {
        let pattern = metadata
            .get("pattern")
            .and_then(Value::as_str)
            .and_then(GaitPattern::parse)
            .or_else(|| GaitPattern::parse(name))
            .unwrap_or(GaitPattern::Tripod);

        let period = metadata
            .get("period_s")
            .and_then(Value::as_f64)
            .filter(|p| *p > 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_else(|| pattern.default_period());

        let duty = metadata
            .get("duty")
            .and_then(Value::as_f64)
            .filter(|d| (0.1..1.0).contains(d))
            .unwrap_or_else(|| pattern.default_duty());

        Self {
            pattern,
            period,
            duty,
            started,
        }
    }

    pub fn pattern(&self) -> GaitPattern {
        self.pattern
    }

    /// Cycle position of a leg in [0, 1).
    fn cycle_pos(&self, leg: usize, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let stride = elapsed / self.period.as_secs_f64();
        (stride + self.pattern.offsets()[leg]).fract()
    }

    /// True for each leg currently in swing (foot lifted).
    pub fn swing_flags(&self, now: Instant) -> [bool; LEG_COUNT] {
        std::array::from_fn(|leg| self.cycle_pos(leg, now) >= self.duty)
    }

    /// Simulated ground contacts: stance legs touch, swing legs do not.
    pub fn contacts(&self, now: Instant) -> FootContacts {
        self.swing_flags(now).map(|swing| !swing)
    }

    /// Vertical body bob in robot units, two dips per stride.
    pub fn bob_offset(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let stride = elapsed / self.period.as_secs_f64();
        (stride * 2.0 * std::f64::consts::TAU).sin() * 1.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sim(pattern: &str) -> GaitSimulator {
        GaitSimulator::from_gait(pattern, &Value::Null, Instant::now())
    }

    #[test]
    fn tripod_alternates_two_groups() {
        let sim = sim("tripod");
        let start = sim.started;

        // First half of the cycle: group B (MR, RL, FL) is in swing.
        let early = sim.swing_flags(start + Duration::from_millis(100));
        assert_eq!(early, [false, true, false, true, false, true]);

        // Second half: group A (FR, RR, ML) swings.
        let late = sim.swing_flags(start + Duration::from_millis(700));
        assert_eq!(late, [true, false, true, false, true, false]);
    }

    #[test]
    fn wave_lifts_at_most_one_leg() {
        let sim = sim("wave");
        let start = sim.started;
        for step in 0..30 {
            let now = start + Duration::from_millis(step * 100);
            let lifted = sim.swing_flags(now).iter().filter(|s| **s).count();
            assert!(lifted <= 1, "step {step}: {lifted} legs lifted");
        }
    }

    #[test]
    fn stance_legs_touch_the_ground() {
        let sim = sim("ripple");
        let now = sim.started + Duration::from_millis(450);
        let swings = sim.swing_flags(now);
        let contacts = sim.contacts(now);
        for leg in 0..LEG_COUNT {
            assert_ne!(swings[leg], contacts[leg]);
        }
    }

    #[test]
    fn metadata_overrides_pattern_and_timing() {
        let sim = GaitSimulator::from_gait(
            "custom-crawl",
            &json!({"pattern": "wave", "period_s": 2.0, "duty": 0.75}),
            Instant::now(),
        );
        assert_eq!(sim.pattern(), GaitPattern::Wave);
        assert_eq!(sim.period, Duration::from_secs(2));
        assert_eq!(sim.duty, 0.75);
    }

    #[test]
    fn unknown_pattern_falls_back_to_tripod() {
        let sim = GaitSimulator::from_gait("moonwalk", &Value::Null, Instant::now());
        assert_eq!(sim.pattern(), GaitPattern::Tripod);
    }
}
