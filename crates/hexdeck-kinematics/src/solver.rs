//! The pose kinematic solver.
//!
//! Maps a body pose plus geometry to one leg's joint angles. Pure and
//! deterministic: no I/O, no clocks — time enters only through
//! [`SolveContext::phase_secs`]. All inputs are clamped or defaulted, so
//! the solver never errors and every output is finite.
//!
//! This is a presentation model. The remote controller runs the real
//! inverse kinematics; these angles only have to look right.

use crate::geometry::GeometryModel;
use hexdeck_core::{BodyPose, JointAngles, JointOverride, LegId};

/// Reference body height for a full crouch.
pub const CROUCH_HEIGHT: f64 = 40.0;
/// Reference body height for a full stand.
pub const STAND_HEIGHT: f64 = 130.0;

/// Femur angle at crouch, degrees below horizontal (before spread scaling).
const FEMUR_CROUCH: f64 = -35.0;
/// Femur angle at stand.
const FEMUR_STAND: f64 = -55.0;
/// Tibia angle at crouch (deep knee bend).
const TIBIA_CROUCH: f64 = -55.0;
/// Tibia angle at stand (near straight).
const TIBIA_STAND: f64 = -15.0;

/// Idle breathing frequency, rad/s.
const IDLE_FREQ: f64 = 1.5;
const IDLE_FEMUR_AMPL: f64 = 1.5;
const IDLE_TIBIA_AMPL: f64 = 2.5;

/// Swing-phase lift offsets: enough to clear the foot visibly.
const SWING_FEMUR_LIFT: f64 = 12.0;
const SWING_TIBIA_LIFT: f64 = -18.0;

/// Spread ratio bounds. A spread at or below zero must not invert the
/// stance, so the ratio is clamped to a sane positive minimum.
const SPREAD_RATIO_MIN: f64 = 0.25;
const SPREAD_RATIO_MAX: f64 = 2.0;

/// Per-tick inputs beyond the pose itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveContext {
    /// Calibration highlight for this leg, if any. Applied last: an
    /// overridden joint reads exactly the override value.
    pub override_: Option<JointOverride>,
    /// True while live telemetry is the authoritative pose source; it
    /// suppresses the idle breathing animation.
    pub telemetry_active: bool,
    /// True while this leg's foot is lifted (gait swing phase).
    pub swing: bool,
    /// Animation phase in seconds, driving the idle sinusoid.
    pub phase_secs: f64,
}

/// Compute one leg's joint angles for the current pose.
pub fn solve(
    pose: &BodyPose,
    geometry: &GeometryModel,
    leg: LegId,
    ctx: &SolveContext,
) -> JointAngles {
    let attach = geometry.attach_for(leg);
    let spread_ratio = spread_ratio(pose.leg_spread);
    let spread_adjust = (spread_ratio - 1.0) * 15.0;

    // Coxa tracks the attach heading, compensating body yaw and fanning
    // outward as spread exceeds 100%.
    let coxa = 90.0 + attach.angle_deg - sane(pose.yaw) + spread_adjust;

    let ratio = height_ratio(pose.height);
    let femur_base = lerp(FEMUR_CROUCH * spread_ratio, FEMUR_STAND * spread_ratio, ratio);
    let tibia_base = lerp(TIBIA_CROUCH, TIBIA_STAND, ratio);

    let (mut femur, mut tibia) = (femur_base, tibia_base);

    if !ctx.telemetry_active {
        // Breathing while nothing live is driving the pose.
        let phase = IDLE_FREQ * ctx.phase_secs + leg.index() as f64 * 0.7;
        femur += phase.sin() * IDLE_FEMUR_AMPL;
        tibia += (phase + 0.5).sin() * IDLE_TIBIA_AMPL;
    }
    if ctx.swing {
        femur += SWING_FEMUR_LIFT;
        tibia += SWING_TIBIA_LIFT;
    }

    let computed = JointAngles::new(coxa, femur, tibia);
    match ctx.override_ {
        Some(ov) => ov.apply(computed),
        None => computed,
    }
}

/// Normalized interpolation parameter between crouch and stand heights.
pub fn height_ratio(height: f64) -> f64 {
    let h = sane(height);
    ((h - CROUCH_HEIGHT) / (STAND_HEIGHT - CROUCH_HEIGHT)).clamp(0.0, 1.0)
}

/// Leg spread percentage mapped to a clamped multiplier.
pub fn spread_ratio(leg_spread: f64) -> f64 {
    (sane(leg_spread) / 100.0).clamp(SPREAD_RATIO_MIN, SPREAD_RATIO_MAX)
}

/// NaN and infinity guard; the solver treats junk input as zero.
fn sane(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryModel;

    fn ctx() -> SolveContext {
        SolveContext {
            telemetry_active: true, // no idle wobble; deterministic baselines
            ..Default::default()
        }
    }

    #[test]
    fn solver_is_pure() {
        let pose = BodyPose {
            height: 92.0,
            yaw: 17.0,
            leg_spread: 110.0,
            ..Default::default()
        };
        let geo = GeometryModel::default();
        let c = SolveContext {
            phase_secs: 3.25,
            telemetry_active: false,
            ..Default::default()
        };
        let a = solve(&pose, &geo, LegId::MiddleLeft, &c);
        let b = solve(&pose, &geo, LegId::MiddleLeft, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn height_ratio_clamps() {
        assert_eq!(height_ratio(CROUCH_HEIGHT - 50.0), 0.0);
        assert_eq!(height_ratio(STAND_HEIGHT + 50.0), 1.0);
        assert!((height_ratio(85.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn femur_tibia_stay_within_envelope() {
        let geo = GeometryModel::default();
        for height in [0.0, 40.0, 85.0, 130.0, 400.0] {
            let pose = BodyPose {
                height,
                leg_spread: 100.0,
                ..Default::default()
            };
            let angles = solve(&pose, &geo, LegId::FrontRight, &ctx());
            assert!(angles.femur <= FEMUR_CROUCH + 1e-9 && angles.femur >= FEMUR_STAND - 1e-9);
            assert!(angles.tibia >= TIBIA_CROUCH - 1e-9 && angles.tibia <= TIBIA_STAND + 1e-9);
        }
    }

    #[test]
    fn coxa_tracks_attach_and_yaw() {
        let geo = GeometryModel::default();
        let pose = BodyPose {
            yaw: 30.0,
            leg_spread: 100.0,
            ..Default::default()
        };
        let angles = solve(&pose, &geo, LegId::FrontLeft, &ctx());
        // 90 + 45 (FL mount) - 30 (yaw) + 0 (neutral spread)
        assert!((angles.coxa - 105.0).abs() < 1e-9);
    }

    #[test]
    fn nonpositive_spread_does_not_invert_stance() {
        let geo = GeometryModel::default();
        for spread in [0.0, -50.0, -10_000.0] {
            let pose = BodyPose {
                leg_spread: spread,
                height: 100.0,
                ..Default::default()
            };
            let angles = solve(&pose, &geo, LegId::RearRight, &ctx());
            assert!(angles.is_finite());
            // Clamped ratio keeps the femur below horizontal.
            assert!(angles.femur < 0.0);
        }
    }

    #[test]
    fn override_wins_regardless_of_height() {
        let geo = GeometryModel::default();
        for height in [20.0, 85.0, 160.0] {
            let pose = BodyPose {
                height,
                ..Default::default()
            };
            let c = SolveContext {
                override_: JointOverride::single("femur", 33.0),
                telemetry_active: false,
                phase_secs: 1.2,
                swing: true,
                ..Default::default()
            };
            let angles = solve(&pose, &geo, LegId::MiddleRight, &c);
            assert_eq!(angles.femur, 33.0);
        }
    }

    #[test]
    fn swing_lifts_the_foot() {
        let geo = GeometryModel::default();
        let pose = BodyPose::default();
        let planted = solve(&pose, &geo, LegId::FrontRight, &ctx());
        let swinging = solve(
            &pose,
            &geo,
            LegId::FrontRight,
            &SolveContext {
                swing: true,
                telemetry_active: true,
                ..Default::default()
            },
        );
        assert!(swinging.femur > planted.femur);
        assert!(swinging.tibia < planted.tibia);
    }

    #[test]
    fn idle_breathing_only_without_telemetry() {
        let geo = GeometryModel::default();
        let pose = BodyPose::default();
        let live = solve(&pose, &geo, LegId::FrontRight, &ctx());
        let idle_a = solve(
            &pose,
            &geo,
            LegId::FrontRight,
            &SolveContext {
                phase_secs: 0.4,
                ..Default::default()
            },
        );
        let idle_b = solve(
            &pose,
            &geo,
            LegId::FrontRight,
            &SolveContext {
                phase_secs: 1.6,
                ..Default::default()
            },
        );
        assert_eq!(live.coxa, idle_a.coxa); // idle never touches the coxa
        assert_ne!(idle_a.femur, idle_b.femur);
    }
}
