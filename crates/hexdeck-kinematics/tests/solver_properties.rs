//! Property tests for the pose kinematic solver.

use hexdeck_core::{BodyPose, JointOverride, LegId};
use hexdeck_kinematics::{solve, GeometryModel, SolveContext};
use proptest::prelude::*;

fn arb_pose() -> impl Strategy<Value = BodyPose> {
    (
        -200.0..400.0f64,  // height, beyond both reference extremes
        -90.0..90.0f64,    // roll
        -90.0..90.0f64,    // pitch
        -180.0..180.0f64,  // yaw
        -100.0..300.0f64,  // leg_spread, including nonsense values
    )
        .prop_map(|(height, roll, pitch, yaw, leg_spread)| BodyPose {
            height,
            roll,
            pitch,
            yaw,
            leg_spread,
        })
}

proptest! {
    #[test]
    fn all_angles_finite(pose in arb_pose(), leg_idx in 0usize..6, phase in 0.0..100.0f64) {
        let geo = GeometryModel::default();
        let leg = LegId::from_index(leg_idx).unwrap();
        let ctx = SolveContext { phase_secs: phase, ..Default::default() };
        let angles = solve(&pose, &geo, leg, &ctx);
        prop_assert!(angles.is_finite());
    }

    #[test]
    fn coxa_deviates_from_attach_heading_only_by_yaw_and_spread(
        pose in arb_pose(),
        leg_idx in 0usize..6,
    ) {
        let geo = GeometryModel::default();
        let leg = LegId::from_index(leg_idx).unwrap();
        let ctx = SolveContext { telemetry_active: true, ..Default::default() };
        let angles = solve(&pose, &geo, leg, &ctx);
        let attach = geo.attach_for(leg).angle_deg;
        // spread_adjust is bounded by the clamped spread ratio.
        let deviation = angles.coxa - (90.0 + attach - pose.yaw);
        prop_assert!(deviation >= -15.0 * 0.75 - 1e-9);
        prop_assert!(deviation <= 15.0 * 1.0 + 1e-9);
    }

    #[test]
    fn femur_tibia_within_crouch_stand_envelope(
        pose in arb_pose(),
        leg_idx in 0usize..6,
        phase in 0.0..100.0f64,
    ) {
        let geo = GeometryModel::default();
        let leg = LegId::from_index(leg_idx).unwrap();
        let ctx = SolveContext { phase_secs: phase, ..Default::default() };
        let angles = solve(&pose, &geo, leg, &ctx);
        // Stand baseline at max spread ratio, plus idle amplitude margin.
        prop_assert!(angles.femur >= -55.0 * 2.0 - 2.0);
        prop_assert!(angles.femur <= -35.0 * 0.25 + 2.0);
        prop_assert!(angles.tibia >= -55.0 - 3.0);
        prop_assert!(angles.tibia <= -15.0 + 3.0);
    }

    #[test]
    fn override_precedence_holds_everywhere(
        pose in arb_pose(),
        leg_idx in 0usize..6,
        target in -180.0..180.0f64,
        phase in 0.0..100.0f64,
        swing in any::<bool>(),
    ) {
        let geo = GeometryModel::default();
        let leg = LegId::from_index(leg_idx).unwrap();
        let ctx = SolveContext {
            override_: JointOverride::single("femur", target),
            swing,
            phase_secs: phase,
            ..Default::default()
        };
        let angles = solve(&pose, &geo, leg, &ctx);
        prop_assert_eq!(angles.femur, target);
    }

    #[test]
    fn identical_inputs_identical_outputs(pose in arb_pose(), phase in 0.0..100.0f64) {
        let geo = GeometryModel::default();
        let ctx = SolveContext { phase_secs: phase, ..Default::default() };
        let a = solve(&pose, &geo, LegId::RearLeft, &ctx);
        let b = solve(&pose, &geo, LegId::RearLeft, &ctx);
        prop_assert_eq!(a, b);
    }
}
