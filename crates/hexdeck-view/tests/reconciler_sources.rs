//! Source-priority and transition coverage for the reconciler.

use hexdeck_core::{
    AppState, BodyPose, ConnectionState, JointAngles, JointOverride, LEG_COUNT,
};
use hexdeck_kinematics::GeometryModel;
use hexdeck_view::{GaitSimulator, PoseSource, ViewModelReconciler};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn reconciler() -> (Arc<AppState>, ViewModelReconciler, Instant) {
    let state = Arc::new(AppState::new());
    let now = Instant::now();
    let reconciler = ViewModelReconciler::new(state.clone(), GeometryModel::default(), now);
    (state, reconciler, now)
}

fn fresh_telemetry(state: &AppState, now: Instant) {
    state.set_connection(ConnectionState::Connected);
    state.mark_telemetry(now);
}

#[test]
fn idle_when_nothing_is_driving() {
    let (_state, mut reconciler, now) = reconciler();
    let view = reconciler.tick(now);
    assert_eq!(view.source, PoseSource::Idle);
    assert_eq!(view.connection, ConnectionState::Disconnected);
    // Idle legs all stand on the ground.
    assert_eq!(view.contacts, [true; LEG_COUNT]);
}

#[test]
fn fresh_telemetry_beats_simulation() {
    let (state, mut reconciler, now) = reconciler();
    reconciler.start_simulation(GaitSimulator::from_gait(
        "tripod",
        &serde_json::Value::Null,
        now,
    ));
    fresh_telemetry(&state, now);

    assert_eq!(reconciler.tick(now).source, PoseSource::Telemetry);

    // Once telemetry goes stale the simulation takes over.
    let later = now + Duration::from_secs(3);
    assert_eq!(reconciler.tick(later).source, PoseSource::Simulation);
}

#[test]
fn user_edit_beats_everything_until_reset() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);
    state.set_user_pose(BodyPose {
        height: 70.0,
        ..BodyPose::default()
    });

    let view = reconciler.tick(now);
    assert_eq!(view.source, PoseSource::User);
    assert_eq!(view.pose.height, 70.0);

    state.reset_user_pose();
    assert_eq!(reconciler.tick(now).source, PoseSource::Telemetry);
}

#[test]
fn disconnection_makes_telemetry_stale_immediately() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);
    assert_eq!(reconciler.tick(now).source, PoseSource::Telemetry);

    state.set_connection(ConnectionState::Reconnecting(1));
    assert_eq!(reconciler.tick(now).source, PoseSource::Idle);
}

#[test]
fn measured_joints_win_while_telemetry_is_live() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);

    let mut measured = [JointAngles::default(); LEG_COUNT];
    measured[3] = JointAngles::new(101.0, -44.0, -33.0);
    state.set_joints(measured);

    let view = reconciler.tick(now);
    assert_eq!(view.joints[3], JointAngles::new(101.0, -44.0, -33.0));
}

#[test]
fn overrides_apply_on_top_of_measured_joints() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);
    state.set_joints([JointAngles::new(90.0, -40.0, -30.0); LEG_COUNT]);
    state.set_override(1, JointOverride::single("femur", 12.0));

    let view = reconciler.tick(now);
    assert_eq!(view.joints[1].femur, 12.0);
    assert_eq!(view.joints[1].coxa, 90.0);
    assert_eq!(view.joints[0].femur, -40.0);
}

#[test]
fn solver_runs_when_no_joints_were_measured() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);

    let view = reconciler.tick(now);
    // Solved from the default pose rather than the zeroed default array.
    assert!(view.joints.iter().all(|j| j.coxa != 0.0 || j.femur != 0.0));
    assert!(view.joints.iter().all(|j| j.is_finite()));
}

#[test]
fn simulation_lifts_swing_legs() {
    let (_state, mut reconciler, now) = reconciler();
    reconciler.start_simulation(GaitSimulator::from_gait(
        "tripod",
        &serde_json::Value::Null,
        now,
    ));

    let view = reconciler.tick(now + Duration::from_millis(100));
    assert_eq!(view.source, PoseSource::Simulation);
    let lifted = view.contacts.iter().filter(|c| !**c).count();
    assert_eq!(lifted, 3);

    // Swing legs carry the lift offset relative to their stance twins.
    let stance_leg = view.contacts.iter().position(|c| *c).unwrap_or(0);
    let swing_leg = view.contacts.iter().position(|c| !*c).unwrap_or(1);
    assert!(view.joints[swing_leg].tibia < view.joints[stance_leg].tibia);
}

#[test]
fn transition_owns_the_pose_and_completes() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);

    let target = BodyPose {
        height: 130.0,
        ..BodyPose::default()
    };
    reconciler.begin_transition(target, Duration::from_millis(400), now);

    let mid = reconciler.tick(now + Duration::from_millis(200));
    assert_eq!(mid.source, PoseSource::User);
    assert!(mid.pose.height > 100.0 && mid.pose.height < 130.0);
    assert!(reconciler.transition_active());

    let done = reconciler.tick(now + Duration::from_millis(400));
    assert_eq!(done.pose.height, 130.0);
    assert!(!reconciler.transition_active());
    // The finished transition leaves the pose user-owned.
    assert!(state.user_pose_active());
}

#[test]
fn retargeting_replaces_the_transition_in_flight() {
    let (_state, mut reconciler, now) = reconciler();

    reconciler.begin_transition(
        BodyPose {
            height: 130.0,
            ..BodyPose::default()
        },
        Duration::from_secs(1),
        now,
    );
    reconciler.tick(now + Duration::from_millis(300));

    // Retarget halfway: the old trajectory is abandoned.
    reconciler.begin_transition(
        BodyPose {
            height: 50.0,
            ..BodyPose::default()
        },
        Duration::from_millis(200),
        now + Duration::from_millis(300),
    );

    let done = reconciler.tick(now + Duration::from_millis(500));
    assert_eq!(done.pose.height, 50.0);
    assert!(!reconciler.transition_active());
}

#[test]
fn stale_telemetry_with_no_simulator_falls_back_to_idle() {
    let (state, mut reconciler, now) = reconciler();
    fresh_telemetry(&state, now);
    assert_eq!(reconciler.tick(now).source, PoseSource::Telemetry);

    let later = now + Duration::from_secs(5);
    assert_eq!(reconciler.tick(later).source, PoseSource::Idle);
}
