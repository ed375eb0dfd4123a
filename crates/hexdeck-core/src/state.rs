//! Shared application state.
//!
//! One explicit struct passed (as `Arc<AppState>`) to every component
//! constructor — no module-level singletons. Scheduling is cooperative
//! and single-writer-per-tick: telemetry, user edits, and animation never
//! write the pose in the same tick; the reconciler decides who wins.

use crate::diagnostics::DiagnosticsLog;
use crate::types::{
    BodyPose, ConnectionState, FootContacts, JointAngles, JointOverride, RobotStatus, LEG_COUNT,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Shared mutable state of the control deck.
pub struct AppState {
    pose: RwLock<BodyPose>,
    /// Measured joint angles; `None` until a frame carries them.
    joints: RwLock<Option<[JointAngles; LEG_COUNT]>>,
    contacts: RwLock<FootContacts>,
    overrides: RwLock<[Option<JointOverride>; LEG_COUNT]>,
    connection: RwLock<ConnectionState>,
    status: RwLock<RobotStatus>,
    /// Sticky flag: a user edit owns the pose until explicitly reset.
    user_pose_active: AtomicBool,
    last_telemetry: RwLock<Option<Instant>>,
    /// Hardware test results; never feeds pose state.
    pub diagnostics: DiagnosticsLog,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            pose: RwLock::new(BodyPose::default()),
            joints: RwLock::new(None),
            contacts: RwLock::new([true; LEG_COUNT]),
            overrides: RwLock::new([None; LEG_COUNT]),
            connection: RwLock::new(ConnectionState::Disconnected),
            status: RwLock::new(RobotStatus::default()),
            user_pose_active: AtomicBool::new(false),
            last_telemetry: RwLock::new(None),
            diagnostics: DiagnosticsLog::default(),
        }
    }

    pub fn pose(&self) -> BodyPose {
        *self.pose.read()
    }

    /// Write the pose from a telemetry frame or animation step. Does not
    /// claim user ownership.
    pub fn set_pose(&self, pose: BodyPose) {
        *self.pose.write() = pose;
    }

    /// Write the pose from a user edit; user edits take priority over
    /// telemetry and animation until [`AppState::reset_user_pose`].
    pub fn set_user_pose(&self, pose: BodyPose) {
        *self.pose.write() = pose;
        self.user_pose_active.store(true, Ordering::Release);
    }

    /// Release the user's claim on the pose.
    pub fn reset_user_pose(&self) {
        self.user_pose_active.store(false, Ordering::Release);
    }

    pub fn user_pose_active(&self) -> bool {
        self.user_pose_active.load(Ordering::Acquire)
    }

    pub fn joints(&self) -> [JointAngles; LEG_COUNT] {
        self.joints.read().unwrap_or_default()
    }

    /// Record measured joint angles from a telemetry frame.
    pub fn set_joints(&self, joints: [JointAngles; LEG_COUNT]) {
        *self.joints.write() = Some(joints);
    }

    /// True once at least one telemetry frame has carried joint angles.
    pub fn has_measured_joints(&self) -> bool {
        self.joints.read().is_some()
    }

    pub fn contacts(&self) -> FootContacts {
        *self.contacts.read()
    }

    pub fn set_contacts(&self, contacts: FootContacts) {
        *self.contacts.write() = contacts;
    }

    pub fn override_for(&self, leg: usize) -> Option<JointOverride> {
        self.overrides.read().get(leg).copied().flatten()
    }

    pub fn set_override(&self, leg: usize, ov: Option<JointOverride>) {
        if let Some(slot) = self.overrides.write().get_mut(leg) {
            *slot = ov;
        }
    }

    /// Clear every highlight override (end of a test routine).
    pub fn clear_overrides(&self) {
        *self.overrides.write() = [None; LEG_COUNT];
    }

    pub fn connection(&self) -> ConnectionState {
        *self.connection.read()
    }

    pub fn set_connection(&self, state: ConnectionState) {
        let mut current = self.connection.write();
        if *current != state {
            tracing::info!(from = %*current, to = %state, "connection state");
            *current = state;
        }
    }

    pub fn status(&self) -> RobotStatus {
        *self.status.read()
    }

    pub fn set_status(&self, status: RobotStatus) {
        *self.status.write() = status;
    }

    /// Record the arrival of a telemetry frame.
    pub fn mark_telemetry(&self, at: Instant) {
        *self.last_telemetry.write() = Some(at);
    }

    /// True when connected and a frame arrived within `max_age`.
    pub fn telemetry_fresh(&self, now: Instant, max_age: std::time::Duration) -> bool {
        if self.connection() != ConnectionState::Connected {
            return false;
        }
        self.last_telemetry
            .read()
            .is_some_and(|at| now.duration_since(at) <= max_age)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn user_pose_is_sticky_until_reset() {
        let state = AppState::new();
        assert!(!state.user_pose_active());

        let edited = BodyPose {
            height: 70.0,
            ..Default::default()
        };
        state.set_user_pose(edited);
        assert!(state.user_pose_active());
        assert_eq!(state.pose().height, 70.0);

        // A non-user write does not steal ownership.
        state.set_pose(BodyPose::default());
        assert!(state.user_pose_active());

        state.reset_user_pose();
        assert!(!state.user_pose_active());
    }

    #[test]
    fn telemetry_freshness_requires_connected() {
        let state = AppState::new();
        let now = Instant::now();
        state.mark_telemetry(now);
        assert!(!state.telemetry_fresh(now, Duration::from_secs(1)));

        state.set_connection(ConnectionState::Connected);
        assert!(state.telemetry_fresh(now, Duration::from_secs(1)));
        assert!(!state.telemetry_fresh(now + Duration::from_secs(2), Duration::from_secs(1)));
    }

    #[test]
    fn joints_default_until_measured() {
        let state = AppState::new();
        assert!(!state.has_measured_joints());
        assert_eq!(state.joints()[0], JointAngles::default());

        let mut joints = [JointAngles::default(); LEG_COUNT];
        joints[1] = JointAngles::new(90.0, -40.0, -20.0);
        state.set_joints(joints);
        assert!(state.has_measured_joints());
        assert_eq!(state.joints()[1].coxa, 90.0);
    }

    #[test]
    fn overrides_are_per_leg() {
        let state = AppState::new();
        state.set_override(2, JointOverride::single("femur", 42.0));
        assert!(state.override_for(0).is_none());
        assert_eq!(state.override_for(2).unwrap().femur, Some(42.0));
        state.clear_overrides();
        assert!(state.override_for(2).is_none());
    }
}
