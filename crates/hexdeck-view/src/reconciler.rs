//! Per-tick view model reconciliation.
//!
//! Exactly one source owns the rendered pose each tick, in fixed
//! priority order: a user edit, fresh telemetry, the offline gait
//! simulation, then the idle animation. The tick only reads shared state
//! (the one exception is an in-flight pose transition, which is a user
//! action and writes the pose as one).

use crate::simulation::GaitSimulator;
use crate::transition::PoseTransition;
use glam::DVec3;
use hexdeck_core::{
    AppState, BodyPose, ConnectionState, FootContacts, JointAngles, LEG_COUNT,
};
use hexdeck_kinematics::{rotate_attach_point, solve, GeometryModel, SolveContext};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Telemetry older than this no longer drives the pose.
pub const TELEMETRY_MAX_AGE: Duration = Duration::from_secs(1);

/// Which source owned the pose this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseSource {
    User,
    Telemetry,
    Simulation,
    Idle,
}

/// Read-only snapshot the renderer consumes.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub pose: BodyPose,
    pub joints: [JointAngles; LEG_COUNT],
    pub contacts: FootContacts,
    /// World-space leg mount positions under the rendered pose.
    pub leg_mounts: [DVec3; LEG_COUNT],
    pub connection: ConnectionState,
    pub source: PoseSource,
}

/// Builds one [`RenderView`] per render tick.
pub struct ViewModelReconciler {
    state: Arc<AppState>,
    geometry: GeometryModel,
    simulator: Option<GaitSimulator>,
    /// Single transition slot; starting a new one replaces it.
    transition: Option<PoseTransition>,
    /// Zero point for the idle animation phase.
    epoch: Instant,
}

impl ViewModelReconciler {
    pub fn new(state: Arc<AppState>, geometry: GeometryModel, now: Instant) -> Self {
        Self {
            state,
            geometry,
            simulator: None,
            transition: None,
            epoch: now,
        }
    }

    pub fn geometry(&self) -> &GeometryModel {
        &self.geometry
    }

    /// Swap in a freshly resolved geometry (profile switch, config edit).
    pub fn set_geometry(&mut self, geometry: GeometryModel) {
        self.geometry = geometry;
    }

    /// Start previewing a gait offline.
    pub fn start_simulation(&mut self, simulator: GaitSimulator) {
        self.simulator = Some(simulator);
    }

    pub fn stop_simulation(&mut self) {
        self.simulator = None;
    }

    /// Animate from the current pose to `target`. Cancels any transition
    /// already in flight.
    pub fn begin_transition(&mut self, target: BodyPose, duration: Duration, now: Instant) {
        if self.transition.is_some() {
            tracing::debug!("replacing in-flight pose transition");
        }
        self.transition = Some(PoseTransition::new(
            self.state.pose(),
            target,
            now,
            duration,
        ));
    }

    pub fn transition_active(&self) -> bool {
        self.transition.is_some()
    }

    /// Produce the view model for this tick.
    pub fn tick(&mut self, now: Instant) -> RenderView {
        // A transition is a user action: it owns the pose while running.
        if let Some(transition) = &self.transition {
            self.state.set_user_pose(transition.sample(now));
            if transition.finished(now) {
                self.transition = None;
            }
        }

        let source = if self.state.user_pose_active() {
            PoseSource::User
        } else if self.state.telemetry_fresh(now, TELEMETRY_MAX_AGE) {
            PoseSource::Telemetry
        } else if self.simulator.is_some() {
            PoseSource::Simulation
        } else {
            PoseSource::Idle
        };

        let mut pose = self.state.pose();
        let (swing, contacts) = match source {
            PoseSource::Telemetry => {
                let contacts = self.state.contacts();
                (contacts.map(|c| !c), contacts)
            }
            // Simulator output is draw-only; nothing is written back.
            PoseSource::Simulation => match &self.simulator {
                Some(sim) => {
                    pose.height += sim.bob_offset(now);
                    (sim.swing_flags(now), sim.contacts(now))
                }
                None => ([false; LEG_COUNT], self.state.contacts()),
            },
            PoseSource::User | PoseSource::Idle => ([false; LEG_COUNT], self.state.contacts()),
        };

        let telemetry_active = source == PoseSource::Telemetry;
        let joints = if telemetry_active && self.state.has_measured_joints() {
            let mut measured = self.state.joints();
            for (leg, angles) in measured.iter_mut().enumerate() {
                if let Some(ov) = self.state.override_for(leg) {
                    *angles = ov.apply(*angles);
                }
            }
            measured
        } else {
            let phase_secs = now.saturating_duration_since(self.epoch).as_secs_f64();
            std::array::from_fn(|leg| {
                let id = hexdeck_core::LegId::ALL[leg];
                let ctx = SolveContext {
                    override_: self.state.override_for(leg),
                    telemetry_active,
                    swing: swing[leg],
                    phase_secs,
                };
                solve(&pose, &self.geometry, id, &ctx)
            })
        };

        let leg_mounts =
            std::array::from_fn(|leg| rotate_attach_point(&pose, &self.geometry.attach[leg]));

        RenderView {
            pose,
            joints,
            contacts,
            leg_mounts,
            connection: self.state.connection(),
            source,
        }
    }
}
