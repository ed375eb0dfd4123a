//! Channel supervisor.
//!
//! One task owns the whole connection lifecycle: connect, pump frames,
//! reconnect with capped linear backoff, park in `ReconnectExhausted`
//! until a manual reconnect is requested. A single task means a single
//! reconnect slot; duplicate reconnect loops are impossible by
//! construction.

use crate::frames::{Command, InboundFrame, TelemetryFrame, TestResultFrame};
use crate::transport::{TelemetryConnection, TelemetryTransport};
use async_trait::async_trait;
use hexdeck_core::{
    AppState, ChannelError, ConnectionState, JointAngles, TestReport, TestStatus, LEG_COUNT,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

/// Channel tuning knobs.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Controller address, `host:port`.
    pub address: String,
    /// Backoff step: delay before attempt `n` is `base_delay * n`.
    pub base_delay: Duration,
    /// Backoff ceiling.
    pub cap_delay: Duration,
    /// Automatic attempts before parking for a manual reconnect.
    pub max_attempts: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            address: "192.168.4.1:8765".to_string(),
            base_delay: Duration::from_millis(500),
            cap_delay: Duration::from_secs(5),
            max_attempts: 10,
        }
    }
}

/// Delay before reconnect attempt `attempt` (1-based), or `None` once
/// automatic attempts are exhausted.
///
/// The schedule is `min(base_delay * attempt, cap_delay)`: the first
/// retry after a drop waits one base delay, not two. With the defaults
/// that is 500ms, 1s, ... capped at 5s from attempt 10 onward.
pub fn reconnect_delay(attempt: u32, config: &ChannelConfig) -> Option<Duration> {
    if attempt == 0 || attempt > config.max_attempts {
        return None;
    }
    Some((config.base_delay * attempt).min(config.cap_delay))
}

/// Called once per successful connection, before any frame is pumped.
/// Implementations refresh config, profiles, gaits, and poses from the
/// remote authority.
#[async_trait]
pub trait ResyncHandler: Send + Sync {
    async fn resync(&self);
}

/// Cloneable outbound half of the channel.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
    state: Arc<AppState>,
    max_attempts: u32,
}

impl CommandSender {
    /// Queue a command for the controller. When the link is not up the
    /// command is dropped, never queued; the error says why. Callers
    /// that treat commands as fire-and-forget can ignore the result.
    pub fn send(&self, command: Command) -> Result<(), ChannelError> {
        match self.state.connection() {
            ConnectionState::Connected => {}
            ConnectionState::ReconnectExhausted => {
                tracing::debug!(kind = command.kind(), "link parked, dropping command");
                return Err(ChannelError::ReconnectExhausted {
                    attempts: self.max_attempts,
                });
            }
            _ => {
                tracing::debug!(kind = command.kind(), "link down, dropping command");
                return Err(ChannelError::NotConnected);
            }
        }
        if self.tx.send(command).is_err() {
            tracing::debug!("channel task gone, dropping command");
            return Err(ChannelError::NotConnected);
        }
        Ok(())
    }
}

/// Handle to the running channel task.
pub struct ChannelHandle {
    sender: CommandSender,
    reconnect: Arc<Notify>,
    task: JoinHandle<()>,
    state: Arc<AppState>,
}

impl ChannelHandle {
    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    pub fn send(&self, command: Command) -> Result<(), ChannelError> {
        self.sender.send(command)
    }

    /// Restart the connect loop immediately. The only way out of
    /// `ReconnectExhausted`; also shortcuts a pending backoff sleep.
    pub fn request_reconnect(&self) {
        self.reconnect.notify_one();
    }

    /// Stop the channel task and mark the link down.
    pub fn shutdown(self) {
        self.task.abort();
        self.state.set_connection(ConnectionState::Disconnected);
    }
}

/// Spawn the supervisor task.
pub fn spawn_channel(
    transport: Arc<dyn TelemetryTransport>,
    state: Arc<AppState>,
    resync: Option<Arc<dyn ResyncHandler>>,
    config: ChannelConfig,
) -> ChannelHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let reconnect = Arc::new(Notify::new());
    let sender = CommandSender {
        tx,
        state: state.clone(),
        max_attempts: config.max_attempts,
    };

    let task = tokio::spawn(supervise(
        transport,
        state.clone(),
        resync,
        config,
        rx,
        reconnect.clone(),
    ));

    ChannelHandle {
        sender,
        reconnect,
        task,
        state,
    }
}

async fn supervise(
    transport: Arc<dyn TelemetryTransport>,
    state: Arc<AppState>,
    resync: Option<Arc<dyn ResyncHandler>>,
    config: ChannelConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    reconnect: Arc<Notify>,
) {
    // Consecutive failed attempts since the last successful session.
    let mut attempt: u32 = 0;

    loop {
        state.set_connection(if attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting(attempt)
        });

        match transport.connect(&config.address).await {
            Ok(mut conn) => {
                attempt = 0;
                state.set_connection(ConnectionState::Connected);
                tracing::info!(address = %config.address, "controller link up");
                if let Some(handler) = &resync {
                    handler.resync().await;
                }
                let reason = run_session(conn.as_mut(), &state, &mut commands).await;
                tracing::warn!(%reason, "controller link lost");
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, "connect attempt failed");
            }
        }

        attempt += 1;
        match reconnect_delay(attempt, &config) {
            Some(delay) => {
                state.set_connection(ConnectionState::Reconnecting(attempt));
                tracing::info!(attempt, ?delay, "reconnect scheduled");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = reconnect.notified() => {
                        attempt = 0;
                    }
                }
            }
            None => {
                state.set_connection(ConnectionState::ReconnectExhausted);
                tracing::warn!(
                    attempts = config.max_attempts,
                    "automatic reconnect exhausted, waiting for manual reconnect"
                );
                reconnect.notified().await;
                attempt = 0;
            }
        }
    }
}

/// Pump one session until the link drops. Returns the close reason.
async fn run_session(
    conn: &mut dyn TelemetryConnection,
    state: &AppState,
    commands: &mut mpsc::UnboundedReceiver<Command>,
) -> String {
    loop {
        tokio::select! {
            frame = conn.recv() => match frame {
                Ok(InboundFrame::Telemetry(telemetry)) => {
                    apply_telemetry(state, &telemetry);
                }
                Ok(InboundFrame::TestResult(result)) => {
                    record_test_result(state, &result);
                }
                Err(ChannelError::MalformedFrame { reason }) => {
                    tracing::warn!(%reason, "dropping malformed frame");
                }
                Err(e) => return e.to_string(),
            },
            Some(command) = commands.recv() => {
                tracing::debug!(kind = command.kind(), "sending command");
                if let Err(e) = conn.send(&command).await {
                    return e.to_string();
                }
            }
        }
    }
}

/// Apply a (partial) telemetry frame to shared state. Pose fields are
/// skipped while a user edit owns the pose; status, joints, and contacts
/// always land.
fn apply_telemetry(state: &AppState, frame: &TelemetryFrame) {
    let mut status = state.status();
    if frame.battery_v.is_some() {
        status.battery_v = frame.battery_v;
    }
    if frame.temperature_c.is_some() {
        status.temperature_c = frame.temperature_c;
    }
    if frame.speed.is_some() {
        status.speed = frame.speed;
    }
    state.set_status(status);

    if !state.user_pose_active() {
        let mut pose = state.pose();
        if let Some(v) = frame.body_height {
            pose.height = v;
        }
        if let Some(v) = frame.body_roll {
            pose.roll = v;
        }
        if let Some(v) = frame.body_pitch {
            pose.pitch = v;
        }
        if let Some(v) = frame.body_yaw {
            pose.yaw = v;
        }
        if let Some(v) = frame.leg_spread {
            pose.leg_spread = v;
        }
        state.set_pose(pose);
    }

    if let Some(angles) = frame.angles {
        let mut joints = [JointAngles::default(); LEG_COUNT];
        for (joint, measured) in joints.iter_mut().zip(angles.iter()) {
            *joint = JointAngles::new(measured[0], measured[1], measured[2]);
        }
        state.set_joints(joints);
    }
    if let Some(contacts) = frame.ground_contacts {
        state.set_contacts(contacts);
    }

    state.mark_telemetry(Instant::now());
}

/// Test results feed the diagnostics log only, never pose state.
fn record_test_result(state: &AppState, result: &TestResultFrame) {
    let status = match result.status.to_lowercase().as_str() {
        "passed" | "pass" | "ok" => TestStatus::Passed,
        "running" => TestStatus::Running,
        _ => TestStatus::Failed,
    };
    state
        .diagnostics
        .push(TestReport::new(&result.test, status, result.message.clone()));
}
