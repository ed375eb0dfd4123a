//! Wire frames for the controller protocol.
//!
//! All frames are single-line JSON objects tagged by a `type` field.
//! Inbound telemetry payloads are partial: absent fields mean "no
//! update", not "zero".

use hexdeck_core::LEG_COUNT;
use serde::{Deserialize, Serialize};

/// Frame received from the controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    Telemetry(TelemetryFrame),
    TestResult(TestResultFrame),
}

/// Periodic state report. Every field is optional; the controller sends
/// only what changed since the last report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryFrame {
    pub battery_v: Option<f64>,
    pub temperature_c: Option<f64>,
    pub body_roll: Option<f64>,
    pub body_pitch: Option<f64>,
    pub body_yaw: Option<f64>,
    pub body_height: Option<f64>,
    pub leg_spread: Option<f64>,
    pub speed: Option<f64>,
    /// Measured joint angles, `[coxa, femur, tibia]` per leg, wire order
    /// FR, MR, RR, RL, ML, FL. Replaced wholesale when present.
    pub angles: Option<[[f64; 3]; LEG_COUNT]>,
    /// Foot contact switches, same leg order. Replaced wholesale when
    /// present.
    pub ground_contacts: Option<[bool; LEG_COUNT]>,
}

/// Outcome of a hardware test routine running on the controller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestResultFrame {
    pub test: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Command sent to the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Start or steer walking.
    Walk { direction_deg: f64, speed: f64 },
    /// Set the full body pose.
    BodyPose {
        height: f64,
        roll: f64,
        pitch: f64,
        yaw: f64,
        leg_spread: f64,
    },
    /// Select the active gait by name.
    SetGait { gait: String },
    /// Apply a saved pose preset by name.
    ApplyPose { name: String },
    /// Emergency stop: halt all servo motion immediately.
    Estop,
    /// Drive a single servo to an angle (test routines only).
    ServoTest {
        leg: usize,
        joint: String,
        angle_deg: f64,
    },
}

impl Command {
    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Walk { .. } => "walk",
            Self::BodyPose { .. } => "body_pose",
            Self::SetGait { .. } => "set_gait",
            Self::ApplyPose { .. } => "apply_pose",
            Self::Estop => "estop",
            Self::ServoTest { .. } => "servo_test",
        }
    }

    pub fn from_pose(pose: &hexdeck_core::BodyPose) -> Self {
        Self::BodyPose {
            height: pose.height,
            roll: pose.roll,
            pitch: pose.pitch,
            yaw: pose.yaw,
            leg_spread: pose.leg_spread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn telemetry_frame_parses_partial_payload() {
        let frame: InboundFrame = serde_json::from_value(json!({
            "type": "telemetry",
            "battery_v": 7.4,
            "body_height": 110.0
        }))
        .unwrap();
        match frame {
            InboundFrame::Telemetry(t) => {
                assert_eq!(t.battery_v, Some(7.4));
                assert_eq!(t.body_height, Some(110.0));
                assert_eq!(t.body_roll, None);
                assert!(t.angles.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn telemetry_frame_parses_full_arrays() {
        let frame: InboundFrame = serde_json::from_value(json!({
            "type": "telemetry",
            "angles": [
                [90.0, -40.0, -30.0], [90.0, -40.0, -30.0], [90.0, -40.0, -30.0],
                [90.0, -40.0, -30.0], [90.0, -40.0, -30.0], [90.0, -40.0, -30.0]
            ],
            "ground_contacts": [true, false, true, true, false, true]
        }))
        .unwrap();
        match frame {
            InboundFrame::Telemetry(t) => {
                assert_eq!(t.angles.unwrap()[0], [90.0, -40.0, -30.0]);
                assert!(!t.ground_contacts.unwrap()[1]);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_result_frame_routes_by_tag() {
        let frame: InboundFrame = serde_json::from_value(json!({
            "type": "test_result",
            "test": "servo_sweep",
            "status": "passed"
        }))
        .unwrap();
        assert!(matches!(
            frame,
            InboundFrame::TestResult(TestResultFrame { ref test, .. }) if test == "servo_sweep"
        ));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let parsed: Result<InboundFrame, _> =
            serde_json::from_value(json!({"type": "firmware_update"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn commands_serialize_with_snake_case_tags() {
        let walk = serde_json::to_value(Command::Walk {
            direction_deg: 90.0,
            speed: 0.5,
        })
        .unwrap();
        assert_eq!(walk["type"], "walk");
        assert_eq!(walk["direction_deg"], 90.0);

        let estop = serde_json::to_value(Command::Estop).unwrap();
        assert_eq!(estop["type"], "estop");
    }
}
