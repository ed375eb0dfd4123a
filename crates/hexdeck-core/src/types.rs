//! Shared data model for the pose engine and state synchronization layer.
//!
//! Angles are degrees throughout; heights and spread are robot units.
//! Callers convert to radians at the rendering boundary.

use serde::{Deserialize, Serialize};

/// Number of legs on the robot. Indices 0..5 map to fixed leg names.
pub const LEG_COUNT: usize = 6;

/// Identifies one leg by its mounting position.
///
/// The index order is fixed wire-format contract: telemetry `angles` and
/// `ground_contacts` arrays are indexed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegId {
    /// Front right
    FrontRight,
    /// Middle right
    MiddleRight,
    /// Rear right
    RearRight,
    /// Rear left
    RearLeft,
    /// Middle left
    MiddleLeft,
    /// Front left
    FrontLeft,
}

impl LegId {
    /// All legs in wire-index order.
    pub const ALL: [LegId; LEG_COUNT] = [
        LegId::FrontRight,
        LegId::MiddleRight,
        LegId::RearRight,
        LegId::RearLeft,
        LegId::MiddleLeft,
        LegId::FrontLeft,
    ];

    /// Wire index of this leg (0..5).
    pub fn index(self) -> usize {
        match self {
            LegId::FrontRight => 0,
            LegId::MiddleRight => 1,
            LegId::RearRight => 2,
            LegId::RearLeft => 3,
            LegId::MiddleLeft => 4,
            LegId::FrontLeft => 5,
        }
    }

    /// Leg for a wire index, if in range.
    pub fn from_index(index: usize) -> Option<LegId> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for LegId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrontRight => write!(f, "FR"),
            Self::MiddleRight => write!(f, "MR"),
            Self::RearRight => write!(f, "RR"),
            Self::RearLeft => write!(f, "RL"),
            Self::MiddleLeft => write!(f, "ML"),
            Self::FrontLeft => write!(f, "FL"),
        }
    }
}

/// Abstract body pose: the single value the pose sources compete over.
///
/// Exactly one source writes this per render tick (telemetry, user edit,
/// pose transition, or simulation) — the reconciler enforces the order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    /// Body height above ground, robot units.
    pub height: f64,
    /// Roll about the forward axis, degrees.
    pub roll: f64,
    /// Pitch about the lateral axis, degrees.
    pub pitch: f64,
    /// Yaw about the vertical axis, degrees.
    pub yaw: f64,
    /// Leg spread as a percentage; 100 is the neutral stance.
    pub leg_spread: f64,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            height: 100.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            leg_spread: 100.0,
        }
    }
}

impl BodyPose {
    /// Linear interpolation between two poses.
    pub fn lerp(&self, target: &BodyPose, t: f64) -> BodyPose {
        let t = t.clamp(0.0, 1.0);
        BodyPose {
            height: self.height + (target.height - self.height) * t,
            roll: self.roll + (target.roll - self.roll) * t,
            pitch: self.pitch + (target.pitch - self.pitch) * t,
            yaw: self.yaw + (target.yaw - self.yaw) * t,
            leg_spread: self.leg_spread + (target.leg_spread - self.leg_spread) * t,
        }
    }
}

/// Joint angles for one leg, proximal to distal, in degrees.
///
/// Output-only: recomputed every tick, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub coxa: f64,
    pub femur: f64,
    pub tibia: f64,
}

impl JointAngles {
    pub fn new(coxa: f64, femur: f64, tibia: f64) -> Self {
        Self { coxa, femur, tibia }
    }

    /// True when every angle is a finite number.
    pub fn is_finite(&self) -> bool {
        self.coxa.is_finite() && self.femur.is_finite() && self.tibia.is_finite()
    }
}

/// Partial per-leg override masking the solver's computed angles.
///
/// Lives only for the duration of a servo test routine; the sequencer
/// clears it on completion or error. Never persisted, never affects
/// other legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointOverride {
    pub coxa: Option<f64>,
    pub femur: Option<f64>,
    pub tibia: Option<f64>,
}

impl JointOverride {
    /// Override for a single named joint.
    pub fn single(joint: &str, angle: f64) -> Option<JointOverride> {
        let mut ov = JointOverride::default();
        match joint {
            "coxa" => ov.coxa = Some(angle),
            "femur" => ov.femur = Some(angle),
            "tibia" => ov.tibia = Some(angle),
            _ => return None,
        }
        Some(ov)
    }

    /// Apply this override on top of computed angles.
    pub fn apply(&self, computed: JointAngles) -> JointAngles {
        JointAngles {
            coxa: self.coxa.unwrap_or(computed.coxa),
            femur: self.femur.unwrap_or(computed.femur),
            tibia: self.tibia.unwrap_or(computed.tibia),
        }
    }
}

/// Per-leg ground contact flags in wire-index order.
pub type FootContacts = [bool; LEG_COUNT];

/// Connection state of the telemetry channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No connection and none in progress.
    #[default]
    Disconnected,
    /// Initial connection attempt in flight.
    Connecting,
    /// Duplex link established.
    Connected,
    /// Automatic reconnect scheduled or in flight; payload is the attempt
    /// number (1-based).
    Reconnecting(u32),
    /// Automatic reconnects exhausted; an explicit user action is required
    /// to try again.
    ReconnectExhausted,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Reconnecting(attempt) => write!(f, "Reconnecting (attempt {})", attempt),
            Self::ReconnectExhausted => write!(f, "Reconnect required"),
        }
    }
}

/// Non-pose scalars reported by telemetry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotStatus {
    pub battery_v: Option<f64>,
    pub temperature_c: Option<f64>,
    pub speed: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_index_roundtrip() {
        for leg in LegId::ALL {
            assert_eq!(LegId::from_index(leg.index()), Some(leg));
        }
        assert_eq!(LegId::from_index(6), None);
    }

    #[test]
    fn leg_names_match_wire_order() {
        let names: Vec<String> = LegId::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, vec!["FR", "MR", "RR", "RL", "ML", "FL"]);
    }

    #[test]
    fn override_masks_only_present_fields() {
        let computed = JointAngles::new(10.0, 20.0, 30.0);
        let ov = JointOverride {
            femur: Some(-5.0),
            ..Default::default()
        };
        let out = ov.apply(computed);
        assert_eq!(out.coxa, 10.0);
        assert_eq!(out.femur, -5.0);
        assert_eq!(out.tibia, 30.0);
    }

    #[test]
    fn pose_lerp_endpoints() {
        let a = BodyPose::default();
        let b = BodyPose {
            height: 130.0,
            roll: 10.0,
            pitch: -5.0,
            yaw: 45.0,
            leg_spread: 120.0,
        };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.height - 115.0).abs() < 1e-9);
    }
}
