//! # Hexdeck Core
//!
//! Core types, error taxonomy, and shared application state for the
//! hexapod control deck. Everything here is renderer-agnostic: the
//! renderer, templating, and widget layers consume these types without
//! mutating them.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod state;
pub mod types;

pub use config::ConfigEntry;
pub use diagnostics::{DiagnosticsLog, TestReport, TestStatus};
pub use error::ChannelError;
pub use state::AppState;
pub use types::{
    BodyPose, ConnectionState, FootContacts, JointAngles, JointOverride, LegId, RobotStatus,
    LEG_COUNT,
};
