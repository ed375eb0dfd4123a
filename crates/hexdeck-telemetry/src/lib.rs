//! # Hexdeck Telemetry
//!
//! Duplex link to the robot controller: newline-delimited JSON frames
//! over TCP, a supervisor task that reconnects with capped linear
//! backoff, and sequential hardware test routines. Outbound commands are
//! best effort: when the link is down they are dropped, never queued.

pub mod channel;
pub mod frames;
pub mod transport;

pub use channel::{
    reconnect_delay, spawn_channel, ChannelConfig, ChannelHandle, CommandSender, ResyncHandler,
};
pub use frames::{Command, InboundFrame, TelemetryFrame, TestResultFrame};
pub use servo_test::ServoTestSequencer;
pub use transport::{TcpTransport, TelemetryConnection, TelemetryTransport};
