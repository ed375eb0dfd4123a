//! Error handling for Hexdeck.
//!
//! Taxonomy:
//! - [`ChannelError`]: telemetry link failures. `ConnectionLost` is not a
//!   user-facing fault — it feeds the reconnection state machine.
//! - Registry and settings crates carry their own typed errors; remote
//!   I/O failures there degrade to cached or default data and are logged,
//!   never raised to callers.
//!
//! Nothing in this core is fatal to the process. The worst outcome is
//! operating on stale data with a visible disconnected indicator.

use thiserror::Error;

/// Telemetry channel error type.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The channel is not connected; the command was dropped.
    #[error("Channel not connected")]
    NotConnected,

    /// The remote controller closed or the link failed mid-session.
    /// Triggers the reconnection state machine.
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// Why the link went down.
        reason: String,
    },

    /// The connect attempt itself failed.
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed {
        /// Remote controller address.
        address: String,
        /// Why the attempt failed.
        reason: String,
    },

    /// Automatic reconnects are exhausted; a manual reconnect is required.
    #[error("Automatic reconnect exhausted after {attempts} attempts")]
    ReconnectExhausted {
        /// How many attempts were made.
        attempts: u32,
    },

    /// An inbound frame could not be decoded.
    #[error("Malformed frame: {reason}")]
    MalformedFrame {
        /// Decoder failure detail.
        reason: String,
    },

    /// A hardware test routine is already running for this target.
    #[error("Test routine already running: {target}")]
    TestBusy {
        /// The busy joint or leg.
        target: String,
    },
}
