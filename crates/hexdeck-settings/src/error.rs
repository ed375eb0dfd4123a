//! Error types for the settings crate.
//!
//! Remote failures here are transient by design: callers degrade to
//! cached or default data and keep going. Only local durability problems
//! surface to the caller.

use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The cache entry could not be read.
    #[error("Failed to load cached config: {0}")]
    CacheRead(String),

    /// The cache entry could not be written. This one matters: local
    /// durability is the only hard guarantee the store makes.
    #[error("Failed to persist config: {0}")]
    CacheWrite(String),

    /// A remote config call failed; treated as transient.
    #[error("Remote config unavailable: {0}")]
    RemoteUnavailable(String),

    /// The configuration directory could not be found or created.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// A preferences value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
