//! # Hexdeck
//!
//! Interactive control deck for six-legged walking robots: a kinematic
//! pose engine, multi-source state synchronization, and a reconnecting
//! link to the remote controller.
//!
//! ## Architecture
//!
//! Hexdeck is organized as a workspace with multiple crates:
//!
//! 1. **hexdeck-core** - Shared types, error taxonomy, application state
//! 2. **hexdeck-kinematics** - Geometry model and the pose kinematic solver
//! 3. **hexdeck-settings** - Two-tier config persistence (cache + remote)
//! 4. **hexdeck-registry** - Profile, gait, and pose-preset registries
//! 5. **hexdeck-telemetry** - Reconnecting controller link and test routines
//! 6. **hexdeck-view** - Per-tick view model reconciliation
//! 7. **hexdeck** - Main binary that wires it all together

pub use hexdeck_core::{
    AppState, BodyPose, ChannelError, ConfigEntry, ConnectionState, DiagnosticsLog, FootContacts,
    JointAngles, JointOverride, LegId, RobotStatus, TestReport, TestStatus, LEG_COUNT,
};

pub use hexdeck_kinematics::{
    body_rotation, rotate_attach_point, solve, AttachPoint, GeometryModel, SolveContext,
};

pub use hexdeck_settings::{
    merge_entries, AppSettings, CacheStore, ConfigSyncStore, FileCache, MemoryCache,
    OfflineRemote, RemoteConfigClient, SettingsError, StoreConfig,
};

pub use hexdeck_registry::{
    GaitDefinition, GaitRegistry, PosePreset, PoseRegistry, Profile, ProfileRegistry,
    RegistryError,
};

pub use hexdeck_telemetry::{
    spawn_channel, ChannelConfig, ChannelHandle, Command, CommandSender, ResyncHandler,
    ServoTestSequencer, TcpTransport, TelemetryTransport,
};

pub use hexdeck_view::{
    GaitSimulator, PoseSource, PoseTransition, RenderView, ViewModelReconciler, TELEMETRY_MAX_AGE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - a configurable fallback filter when RUST_LOG is unset
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
