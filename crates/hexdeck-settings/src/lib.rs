//! # Hexdeck Settings
//!
//! Two-tier configuration persistence: a durable client cache (the
//! offline source of truth) plus a remote authority on the controller.
//! Loads merge the two, saves are locally durable and best-effort remote,
//! and rapid interactive edits are coalesced by a debounced writer.

pub mod app_settings;
pub mod cache;
pub mod error;
pub mod remote;
pub mod store;

pub use app_settings::AppSettings;
pub use cache::{CacheStore, FileCache, MemoryCache};
pub use error::{SettingsError, SettingsResult};
pub use remote::{MockRemote, OfflineRemote, RemoteConfigClient};
pub use store::{merge_entries, ConfigSyncStore, StoreConfig};
