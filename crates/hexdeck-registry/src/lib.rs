//! # Hexdeck Registry
//!
//! Named-entity registries for profiles, gaits, and pose presets, backed
//! by the config sync store. Each registry enforces its correctness
//! invariants before any state change: exactly one default profile, a
//! non-empty enabled gait set, no deleting an active item. Rejections are
//! typed; persistence failures degrade to cached data and never abort an
//! otherwise valid operation.

pub mod error;
pub mod gaits;
pub mod model;
pub mod poses;
pub mod profiles;

pub use error::{RegistryError, RegistryResult};
pub use gaits::GaitRegistry;
pub use model::{normalize_name, GaitDefinition, PosePreset, Profile};
pub use poses::PoseRegistry;
pub use profiles::ProfileRegistry;
