//! # Hexdeck Kinematics
//!
//! Body/leg geometry and the pose kinematic solver: a local, approximate,
//! presentation-only model that turns an abstract body pose into per-leg
//! joint angles for the 3D preview. The authoritative joint solution
//! lives on the remote controller and arrives via telemetry; nothing here
//! drives hardware.

pub mod geometry;
pub mod rotation;
pub mod solver;

pub use geometry::{AttachPoint, GeometryModel};
pub use rotation::{body_rotation, rotate_attach_point};
pub use solver::{solve, SolveContext, CROUCH_HEIGHT, STAND_HEIGHT};
