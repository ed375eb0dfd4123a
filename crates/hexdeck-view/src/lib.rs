//! # Hexdeck View
//!
//! Turns shared state into what the renderer draws. Each tick the
//! reconciler picks the authoritative pose source (user edit, live
//! telemetry, offline gait simulation, or idle animation), runs the
//! kinematic solver, and emits a read-only view model.

pub mod reconciler;
pub mod simulation;
pub mod transition;

pub use reconciler::{PoseSource, RenderView, ViewModelReconciler, TELEMETRY_MAX_AGE};
pub use simulation::{GaitPattern, GaitSimulator};
pub use transition::PoseTransition;
