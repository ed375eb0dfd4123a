//! Body and leg dimensional constants, resolved from configuration.
//!
//! A `GeometryModel` is immutable per load: it is rebuilt whenever the
//! active profile's configuration changes, never mutated in place.

use hexdeck_core::{ConfigEntry, LegId, LEG_COUNT};
use serde::{Deserialize, Serialize};

/// Default body radius (mount circle), robot units.
pub const DEFAULT_BODY_RADIUS: f64 = 60.0;
/// Default geometric body height, robot units.
pub const DEFAULT_BODY_HEIGHT: f64 = 80.0;
/// Default coxa segment length.
pub const DEFAULT_COXA_LEN: f64 = 30.0;
/// Default femur segment length.
pub const DEFAULT_FEMUR_LEN: f64 = 85.0;
/// Default tibia segment length.
pub const DEFAULT_TIBIA_LEN: f64 = 120.0;

/// Default mount headings in degrees, wire-index order (FR, MR, RR, RL,
/// ML, FL). Right-side legs point into negative angles, measured CCW from
/// the forward (+X) axis.
pub const DEFAULT_MOUNT_ANGLES: [f64; LEG_COUNT] = [-45.0, -90.0, -135.0, 135.0, 90.0, 45.0];

/// Fixed offset and heading at which a leg's coxa joint mounts to the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Outward heading of the leg at this mount, degrees.
    pub angle_deg: f64,
}

/// Body and leg dimensions plus the six leg attach points.
///
/// Invariant: exactly six attach points, indices 0..5 in [`LegId`] wire
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryModel {
    pub body_radius: f64,
    pub body_height_geo: f64,
    pub coxa_len: f64,
    pub femur_len: f64,
    pub tibia_len: f64,
    pub attach: [AttachPoint; LEG_COUNT],
}

impl Default for GeometryModel {
    fn default() -> Self {
        Self::resolve(&ConfigEntry::new())
    }
}

impl GeometryModel {
    /// Resolve a geometry model from a configuration entry.
    ///
    /// Documented keys: `body_radius`, `body_height`, `leg_coxa_length`,
    /// `leg_femur_length`, `leg_tibia_length`, `leg_mount_angles` (array
    /// of 6 degrees). Any key absent or mistyped falls back to its
    /// default; resolution never fails.
    pub fn resolve(config: &ConfigEntry) -> Self {
        let body_radius = positive_or(config.get_f64("body_radius"), DEFAULT_BODY_RADIUS);
        let body_height_geo = positive_or(config.get_f64("body_height"), DEFAULT_BODY_HEIGHT);
        let coxa_len = positive_or(config.get_f64("leg_coxa_length"), DEFAULT_COXA_LEN);
        let femur_len = positive_or(config.get_f64("leg_femur_length"), DEFAULT_FEMUR_LEN);
        let tibia_len = positive_or(config.get_f64("leg_tibia_length"), DEFAULT_TIBIA_LEN);

        let mount_angles = config
            .get_f64_array("leg_mount_angles")
            .and_then(|angles| <[f64; LEG_COUNT]>::try_from(angles.as_slice()).ok())
            .unwrap_or(DEFAULT_MOUNT_ANGLES);

        let mut attach = [AttachPoint {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle_deg: 0.0,
        }; LEG_COUNT];
        for (i, slot) in attach.iter_mut().enumerate() {
            let rad = mount_angles[i].to_radians();
            *slot = AttachPoint {
                x: body_radius * rad.cos(),
                y: body_radius * rad.sin(),
                z: 0.0,
                angle_deg: mount_angles[i],
            };
        }

        tracing::debug!(
            body_radius,
            coxa_len,
            femur_len,
            tibia_len,
            "geometry resolved"
        );

        Self {
            body_radius,
            body_height_geo,
            coxa_len,
            femur_len,
            tibia_len,
            attach,
        }
    }

    /// Attach point for a leg.
    pub fn attach_for(&self, leg: LegId) -> &AttachPoint {
        &self.attach[leg.index()]
    }

    /// Fully extended leg reach from the coxa mount.
    pub fn max_reach(&self) -> f64 {
        self.coxa_len + self.femur_len + self.tibia_len
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}
