//! Body rotation composition.
//!
//! The composition order is a contract: an attach point is transformed by
//! body yaw first, then pitch, then roll. Keeping the order in one named
//! function makes it testable independently of rendering (the source had
//! it baked into inline arithmetic).

use crate::geometry::AttachPoint;
use glam::{DMat3, DVec3};
use hexdeck_core::BodyPose;

/// Rotation matrix for a body pose.
///
/// Contract: `v_world = R_roll(x) * R_pitch(y) * R_yaw(z) * v_body` —
/// yaw is applied first, then pitch, then roll. Angles are degrees.
pub fn body_rotation(pose: &BodyPose) -> DMat3 {
    let yaw = DMat3::from_rotation_z(pose.yaw.to_radians());
    let pitch = DMat3::from_rotation_y(pose.pitch.to_radians());
    let roll = DMat3::from_rotation_x(pose.roll.to_radians());
    roll * pitch * yaw
}

/// World-space offset of an attach point under a body pose.
///
/// Used only for render placement of the leg root; joint angle
/// computation does not consume this.
pub fn rotate_attach_point(pose: &BodyPose, attach: &AttachPoint) -> DVec3 {
    body_rotation(pose) * DVec3::new(attach.x, attach.y, attach.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(roll: f64, pitch: f64, yaw: f64) -> BodyPose {
        BodyPose {
            roll,
            pitch,
            yaw,
            ..Default::default()
        }
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn identity_for_zero_pose() {
        let r = body_rotation(&pose(0.0, 0.0, 0.0));
        let v = r * DVec3::new(1.0, 2.0, 3.0);
        assert!((v - DVec3::new(1.0, 2.0, 3.0)).length() < EPS);
    }

    #[test]
    fn yaw_rotates_about_z() {
        let r = body_rotation(&pose(0.0, 0.0, 90.0));
        let v = r * DVec3::X;
        assert!((v - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn composition_order_is_yaw_then_pitch_then_roll() {
        // With yaw 90 then pitch 90: X -> Y (yaw), Y unchanged by pitch
        // about Y. The reversed order would send X -> -Z -> -Z.
        let r = body_rotation(&pose(0.0, 90.0, 90.0));
        let v = r * DVec3::X;
        assert!((v - DVec3::Y).length() < EPS);

        let reversed = DMat3::from_rotation_z(90.0_f64.to_radians())
            * DMat3::from_rotation_y(90.0_f64.to_radians());
        let w = reversed * DVec3::X;
        assert!((w - v).length() > 1.0, "orders must be distinguishable");
    }

    #[test]
    fn attach_point_placement_uses_body_rotation() {
        let attach = AttachPoint {
            x: 10.0,
            y: 0.0,
            z: 0.0,
            angle_deg: 0.0,
        };
        let v = rotate_attach_point(&pose(0.0, 0.0, 180.0), &attach);
        assert!((v - DVec3::new(-10.0, 0.0, 0.0)).length() < 1e-8);
    }
}
