//! Heading and tilt math. Forward is -Z, right is +X, up is +Y, matching
//! the `Transform` conventions in `engine_core`.

use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Yaw that points local forward along `direction`'s horizontal part.
pub fn heading_of(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(f32::atan2(-flat.x, -flat.z))
}

/// Yaw of an orientation, read from its forward axis.
pub fn yaw_of(orientation: Quat) -> f32 {
    heading_of(orientation * -Vec3::Z).unwrap_or(0.0)
}

/// Horizontal (forward, right) unit vectors for a yaw.
pub fn yaw_basis(yaw: f32) -> (Vec3, Vec3) {
    let (sin, cos) = yaw.sin_cos();
    (Vec3::new(-sin, 0.0, -cos), Vec3::new(cos, 0.0, -sin))
}

/// Flattened (forward, right) basis of a look direction.
pub fn view_basis(view_forward: Vec3) -> Option<(Vec3, Vec3)> {
    heading_of(view_forward).map(yaw_basis)
}

/// Move `current` toward `target` along the shorter arc by fraction `t`.
pub fn approach_heading(current: f32, target: f32, t: f32) -> f32 {
    wrap_angle(current + wrap_angle(target - current) * t.clamp(0.0, 1.0))
}

/// Cosmetic (pitch, roll) for a world velocity seen from `yaw`.
///
/// Depends only on the velocity passed in, so holding a velocity holds the tilt.
pub fn tilt_for_velocity(
    velocity: Vec3,
    yaw: f32,
    speed: f32,
    max_pitch: f32,
    max_roll: f32,
) -> (f32, f32) {
    if speed <= 0.0 {
        return (0.0, 0.0);
    }
    let (forward, right) = yaw_basis(yaw);
    let along = (velocity.dot(forward) / speed).clamp(-1.0, 1.0);
    let across = (velocity.dot(right) / speed).clamp(-1.0, 1.0);
    // nose dips into travel, banks into strafe
    (-along * max_pitch, -across * max_roll)
}

/// Absolute orientation from heading and tilt.
pub fn compose(yaw: f32, pitch: f32, roll: f32) -> Quat {
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch) * Quat::from_rotation_z(roll)
}

/// Step an orientation toward upright, keeping its yaw.
pub fn level_toward_upright(orientation: Quat, t: f32) -> Quat {
    let upright = Quat::from_rotation_y(yaw_of(orientation));
    orientation.slerp(upright, t.clamp(0.0, 1.0)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_round_trips_through_basis() {
        for yaw in [-3.0_f32, -1.2, 0.0, 0.7, 2.9] {
            let (forward, right) = yaw_basis(yaw);
            assert!((heading_of(forward).unwrap() - yaw).abs() < 1e-5);
            assert!(forward.dot(right).abs() < 1e-6);
            let q = Quat::from_rotation_y(yaw);
            assert!((q * -Vec3::Z - forward).length() < 1e-5);
            assert!((q * Vec3::X - right).length() < 1e-5);
        }
    }

    #[test]
    fn approach_heading_takes_short_way_round() {
        let current = 3.0;
        let target = -3.0;
        let next = approach_heading(current, target, 0.5);
        // halfway across the PI seam, not back through zero
        assert!(next.abs() > 3.0);
    }

    #[test]
    fn tilt_is_clamped_and_signed() {
        let max_pitch = 8.0_f32.to_radians();
        let max_roll = 4.0_f32.to_radians();
        let (pitch, roll) = tilt_for_velocity(Vec3::new(0.0, 0.0, -100.0), 0.0, 15.0, max_pitch, max_roll);
        assert!((pitch + max_pitch).abs() < 1e-6);
        assert!(roll.abs() < 1e-6);

        let (pitch, roll) = tilt_for_velocity(Vec3::new(7.5, 0.0, 0.0), 0.0, 15.0, max_pitch, max_roll);
        assert!(pitch.abs() < 1e-6);
        assert!((roll + max_roll * 0.5).abs() < 1e-6);
    }

    #[test]
    fn leveling_preserves_yaw() {
        let tilted = compose(1.0, 0.1, -0.05);
        let leveled = level_toward_upright(tilted, 1.0);
        assert!((yaw_of(leveled) - 1.0).abs() < 1e-3);
        assert!(((leveled * Vec3::Y) - Vec3::Y).length() < 1e-4);
    }
}
