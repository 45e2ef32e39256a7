//! Steering
//!
//! Converts look-at goals into facing-relative movement directions.
//!
//! Facing angles are measured on the ground plane as `atan2(z, x)`. A movement
//! direction is expressed relative to the current facing with a fixed quarter
//! turn offset: moving straight at the look-at point is the direction at
//! angle `-PI / 2`.

use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use super::tuning;

/// Ground-plane bearing from `from` to `to`
pub fn planar_angle(from: Vec3, to: Vec3) -> f32 {
    let delta = to - from;
    delta.z.atan2(delta.x)
}

/// Squared distance ignoring the vertical axis
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Point `TURN_LOOK_DISTANCE` ahead of `origin` at the given heading
pub fn heading_point(origin: Vec3, angle: f32) -> Vec3 {
    origin
        + Vec3::new(
            angle.cos() * tuning::TURN_LOOK_DISTANCE,
            0.0,
            angle.sin() * tuning::TURN_LOOK_DISTANCE,
        )
}

/// Unit movement direction toward `target`, relative to facing `look_at`
pub fn relative_move_direction(origin: Vec3, look_at: Vec3, target: Vec3) -> Vec3 {
    let look_angle = planar_angle(origin, look_at);
    let move_angle = planar_angle(origin, target);

    let angle = move_angle - look_angle - FRAC_PI_2;
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Map a facing-relative direction back into world space.
///
/// Inverse of [`relative_move_direction`]; used by executors that integrate
/// movement in world coordinates.
pub fn to_world_direction(origin: Vec3, look_at: Vec3, relative: Vec3) -> Vec3 {
    if relative.x == 0.0 && relative.z == 0.0 {
        return Vec3::ZERO;
    }
    let look_angle = planar_angle(origin, look_at);
    let angle = relative.z.atan2(relative.x) + look_angle + FRAC_PI_2;
    Vec3::new(angle.cos(), 0.0, angle.sin())
}
