//! # Frame conversion module
//!
//! Stateless transforms between the earth-fixed (east-north-up) frame and
//! the vehicle's body (forward-left-up) frame. The vehicle is assumed to be
//! near-planar: only yaw is considered, roll and pitch are discarded.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Rotation2, Vector2, Vector3};

// Internal
use comms_if::eqpt::nav::Quat;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Express an earth-frame vector in the body frame, given the vehicle's
/// current yaw.
///
/// Applies a 2D rotation of `-yaw` to the horizontal components and passes
/// the vertical component through unchanged.
pub fn to_body_frame(yaw_rad: f64, vec_earth: &Vector3<f64>) -> Vector3<f64> {
    let horiz = Rotation2::new(-yaw_rad) * Vector2::new(vec_earth[0], vec_earth[1]);

    Vector3::new(horiz[0], horiz[1], vec_earth[2])
}

/// Extract the yaw angle from an orientation quaternion.
///
/// This is the projection of the full 3D rotation onto the horizontal plane,
/// discarding roll and pitch.
pub fn quat_to_yaw(q: &Quat) -> f64 {
    let sin_yaw = 2.0 * (q.w * q.z + q.x * q.y);
    let cos_yaw = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);

    sin_yaw.atan2(cos_yaw)
}
