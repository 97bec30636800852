//! Differential thrust mixing for ThrustCtrl
//!
//! Combines a forward-thrust demand and the yaw regulator's correction into
//! independent left/right actuator demands. Clamping here is a hard
//! saturation: no error is raised and no compensation is fed back to the
//! regulator when a demand is limited, the corresponding status report flag
//! is simply set.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::StatusReport;
use comms_if::eqpt::usv::ThrustDems;
use util::maths::{clamp, sanitise};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Mix a forward body-velocity demand and a yaw correction into thruster
/// demands.
///
/// A positive yaw correction (turn to port, right hand rule about Z+) drives
/// the right thruster harder than the left. The same mixing law produces the
/// steering position demands, with `gain_steer` scaling the base and
/// `maximum_pos` bounding the pair; with a zero steering gain the position
/// outputs stay at zero.
pub(crate) fn mix(
    params: &super::Params,
    fwd_speed_ms: f64,
    yaw_correction: f64,
    report: &mut StatusReport,
) -> ThrustDems {
    let yaw_correction = sanitise(yaw_correction);

    // Thrust pair
    let base_thrust = sanitise(params.gain_thrust * fwd_speed_ms);
    let (left_thrust, right_thrust, thrust_limited) =
        mix_pair(base_thrust, yaw_correction, params.maximum_thrust);
    report.thrust_limited = thrust_limited;

    // Steering position pair, same law with the correction unscaled. A
    // disabled (zero gain) steering output must not leak the yaw correction
    // through, so the whole pair is gated.
    let (left_pos_rad, right_pos_rad) = if params.gain_steer != 0.0 {
        let base_pos = sanitise(params.gain_steer * fwd_speed_ms);
        let (left, right, pos_limited) = mix_pair(base_pos, yaw_correction, params.maximum_pos);
        report.pos_limited = pos_limited;
        (left, right)
    } else {
        (0.0, 0.0)
    };

    ThrustDems {
        left_thrust,
        right_thrust,
        left_pos_rad,
        right_pos_rad,
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply the differential mixing law to one actuator pair, clamping both
/// demands to the given magnitude.
fn mix_pair(base: f64, correction: f64, max_magnitude: f64) -> (f64, f64, [bool; 2]) {
    let max = max_magnitude.abs();

    let left_raw = sanitise(base - correction);
    let right_raw = sanitise(base + correction);

    let left = clamp(&left_raw, &-max, &max);
    let right = clamp(&right_raw, &-max, &max);

    (left, right, [left != left_raw, right != right_raw])
}
