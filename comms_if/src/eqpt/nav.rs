//! # Navigation Sensor Messages
//!
//! Odometry, ground-truth pose and IMU messages all carry the vehicle's
//! orientation as a unit quaternion. Rather than giving each message its own
//! handler in the executable they share the [`YieldsOrientation`] capability,
//! so a single heading-update path serves every source.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum deviation of a quaternion's norm from one before it is considered
/// degenerate.
pub const QUAT_UNIT_NORM_TOL: f64 = 1e-2;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An orientation quaternion (x, y, z, w component order).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// An odometry message from the vehicle's state estimator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OdomData {
    /// Position in the earth frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Orientation of the body frame in the earth frame.
    pub orientation: Quat,
}

/// A ground-truth pose message, as produced by a simulator bridge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PoseData {
    /// Position in the earth frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Orientation of the body frame in the earth frame.
    pub orientation: Quat,
}

/// An IMU message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ImuData {
    /// Orientation of the body frame in the earth frame.
    pub orientation: Quat,

    /// Angular rate about the body axes.
    ///
    /// Units: radians/second
    pub angular_rate_rads: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Capability of a sensor message which carries the vehicle's orientation.
pub trait YieldsOrientation {
    fn orientation(&self) -> &Quat;
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Quat {
    /// The identity (no rotation) quaternion.
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// A quaternion representing a pure yaw rotation.
    pub fn from_yaw(yaw_rad: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: (yaw_rad / 2.0).sin(),
            w: (yaw_rad / 2.0).cos(),
        }
    }

    /// The euclidian norm of the quaternion.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// True if all components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// True if this is a valid (finite, unit norm) orientation.
    pub fn is_valid_orientation(&self) -> bool {
        self.is_finite() && (self.norm() - 1.0).abs() <= QUAT_UNIT_NORM_TOL
    }
}

impl YieldsOrientation for OdomData {
    fn orientation(&self) -> &Quat {
        &self.orientation
    }
}

impl YieldsOrientation for PoseData {
    fn orientation(&self) -> &Quat {
        &self.orientation
    }
}

impl YieldsOrientation for ImuData {
    fn orientation(&self) -> &Quat {
        &self.orientation
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_quat_validity() {
        assert!(Quat::identity().is_valid_orientation());
        assert!(Quat::from_yaw(1.2).is_valid_orientation());

        let zero = Quat {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 0.0,
        };
        assert!(!zero.is_valid_orientation());

        let nan = Quat {
            x: f64::NAN,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        };
        assert!(!nan.is_valid_orientation());

        let long = Quat {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 2.0,
        };
        assert!(!long.is_valid_orientation());
    }
}
