//! # USV Actuator Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands sent to the thruster pair every control cycle.
///
/// The demands are published unconditionally, including the neutral (all
/// zero) demand, so that the actuators de-energise promptly whenever live
/// control is not possible.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ThrustDems {
    /// The demanded thrust of the left thruster.
    pub left_thrust: f64,

    /// The demanded thrust of the right thruster.
    pub right_thrust: f64,

    /// The demanded steering position of the left thruster in radians.
    ///
    /// Only driven on platforms with separate steering actuators, zero
    /// otherwise.
    pub left_pos_rad: f64,

    /// The demanded steering position of the right thruster in radians.
    pub right_pos_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Response from the actuator bridge based on the demands sent to it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum ThrustDemsResponse {
    /// Demands were valid and will be executed
    DemsOk,

    /// Demands were invalid and have been rejected
    DemsInvalid,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl ThrustDems {
    /// The neutral demand - zero thrust and zero steering position.
    pub fn neutral() -> Self {
        Self {
            left_thrust: 0.0,
            right_thrust: 0.0,
            left_pos_rad: 0.0,
            right_pos_rad: 0.0,
        }
    }

    /// True if every component of the demand is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left_thrust.is_finite()
            && self.right_thrust.is_finite()
            && self.left_pos_rad.is_finite()
            && self.right_pos_rad.is_finite()
    }
}

impl Default for ThrustDems {
    fn default() -> Self {
        Self::neutral()
    }
}
