//! # Velocity setpoint telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::mode::ReferenceFrame;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A velocity setpoint for the vehicle.
///
/// The setpoint is immutable once received and supersedes any prior
/// unconsumed setpoint - there is no command queue.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct VelCmd {
    /// The demanded linear velocity.
    ///
    /// Units: meters/second
    /// Frame: given by `frame`
    pub linear_ms: [f64; 3],

    /// The demanded yaw channel value.
    ///
    /// In the yaw-rate submode this is a rate in radians/second, following
    /// the right hand rule about the vehicle's Z+ (upwards) axis, so that a
    /// positive value turns the vehicle to port. In the yaw-angle submode it
    /// is an absolute heading in radians.
    pub yaw_rads: f64,

    /// The frame the linear components are expressed in.
    pub frame: ReferenceFrame,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl VelCmd {
    /// Determine if the setpoint contains only finite values.
    pub fn is_valid(&self) -> bool {
        self.linear_ms.iter().all(|v| v.is_finite()) && self.yaw_rads.is_finite()
    }
}
