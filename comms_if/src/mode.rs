//! # Control mode descriptors
//!
//! A control mode describes how an incoming velocity setpoint is to be
//! interpreted: which frame the linear components are expressed in, whether
//! the yaw channel carries a rate or an absolute heading, and whether an
//! altitude channel is in use. The platform only supports a subset of the
//! possible combinations and will reject requests for anything else.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The active control mode of the platform.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlMode {
    /// The frame the linear velocity components are expressed in
    pub frame: ReferenceFrame,

    /// How the yaw channel of the setpoint is interpreted
    pub yaw_mode: YawMode,

    /// How the altitude channel of the setpoint is interpreted
    pub altitude_mode: AltitudeMode,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Frame of reference for the linear velocity components of a setpoint.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Vehicle body frame, forward-left-up axes
    BodyFlu,

    /// Earth-fixed frame, east-north-up axes
    EarthEnu,
}

/// Interpretation of the yaw channel of a setpoint.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum YawMode {
    /// The yaw channel is a rate demand in radians/second
    Rate,

    /// The yaw channel is an absolute heading demand in radians
    Angle,
}

/// Interpretation of the altitude channel of a setpoint.
///
/// A surface vehicle cannot follow an altitude demand, so only `None` is
/// supported.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AltitudeMode {
    /// No altitude channel
    None,

    /// Hold a demanded altitude
    AltitudeHold,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl ControlMode {
    /// Determine if this mode is one the platform supports.
    ///
    /// Velocity control in either frame with either yaw submode is supported.
    /// Any altitude mode other than `None` is not.
    pub fn is_supported(&self) -> bool {
        match self.altitude_mode {
            AltitudeMode::None => true,
            _ => false,
        }
    }
}
