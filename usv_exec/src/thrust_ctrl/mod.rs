//! # Thrust control module
//!
//! Converts a high-level velocity setpoint into a pair of differential
//! thruster demands. On each control cycle the module gates on the platform
//! state, expresses the setpoint in the body frame, regulates the heading
//! error through a windup-limited yaw-speed controller and mixes the result
//! into clamped left/right demands. Whenever live control is not possible
//! the neutral demand is emitted and the regulator state is reset.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mixer;
mod params;
mod state;
mod yaw_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use mixer::*;
pub use params::*;
pub use state::*;
pub use yaw_ctrl::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ThrustCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ThrustCtrlError {
    #[error("No parameter named {0:?} exists")]
    UnknownParam(String),

    #[error("Non-finite value {1} requested for parameter {0:?}")]
    NonFiniteParamValue(String, f64),
}
