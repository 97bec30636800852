//! # Telecommand module
//!
//! This module provides telecommand definitions for the communications
//! interface. A telecommand is an instruction delivered to the USV by the
//! hosting autonomy stack: arming and offboard requests, control mode
//! requests, velocity setpoints and runtime parameter changes. Each TC
//! yields a synchronous [`TcResponse`] to its sender.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod vel_cmd;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use serde_json;
use thiserror::Error;

// Internal
use crate::eqpt::nav::{ImuData, OdomData, PoseData};
use crate::mode::ControlMode;
pub use vel_cmd::VelCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the USV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Tc {
    /// Request the platform be armed or disarmed.
    SetArming { armed: bool },

    /// Request offboard control be enabled or disabled. Only accepted while
    /// armed.
    SetOffboard { enabled: bool },

    /// Request a new control mode. Rejected if the platform does not support
    /// the requested combination.
    SetControlMode(ControlMode),

    /// A new velocity setpoint. Latest-wins - any unconsumed previous
    /// setpoint is superseded.
    Velocity(VelCmd),

    /// Set a named controller parameter. Takes effect on the next control
    /// cycle.
    SetParam { name: String, value: f64 },

    /// Injected odometry update, used when no live sensor source is wired in.
    SimOdom(OdomData),

    /// Injected ground-truth pose update.
    SimPose(PoseData),

    /// Injected IMU update.
    SimImu(ImuData),
}

/// Response returned synchronously to the sender of a TC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TcResponse {
    /// The TC was accepted and executed.
    Ok,

    /// The TC was understood but rejected, state is unchanged.
    Rejected,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
