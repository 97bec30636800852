//! # Communications interface library
//!
//! Transport-agnostic message definitions shared between the USV executable
//! and whatever delivers its commands and sensor data. No wire encoding is
//! defined here - carrying these messages is the transport layer's concern.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment messages - actuator demands and navigation sensor data
pub mod eqpt;

/// Control mode descriptors
pub mod mode;

/// Telecommands - instructions sent to the USV by the autonomy stack
pub mod tc;
