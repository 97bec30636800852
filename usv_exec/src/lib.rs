//! # USV library.
//!
//! This library allows other crates in the workspace (and the executable's
//! own integration tests) to access items defined inside the USV crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Per-vehicle context - owns the state of every module below
pub mod data_store;

/// Actuator demand sink - the boundary to the external command publisher
pub mod dems_sink;

/// Frame conversion - earth/body planar rotations and quaternion yaw
pub mod frame;

/// Heading estimator - last-value-wins yaw estimate from any nav source
pub mod heading_est;

/// Platform state machine - arming, offboard and control mode gating
pub mod plat_state;

/// Telecommand processor - dispatches TCs into the data store
pub mod tc_processor;

/// Thrust control module - converts velocity setpoints into thruster demands
pub mod thrust_ctrl;
