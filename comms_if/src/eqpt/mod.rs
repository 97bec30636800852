//! # Equipment messages

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Navigation sensor messages - odometry, pose and IMU
pub mod nav;

/// USV actuator demands
pub mod usv;
