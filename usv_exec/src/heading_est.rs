//! # Heading estimator module
//!
//! Maintains the single most recently observed yaw angle of the vehicle,
//! regardless of which navigation source produced it. There is no fusion and
//! no timestamp arbitration between sources - the last writer wins. This is
//! an accepted simplification: if multiple sources disagree, the most
//! recently delivered one silently takes precedence.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use crate::frame;
use comms_if::eqpt::nav::YieldsOrientation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current heading estimate.
///
/// Lives for the process lifetime and starts in the "not received" state, in
/// which the control pipeline must not compute a yaw error.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct HeadingEst {
    yaw_rad: f64,
    received: bool,
    source: Option<HeadingSource>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Identity of the navigation source that last wrote the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingSource {
    Odometry,
    Pose,
    Imu,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HeadingEst {
    /// Update the estimate from any message carrying an orientation.
    ///
    /// A malformed orientation (non-finite or non-unit quaternion) is
    /// dropped and the prior estimate retained, in which case `false` is
    /// returned.
    pub fn update(&mut self, source: HeadingSource, msg: &impl YieldsOrientation) -> bool {
        let quat = msg.orientation();

        if !quat.is_valid_orientation() {
            warn!(
                "Dropped degenerate orientation from {:?} source: {:?}",
                source, quat
            );
            return false;
        }

        self.yaw_rad = frame::quat_to_yaw(quat);
        self.received = true;
        self.source = Some(source);

        true
    }

    /// Get the current yaw estimate and whether any estimate has been
    /// received yet.
    pub fn current(&self) -> (f64, bool) {
        (self.yaw_rad, self.received)
    }

    /// The source that last wrote the estimate, if any.
    pub fn source(&self) -> Option<HeadingSource> {
        self.source
    }
}
