//! # Demand sink
//!
//! The boundary between the control pipeline and the actuator transport.
//! The pipeline publishes one [`ThrustDems`] every cycle through a
//! [`DemsSink`]; what lies behind the trait (a simulator bridge, real
//! hardware, or a log for analysis) is the integrator's choice.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use comms_if::eqpt::usv::{ThrustDems, ThrustDemsResponse};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Accepts one set of actuator demands per control cycle.
pub trait DemsSink {
    /// Publish the demands for this cycle.
    fn publish(&mut self, dems: &ThrustDems) -> ThrustDemsResponse;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A sink which writes each demand set to the session log.
///
/// Demands are logged at debug level except when they change from the
/// previously published set, which is logged at a higher level so that the
/// interesting transitions stand out in a long session.
#[derive(Default)]
pub struct LogSink {
    last: Option<ThrustDems>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DemsSink for LogSink {
    fn publish(&mut self, dems: &ThrustDems) -> ThrustDemsResponse {
        if !dems.is_finite() {
            warn!("Rejecting non-finite thruster demands: {:?}", dems);
            return ThrustDemsResponse::DemsInvalid;
        }

        if self.last.as_ref() != Some(dems) {
            debug!(
                "Thruster demands changed: thrust ({:.03}, {:.03}), pos ({:.03}, {:.03})",
                dems.left_thrust, dems.right_thrust, dems.left_pos_rad, dems.right_pos_rad
            );
        }

        self.last = Some(*dems);
        ThrustDemsResponse::DemsOk
    }
}
