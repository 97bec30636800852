//! # Data Store
//!
//! One `DataStore` owns the complete state of one vehicle: the heading
//! estimator, the platform state machine, the thrust control module and the
//! latest velocity setpoint. Everything the control cycle touches lives here
//! - there is no hidden global or static state, so multiple independent
//! vehicles can run side by side and tests are deterministic.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::time::Instant;

// Internal
use crate::heading_est::HeadingEst;
use crate::plat_state::PlatState;
use crate::thrust_ctrl::{self, ThrustCtrl};
use comms_if::eqpt::usv::ThrustDems;
use comms_if::tc::VelCmd;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // Heading estimation
    pub heading_est: HeadingEst,

    // Platform state
    pub plat_state: PlatState,

    // ThrustCtrl
    pub thrust_ctrl: ThrustCtrl,
    pub thrust_ctrl_output: ThrustDems,
    pub thrust_ctrl_status_rpt: thrust_ctrl::StatusReport,

    // Velocity setpoint, latest-wins
    pub latest_vel_cmd: Option<VelCmd>,

    /// When the latest setpoint was received, used for the staleness check.
    pub vel_cmd_recv_time: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Record a newly received velocity setpoint, superseding any previous
    /// one.
    pub fn set_vel_cmd(&mut self, cmd: VelCmd) {
        self.latest_vel_cmd = Some(cmd);
        self.vel_cmd_recv_time = Some(Instant::now());
    }

    /// Age of the latest velocity setpoint in seconds, or zero if none has
    /// been received.
    pub fn vel_cmd_age_s(&self) -> f64 {
        match self.vel_cmd_recv_time {
            Some(t) => t.elapsed().as_secs_f64(),
            None => 0.0,
        }
    }

    /// Snapshot the store into a ThrustCtrl input for this cycle.
    pub fn thrust_ctrl_input(&self, dt_s: f64) -> thrust_ctrl::InputData {
        let (heading_rad, heading_received) = self.heading_est.current();

        thrust_ctrl::InputData {
            arming: self.plat_state.arming(),
            control_mode: self.plat_state.control_mode(),
            vel_cmd: self.latest_vel_cmd,
            cmd_age_s: self.vel_cmd_age_s(),
            heading_rad,
            heading_received,
            dt_s,
        }
    }
}
