//! Parameters structure for ThrustCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::ThrustCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Thrust control.
///
/// Each parameter may also be changed at runtime through the `SetParam`
/// telecommand, taking effect on the next control cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Params {
    // ---- YAW REGULATION ----
    /// Limit applied to yaw-speed demands. Demands beyond the limit are
    /// saturated, not rejected.
    ///
    /// Units: radians/second
    pub yaw_rate_limit: f64,

    /// Gain converting a heading error into a yaw-speed demand.
    ///
    /// Units: 1/second
    pub k_yaw_rate: f64,

    /// Gain converting the yaw-speed controller output into a differential
    /// force on the thruster pair.
    pub k_yaw_force: f64,

    /// Proportional gain of the yaw-speed controller.
    pub yaw_k_p: f64,

    /// Integral gain of the yaw-speed controller.
    pub yaw_k_i: f64,

    /// Derivative gain of the yaw-speed controller. Reserved - zero by
    /// default.
    pub yaw_k_d: f64,

    /// Bound on the yaw-speed controller's accumulated integral error.
    pub antiwindup_cte: f64,

    /// Low-pass coefficient for the yaw-speed controller's derivative term.
    /// Inert while `yaw_k_d` is zero.
    pub alpha: f64,

    // ---- THRUST MIXING ----
    /// Gain converting the forward body velocity demand into a base thrust.
    pub gain_thrust: f64,

    /// Hard clamp on the magnitude of each thruster demand.
    pub maximum_thrust: f64,

    /// Gain converting the forward velocity demand into a base steering
    /// position. Zero disables the steering outputs.
    pub gain_steer: f64,

    /// Hard clamp on the magnitude of each steering position demand.
    ///
    /// Units: radians
    pub maximum_pos: f64,

    // ---- COMMAND HANDLING ----
    /// Age beyond which a velocity setpoint is treated as never received.
    ///
    /// Units: seconds
    pub cmd_timeout_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            yaw_rate_limit: std::f64::consts::FRAC_PI_4,
            k_yaw_rate: 4.0,
            k_yaw_force: 15.0,
            yaw_k_p: 1.0,
            yaw_k_i: 0.0,
            yaw_k_d: 0.0,
            antiwindup_cte: 5.0,
            alpha: 0.1,
            gain_thrust: 50.0,
            maximum_thrust: 2000.0,
            gain_steer: 0.0,
            maximum_pos: std::f64::consts::FRAC_PI_2,
            cmd_timeout_s: 0.5,
        }
    }
}

impl Params {
    /// Set a parameter by its external name.
    ///
    /// Unknown names and non-finite values are rejected without changing any
    /// parameter. Each change is applied atomically per parameter.
    pub fn set_by_name(&mut self, name: &str, value: f64) -> Result<(), ThrustCtrlError> {
        if !value.is_finite() {
            return Err(ThrustCtrlError::NonFiniteParamValue(
                name.to_string(),
                value,
            ));
        }

        let param = match name {
            "yaw_rate_limit" => &mut self.yaw_rate_limit,
            "K_yaw_rate" => &mut self.k_yaw_rate,
            "K_yaw_force" => &mut self.k_yaw_force,
            "GainThrust" => &mut self.gain_thrust,
            "maximum_thrust" => &mut self.maximum_thrust,
            "alpha" => &mut self.alpha,
            "antiwindup_cte" => &mut self.antiwindup_cte,
            "yaw_speed_controller.Kp" => &mut self.yaw_k_p,
            "yaw_speed_controller.Ki" => &mut self.yaw_k_i,
            "yaw_speed_controller.Kd" => &mut self.yaw_k_d,
            "GainSteer" => &mut self.gain_steer,
            "maximum_pos" => &mut self.maximum_pos,
            "cmd_timeout_s" => &mut self.cmd_timeout_s,
            _ => return Err(ThrustCtrlError::UnknownParam(name.to_string())),
        };

        *param = value;

        Ok(())
    }
}
