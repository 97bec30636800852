//! Implementations for the ThrustCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector3;
use serde::Serialize;

// Internal
use super::{mixer, Params, ThrustCtrlError, YawSpeedController};
use crate::plat_state::ArmingState;
use comms_if::eqpt::usv::ThrustDems;
use comms_if::mode::{ControlMode, ReferenceFrame, YawMode};
use comms_if::tc::VelCmd;
use util::{
    maths::{clamp, sanitise, wrap_pi},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Thrust control module state
pub struct ThrustCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    /// Yaw-speed regulator. Persists across cycles, reset whenever live
    /// output is not possible.
    yaw_ctrl: YawSpeedController,

    /// Accumulated target heading for the yaw-rate submode.
    target_yaw_rad: f64,

    output: Option<ThrustDems>,
}

/// Input data to Thrust Control.
///
/// A snapshot of the platform and sensor state captured by the caller at the
/// start of the control cycle. The snapshot fields may have been captured at
/// slightly different real times - this staleness is accepted and bounded by
/// the cycle period.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Current arming state of the platform.
    pub arming: ArmingState,

    /// Active control mode, or `None` if no mode accepted yet.
    pub control_mode: Option<ControlMode>,

    /// The latest velocity setpoint, or `None` if none ever received.
    pub vel_cmd: Option<VelCmd>,

    /// Age of the latest velocity setpoint.
    ///
    /// Units: seconds
    pub cmd_age_s: f64,

    /// Current yaw estimate.
    ///
    /// Units: radians, wrapped to (-pi, pi]
    pub heading_rad: f64,

    /// Whether any heading estimate has been received yet.
    pub heading_received: bool,

    /// Wall-clock time since the previous cycle.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Status report for ThrustCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// Why the neutral demand was emitted, or `None` for a live demand.
    pub neutral_cause: Option<NeutralCause>,

    /// The wrapped heading error used for regulation.
    pub yaw_error_rad: f64,

    /// The yaw-speed demand fed to the regulator.
    pub yaw_speed_dem_rads: f64,

    /// The differential force produced by the regulator.
    pub yaw_force: f64,

    /// True for each thruster whose demand hit the clamp.
    pub thrust_limited: [bool; 2],

    /// True for each steering position that hit the clamp.
    pub pos_limited: [bool; 2],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Why a cycle produced the neutral demand instead of a live one.
///
/// None of these are errors - each is a defined steady state which is
/// retried automatically on the next cycle.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub enum NeutralCause {
    /// The platform is not armed under offboard control.
    NotArmedOffboard,

    /// No control mode has been accepted yet.
    NoControlMode,

    /// No velocity setpoint has ever been received.
    NoVelCmd,

    /// The latest velocity setpoint is older than the staleness timeout.
    StaleVelCmd,

    /// No heading estimate has been received, so no yaw error can be
    /// computed safely.
    NoHeading,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ThrustCtrl {
    fn default() -> Self {
        let params = Params::default();

        Self {
            params,
            report: StatusReport::default(),
            yaw_ctrl: YawSpeedController::new(
                params.yaw_k_p,
                params.yaw_k_i,
                params.yaw_k_d,
                params.alpha,
                params.antiwindup_cte,
            ),
            target_yaw_rad: 0.0,
            output: None,
        }
    }
}

impl State for ThrustCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = ThrustDems;
    type StatusReport = StatusReport;
    type ProcError = ThrustCtrlError;

    /// Initialise the ThrustCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        // Load the parameters
        self.params = params::load(init_data)?;

        // Rebuild the regulator from the loaded gains
        self.yaw_ctrl = YawSpeedController::new(
            self.params.yaw_k_p,
            self.params.yaw_k_i,
            self.params.yaw_k_d,
            self.params.alpha,
            self.params.antiwindup_cte,
        );
        self.target_yaw_rad = 0.0;

        Ok(())
    }

    /// Perform cyclic processing of Thrust Control.
    ///
    /// This is the command pipeline: gate on the platform state, express the
    /// setpoint in the body frame, regulate the heading error and mix the
    /// result into thruster demands. A demand (live or neutral) is produced
    /// on every cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // ---- OUTPUT GATING ----

        // The platform must be armed offboard with a supported mode active
        let mode = match (input_data.arming, input_data.control_mode) {
            (ArmingState::ArmedOffboard, Some(m)) if m.is_supported() => m,
            // An unsupported stored mode cannot normally happen (the state
            // machine rejects them) but is treated as no usable mode
            (ArmingState::ArmedOffboard, _) => {
                return Ok(self.neutral(NeutralCause::NoControlMode))
            }
            _ => return Ok(self.neutral(NeutralCause::NotArmedOffboard)),
        };

        // A velocity setpoint must exist, contain finite values and be fresh
        let cmd = match input_data.vel_cmd {
            Some(c) if c.is_valid() => c,
            Some(_) | None => return Ok(self.neutral(NeutralCause::NoVelCmd)),
        };
        if input_data.cmd_age_s > self.params.cmd_timeout_s {
            return Ok(self.neutral(NeutralCause::StaleVelCmd));
        }

        // A heading estimate must exist before a yaw error can be computed
        if !input_data.heading_received {
            return Ok(self.neutral(NeutralCause::NoHeading));
        }

        // ---- LIVE PIPELINE ----

        let dt_s = input_data.dt_s;
        let heading_rad = sanitise(input_data.heading_rad);

        // Express the linear setpoint in the body frame
        let vel_body = match cmd.frame {
            ReferenceFrame::BodyFlu => Vector3::from(cmd.linear_ms),
            ReferenceFrame::EarthEnu => {
                crate::frame::to_body_frame(heading_rad, &Vector3::from(cmd.linear_ms))
            }
        };
        let fwd_speed_ms = vel_body[0];

        // Determine the target heading. In the rate submode the clamped
        // commanded rate is integrated into an accumulated target; in the
        // angle submode the setpoint is the target directly.
        let rate_limit = self.params.yaw_rate_limit.abs();
        self.target_yaw_rad = match mode.yaw_mode {
            YawMode::Rate => {
                let cmd_rate = clamp(&cmd.yaw_rads, &-rate_limit, &rate_limit);
                wrap_pi(self.target_yaw_rad + cmd_rate * dt_s.max(0.0))
            }
            YawMode::Angle => wrap_pi(cmd.yaw_rads),
        };

        // Heading error, wrapped into (-pi, pi]
        let yaw_error_rad = wrap_pi(self.target_yaw_rad - heading_rad);
        self.report.yaw_error_rad = yaw_error_rad;

        // Yaw-speed demand from the heading error, saturated at the rate
        // limit
        let yaw_speed_dem_rads = clamp(
            &(self.params.k_yaw_rate * yaw_error_rad),
            &-rate_limit,
            &rate_limit,
        );
        self.report.yaw_speed_dem_rads = yaw_speed_dem_rads;

        // Regulate and convert to a differential force
        let yaw_force =
            sanitise(self.params.k_yaw_force * self.yaw_ctrl.step(yaw_speed_dem_rads, dt_s));
        self.report.yaw_force = yaw_force;

        // Mix into thruster demands
        let output = mixer::mix(&self.params, fwd_speed_ms, yaw_force, &mut self.report);

        trace!(
            "ThrustCtrl output:\n    thrust: ({:.03}, {:.03})\n    pos: ({:.03}, {:.03})",
            output.left_thrust,
            output.right_thrust,
            output.left_pos_rad,
            output.right_pos_rad
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl ThrustCtrl {
    /// Put the module into its safe state.
    ///
    /// The regulator's accumulated integral and the accumulated target
    /// heading are cleared so that no windup carries over into the next
    /// arming cycle, and the output is forced neutral.
    pub fn make_safe(&mut self) {
        self.yaw_ctrl.reset();
        self.target_yaw_rad = 0.0;
        self.output = Some(ThrustDems::neutral());
    }

    /// The demand produced by the most recent cycle, if any.
    pub fn output(&self) -> Option<ThrustDems> {
        self.output
    }

    /// Set a named parameter, applying it to the regulator where relevant.
    ///
    /// The change takes effect on the next cycle. Unknown names and
    /// non-finite values are rejected and nothing changes.
    pub fn set_param(&mut self, name: &str, value: f64) -> Result<(), ThrustCtrlError> {
        self.params.set_by_name(name, value)?;
        self.update_gains();
        Ok(())
    }

    /// The accumulated integral error of the yaw regulator.
    pub fn yaw_integral(&self) -> f64 {
        self.yaw_ctrl.integral()
    }

    /// Push the current parameter set into the regulator, preserving its
    /// accumulated state.
    fn update_gains(&mut self) {
        self.yaw_ctrl.set_gains(
            self.params.yaw_k_p,
            self.params.yaw_k_i,
            self.params.yaw_k_d,
            self.params.alpha,
            self.params.antiwindup_cte,
        );
    }

    /// Emit the neutral demand with the given cause, resetting the regulator
    /// so no integral state survives a gap in live control.
    fn neutral(&mut self, cause: NeutralCause) -> (ThrustDems, StatusReport) {
        self.make_safe();
        self.report.neutral_cause = Some(cause);

        (ThrustDems::neutral(), self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use comms_if::mode::AltitudeMode;

    const PI: f64 = std::f64::consts::PI;
    const DT_S: f64 = 0.01;

    fn rate_mode() -> ControlMode {
        ControlMode {
            frame: ReferenceFrame::BodyFlu,
            yaw_mode: YawMode::Rate,
            altitude_mode: AltitudeMode::None,
        }
    }

    fn fwd_cmd(speed_ms: f64, yaw_rads: f64) -> VelCmd {
        VelCmd {
            linear_ms: [speed_ms, 0.0, 0.0],
            yaw_rads,
            frame: ReferenceFrame::BodyFlu,
        }
    }

    fn live_input(heading_rad: f64, cmd: VelCmd) -> InputData {
        InputData {
            arming: ArmingState::ArmedOffboard,
            control_mode: Some(rate_mode()),
            vel_cmd: Some(cmd),
            cmd_age_s: 0.0,
            heading_rad,
            heading_received: true,
            dt_s: DT_S,
        }
    }

    /// A ThrustCtrl with default params, as `init` would leave it but
    /// without touching the filesystem.
    fn thrust_ctrl() -> ThrustCtrl {
        ThrustCtrl::default()
    }

    #[test]
    fn test_neutral_when_not_armed_offboard() {
        let mut tc = thrust_ctrl();

        for arming in &[ArmingState::Disarmed, ArmingState::ArmedManual] {
            let input = InputData {
                arming: *arming,
                ..live_input(0.0, fwd_cmd(1.0, 0.0))
            };
            let (dems, report) = tc.proc(&input).unwrap();
            assert_eq!(dems, ThrustDems::neutral());
            assert_eq!(report.neutral_cause, Some(NeutralCause::NotArmedOffboard));
        }
    }

    #[test]
    fn test_neutral_without_heading() {
        let mut tc = thrust_ctrl();

        let input = InputData {
            heading_received: false,
            ..live_input(0.0, fwd_cmd(1.0, 0.0))
        };
        let (dems, report) = tc.proc(&input).unwrap();
        assert_eq!(dems, ThrustDems::neutral());
        assert_eq!(report.neutral_cause, Some(NeutralCause::NoHeading));
    }

    #[test]
    fn test_neutral_without_cmd() {
        let mut tc = thrust_ctrl();

        let input = InputData {
            vel_cmd: None,
            ..live_input(0.0, fwd_cmd(1.0, 0.0))
        };
        let (dems, report) = tc.proc(&input).unwrap();
        assert_eq!(dems, ThrustDems::neutral());
        assert_eq!(report.neutral_cause, Some(NeutralCause::NoVelCmd));
    }

    #[test]
    fn test_neutral_on_stale_cmd() {
        let mut tc = thrust_ctrl();

        let input = InputData {
            cmd_age_s: 10.0,
            ..live_input(0.0, fwd_cmd(1.0, 0.0))
        };
        let (dems, report) = tc.proc(&input).unwrap();
        assert_eq!(dems, ThrustDems::neutral());
        assert_eq!(report.neutral_cause, Some(NeutralCause::StaleVelCmd));
    }

    #[test]
    fn test_straight_ahead_scenario() {
        // Armed offboard, heading 0, forward 1 m/s, no yaw rate, default
        // gains (Kp = 1, Ki = 0, GainThrust = 50) -> 50/50 and no
        // correction
        let mut tc = thrust_ctrl();

        let (dems, report) = tc.proc(&live_input(0.0, fwd_cmd(1.0, 0.0))).unwrap();
        assert!(report.neutral_cause.is_none());
        assert_relative_eq!(dems.left_thrust, 50.0);
        assert_relative_eq!(dems.right_thrust, 50.0);
        assert_relative_eq!(report.yaw_force, 0.0);
    }

    #[test]
    fn test_heading_error_produces_differential_thrust() {
        // Heading pi/2 with a zero yaw-rate target (target heading 0)
        // produces a wrapped error of -pi/2 and thrust turning the vehicle
        // back towards zero heading
        let mut tc = thrust_ctrl();

        let (dems, report) = tc.proc(&live_input(PI / 2.0, fwd_cmd(0.0, 0.0))).unwrap();
        assert!(report.neutral_cause.is_none());
        assert_relative_eq!(report.yaw_error_rad, -PI / 2.0);

        // Negative error, turn to starboard: left harder than right
        assert!(dems.left_thrust > dems.right_thrust);
    }

    #[test]
    fn test_rate_command_integrates_target() {
        let mut tc = thrust_ctrl();

        // Command a positive (port) rate with heading fixed at zero; the
        // accumulated target runs ahead of the vehicle and the differential
        // grows in the port direction
        let cmd = fwd_cmd(0.0, 0.5);
        let mut prev_err = 0.0;
        for _ in 0..10 {
            let (dems, report) = tc.proc(&live_input(0.0, cmd)).unwrap();
            assert!(report.yaw_error_rad >= prev_err);
            assert!(dems.right_thrust >= dems.left_thrust);
            prev_err = report.yaw_error_rad;
        }
        assert_relative_eq!(prev_err, 0.5 * DT_S * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rate_command_clamped_to_limit() {
        let mut tc = thrust_ctrl();

        // A rate far beyond the limit is saturated, not rejected
        let (_, report) = tc.proc(&live_input(0.0, fwd_cmd(0.0, 1e3))).unwrap();
        let expected = Params::default().yaw_rate_limit * DT_S;
        assert_relative_eq!(report.yaw_error_rad, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_mode_tracks_heading_setpoint() {
        let mut tc = thrust_ctrl();

        let mut input = live_input(0.3, fwd_cmd(0.0, -0.4));
        input.control_mode = Some(ControlMode {
            yaw_mode: YawMode::Angle,
            ..rate_mode()
        });

        let (_, report) = tc.proc(&input).unwrap();
        assert_relative_eq!(report.yaw_error_rad, -0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_earth_frame_cmd_converted() {
        let mut tc = thrust_ctrl();

        // Vehicle pointing north (yaw pi/2), commanded a northward earth
        // velocity: full forward in the body frame
        let cmd = VelCmd {
            linear_ms: [0.0, 1.0, 0.0],
            yaw_rads: 0.0,
            frame: ReferenceFrame::EarthEnu,
        };
        let mut input = live_input(PI / 2.0, cmd);
        input.control_mode = Some(ControlMode {
            yaw_mode: YawMode::Angle,
            ..rate_mode()
        });
        // Hold the heading where it is so only the thrust term acts
        input.vel_cmd = Some(VelCmd {
            yaw_rads: PI / 2.0,
            ..cmd
        });

        let (dems, report) = tc.proc(&input).unwrap();
        assert_relative_eq!(report.yaw_error_rad, 0.0, epsilon = 1e-12);
        assert_relative_eq!(dems.left_thrust, 50.0, epsilon = 1e-9);
        assert_relative_eq!(dems.right_thrust, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disarm_resets_regulator() {
        let mut tc = thrust_ctrl();
        tc.set_param("yaw_speed_controller.Ki", 1.0).unwrap();

        // Build up integral state with a sustained heading error
        for _ in 0..100 {
            tc.proc(&live_input(1.0, fwd_cmd(0.0, 0.0))).unwrap();
        }
        assert!(tc.yaw_integral().abs() > 0.0);

        // Disarm: output is immediately neutral and the integral is cleared
        // before the next arming cycle
        let input = InputData {
            arming: ArmingState::Disarmed,
            ..live_input(1.0, fwd_cmd(0.0, 0.0))
        };
        let (dems, _) = tc.proc(&input).unwrap();
        assert_eq!(dems, ThrustDems::neutral());
        assert_relative_eq!(tc.yaw_integral(), 0.0);
    }

    #[test]
    fn test_output_always_finite_and_clamped() {
        let mut tc = thrust_ctrl();

        let nasty = VelCmd {
            linear_ms: [f64::INFINITY, f64::NAN, 0.0],
            yaw_rads: f64::NAN,
            frame: ReferenceFrame::BodyFlu,
        };
        // A setpoint containing non-finite values is treated as absent
        let (dems, report) = tc.proc(&live_input(0.0, nasty)).unwrap();
        assert_eq!(dems, ThrustDems::neutral());
        assert_eq!(report.neutral_cause, Some(NeutralCause::NoVelCmd));

        // A degenerate dt still yields a finite, clamped demand
        let mut input = live_input(1.0, fwd_cmd(2.0, 0.1));
        input.dt_s = f64::NAN;
        let (dems, _) = tc.proc(&input).unwrap();
        assert!(dems.is_finite());
        let max = Params::default().maximum_thrust;
        assert!(dems.left_thrust.abs() <= max && dems.right_thrust.abs() <= max);
    }
}
