//! # Telecommand processor
//!
//! Executes telecommands against the data store. Execution is synchronous
//! and ordered - each TC fully updates the store before the next one is
//! looked at, and the control cycle sees the state left by the last TC of
//! the cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};

// Internal
use crate::data_store::DataStore;
use crate::heading_est::HeadingSource;
use crate::plat_state::ArmingState;
use comms_if::tc::{Tc, TcResponse};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand, mutating the data store.
///
/// A rejected TC leaves the store unchanged. Rejection is not an error of
/// the executive - the cause is logged and the response returned to the
/// sender.
pub fn exec(ds: &mut DataStore, tc: &Tc) -> TcResponse {
    match tc {
        Tc::SetArming { armed } => {
            ds.plat_state.set_armed(*armed);

            // Leaving the armed state forces the safe output immediately
            // rather than waiting for the next cycle's gating
            if !armed {
                ds.thrust_ctrl.make_safe();
            }

            TcResponse::Ok
        }
        Tc::SetOffboard { enabled } => match ds.plat_state.set_offboard(*enabled) {
            Ok(()) => {
                if ds.plat_state.arming() != ArmingState::ArmedOffboard {
                    ds.thrust_ctrl.make_safe();
                }
                TcResponse::Ok
            }
            Err(e) => {
                warn!("SetOffboard rejected: {}", e);
                TcResponse::Rejected
            }
        },
        Tc::SetControlMode(mode) => match ds.plat_state.set_control_mode(mode) {
            Ok(()) => TcResponse::Ok,
            Err(e) => {
                warn!("SetControlMode rejected: {}", e);
                TcResponse::Rejected
            }
        },
        Tc::Velocity(cmd) => {
            // Latest-wins: the new setpoint supersedes the previous one even
            // if the previous one was never acted on
            ds.set_vel_cmd(*cmd);
            TcResponse::Ok
        }
        Tc::SetParam { name, value } => match ds.thrust_ctrl.set_param(name, *value) {
            Ok(()) => {
                info!("Parameter {} set to {}", name, value);
                TcResponse::Ok
            }
            Err(e) => {
                warn!("SetParam rejected: {}", e);
                TcResponse::Rejected
            }
        },
        Tc::SimOdom(odom) => heading_response(ds.heading_est.update(HeadingSource::Odometry, odom)),
        Tc::SimPose(pose) => heading_response(ds.heading_est.update(HeadingSource::Pose, pose)),
        Tc::SimImu(imu) => heading_response(ds.heading_est.update(HeadingSource::Imu, imu)),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn heading_response(accepted: bool) -> TcResponse {
    if accepted {
        TcResponse::Ok
    } else {
        TcResponse::Rejected
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::nav::{ImuData, Quat};
    use comms_if::mode::{AltitudeMode, ControlMode, ReferenceFrame, YawMode};
    use comms_if::tc::VelCmd;

    fn supported_mode() -> ControlMode {
        ControlMode {
            frame: ReferenceFrame::BodyFlu,
            yaw_mode: YawMode::Rate,
            altitude_mode: AltitudeMode::None,
        }
    }

    fn vel_cmd() -> VelCmd {
        VelCmd {
            linear_ms: [1.0, 0.0, 0.0],
            yaw_rads: 0.0,
            frame: ReferenceFrame::BodyFlu,
        }
    }

    #[test]
    fn test_arm_offboard_sequence() {
        let mut ds = DataStore::default();

        assert_eq!(exec(&mut ds, &Tc::SetArming { armed: true }), TcResponse::Ok);
        assert_eq!(
            exec(&mut ds, &Tc::SetOffboard { enabled: true }),
            TcResponse::Ok
        );
        assert_eq!(ds.plat_state.arming(), ArmingState::ArmedOffboard);
    }

    #[test]
    fn test_offboard_while_disarmed_rejected() {
        let mut ds = DataStore::default();

        assert_eq!(
            exec(&mut ds, &Tc::SetOffboard { enabled: true }),
            TcResponse::Rejected
        );
        assert_eq!(ds.plat_state.arming(), ArmingState::Disarmed);
    }

    #[test]
    fn test_set_control_mode() {
        let mut ds = DataStore::default();

        assert_eq!(
            exec(&mut ds, &Tc::SetControlMode(supported_mode())),
            TcResponse::Ok
        );

        let bad = ControlMode {
            altitude_mode: AltitudeMode::AltitudeHold,
            ..supported_mode()
        };
        assert_eq!(exec(&mut ds, &Tc::SetControlMode(bad)), TcResponse::Rejected);
        assert_eq!(ds.plat_state.control_mode(), Some(supported_mode()));
    }

    #[test]
    fn test_velocity_latest_wins() {
        let mut ds = DataStore::default();

        exec(&mut ds, &Tc::Velocity(vel_cmd()));
        let newer = VelCmd {
            linear_ms: [2.0, 0.0, 0.0],
            ..vel_cmd()
        };
        exec(&mut ds, &Tc::Velocity(newer));

        assert_eq!(ds.latest_vel_cmd.map(|c| c.linear_ms[0]), Some(2.0));
    }

    #[test]
    fn test_set_param() {
        let mut ds = DataStore::default();

        assert_eq!(
            exec(
                &mut ds,
                &Tc::SetParam {
                    name: "GainThrust".into(),
                    value: 75.0
                }
            ),
            TcResponse::Ok
        );
        assert_eq!(
            exec(
                &mut ds,
                &Tc::SetParam {
                    name: "bogus".into(),
                    value: 1.0
                }
            ),
            TcResponse::Rejected
        );
    }

    #[test]
    fn test_disarm_makes_safe() {
        let mut ds = DataStore::default();
        exec(&mut ds, &Tc::SetArming { armed: true });
        exec(&mut ds, &Tc::SetOffboard { enabled: true });

        exec(&mut ds, &Tc::SetArming { armed: false });
        assert_eq!(
            ds.thrust_ctrl.output(),
            Some(comms_if::eqpt::usv::ThrustDems::neutral())
        );
    }

    #[test]
    fn test_sim_imu_updates_heading() {
        let mut ds = DataStore::default();

        let imu = ImuData {
            orientation: Quat::from_yaw(0.5),
            angular_rate_rads: [0.0, 0.0, 0.0],
        };
        assert_eq!(exec(&mut ds, &Tc::SimImu(imu)), TcResponse::Ok);

        let (yaw, received) = ds.heading_est.current();
        assert!(received);
        assert!((yaw - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_orientation_rejected() {
        let mut ds = DataStore::default();

        let imu = ImuData {
            orientation: Quat {
                x: 0.0,
                y: 0.0,
                z: 0.0,
                w: 0.0,
            },
            angular_rate_rads: [0.0, 0.0, 0.0],
        };
        assert_eq!(exec(&mut ds, &Tc::SimImu(imu)), TcResponse::Rejected);
        assert!(!ds.heading_est.current().1);
    }
}
