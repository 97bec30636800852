//! # Platform state machine module
//!
//! Tracks the armed/disarmed and manual/offboard status of the platform
//! along with the active control mode descriptor. The thrust control module
//! only produces a live actuator demand while the platform is armed, under
//! offboard control, and in a supported control mode - in every other state
//! the neutral demand is emitted.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;
use thiserror::Error;

// Internal
use comms_if::mode::ControlMode;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Platform state - arming status plus the active control mode.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct PlatState {
    arming: ArmingState,
    control_mode: Option<ControlMode>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The arming state of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArmingState {
    /// Actuators de-energised, no commands accepted.
    Disarmed,

    /// Armed under manual control.
    ArmedManual,

    /// Armed under offboard (external computer) control.
    ArmedOffboard,
}

/// An invalid state transition request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatStateError {
    #[error("Offboard control can only be changed while armed")]
    NotArmed,

    #[error("The requested control mode is not supported by this platform: {0:?}")]
    UnsupportedMode(ControlMode),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmingState {
    fn default() -> Self {
        ArmingState::Disarmed
    }
}

impl PlatState {
    /// Request the platform be armed or disarmed.
    ///
    /// Arming from `Disarmed` enters `ArmedManual`. Disarming is accepted
    /// from any state. Re-arming while already armed is a no-op.
    pub fn set_armed(&mut self, armed: bool) {
        let new = match (armed, self.arming) {
            (true, ArmingState::Disarmed) => ArmingState::ArmedManual,
            (true, current) => current,
            (false, _) => ArmingState::Disarmed,
        };

        if new != self.arming {
            info!("Platform arming state: {:?} -> {:?}", self.arming, new);
            self.arming = new;
        }
    }

    /// Request offboard control be enabled or disabled.
    ///
    /// Only meaningful while armed - requests while disarmed are rejected
    /// and the state is unchanged.
    pub fn set_offboard(&mut self, enabled: bool) -> Result<(), PlatStateError> {
        let new = match (enabled, self.arming) {
            (_, ArmingState::Disarmed) => return Err(PlatStateError::NotArmed),
            (true, _) => ArmingState::ArmedOffboard,
            (false, _) => ArmingState::ArmedManual,
        };

        if new != self.arming {
            info!("Platform arming state: {:?} -> {:?}", self.arming, new);
            self.arming = new;
        }

        Ok(())
    }

    /// Request a new control mode.
    ///
    /// The requested mode is validated against the set of combinations this
    /// platform supports; an unsupported mode is rejected and the active
    /// mode is unchanged.
    pub fn set_control_mode(&mut self, mode: &ControlMode) -> Result<(), PlatStateError> {
        if !mode.is_supported() {
            return Err(PlatStateError::UnsupportedMode(*mode));
        }

        info!("Control mode set: {:?}", mode);
        self.control_mode = Some(*mode);

        Ok(())
    }

    /// The current arming state.
    pub fn arming(&self) -> ArmingState {
        self.arming
    }

    /// The active control mode, or `None` if no mode has been accepted yet.
    pub fn control_mode(&self) -> Option<ControlMode> {
        self.control_mode
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::mode::{AltitudeMode, ReferenceFrame, YawMode};

    fn supported_mode() -> ControlMode {
        ControlMode {
            frame: ReferenceFrame::BodyFlu,
            yaw_mode: YawMode::Rate,
            altitude_mode: AltitudeMode::None,
        }
    }

    #[test]
    fn test_arming_transitions() {
        let mut state = PlatState::default();
        assert_eq!(state.arming(), ArmingState::Disarmed);

        state.set_armed(true);
        assert_eq!(state.arming(), ArmingState::ArmedManual);

        state.set_offboard(true).unwrap();
        assert_eq!(state.arming(), ArmingState::ArmedOffboard);

        // Re-arming while armed offboard does not drop back to manual
        state.set_armed(true);
        assert_eq!(state.arming(), ArmingState::ArmedOffboard);

        state.set_offboard(false).unwrap();
        assert_eq!(state.arming(), ArmingState::ArmedManual);

        state.set_armed(false);
        assert_eq!(state.arming(), ArmingState::Disarmed);
    }

    #[test]
    fn test_offboard_requires_armed() {
        let mut state = PlatState::default();
        assert_eq!(state.set_offboard(true), Err(PlatStateError::NotArmed));
        assert_eq!(state.arming(), ArmingState::Disarmed);
    }

    #[test]
    fn test_mode_acceptance() {
        let mut state = PlatState::default();
        assert!(state.control_mode().is_none());

        state.set_control_mode(&supported_mode()).unwrap();
        assert_eq!(state.control_mode(), Some(supported_mode()));
    }

    #[test]
    fn test_unsupported_mode_rejected() {
        let mut state = PlatState::default();
        state.set_control_mode(&supported_mode()).unwrap();

        let bad = ControlMode {
            altitude_mode: AltitudeMode::AltitudeHold,
            ..supported_mode()
        };
        assert!(state.set_control_mode(&bad).is_err());

        // Active mode unchanged by the rejected request
        assert_eq!(state.control_mode(), Some(supported_mode()));
    }
}
