//! Yaw-speed controller for ThrustCtrl
//!
//! A PID controller with a hard clamp on the accumulated integral error
//! (anti-windup) and a low-pass filtered derivative term. The output is not
//! clamped here - saturation of the final actuator demands happens
//! downstream in the mixer.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::{clamp, sanitise};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The yaw-speed controller.
///
/// State persists across cycles: the integral error accumulates continuously
/// while the pipeline is live and is only cleared by [`YawSpeedController::reset`].
#[derive(Debug, Clone, Serialize)]
pub struct YawSpeedController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Low-pass coefficient applied to the raw derivative
    deriv_alpha: f64,

    /// Bound on the accumulated integral error
    antiwindup: f64,

    /// The integral accumulation
    integral: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// Filtered derivative of the error
    deriv_filt: f64,

    /// Last computed output
    last_output: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl YawSpeedController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, deriv_alpha: f64, antiwindup: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            deriv_alpha,
            antiwindup,
            integral: 0f64,
            prev_error: None,
            deriv_filt: 0f64,
            last_output: 0f64,
        }
    }

    /// Update the controller gains, preserving the accumulated state.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64, deriv_alpha: f64, antiwindup: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
        self.deriv_alpha = deriv_alpha;
        self.antiwindup = antiwindup;
    }

    /// Get the value of the controller for the given error and timestep.
    ///
    /// If `dt_s` is zero or negative the integral and derivative are not
    /// updated and only the proportional term is returned - accumulated
    /// state is held but contributes nothing on a degenerate timestep. A
    /// non-finite error contributes zero.
    pub fn step(&mut self, error: f64, dt_s: f64) -> f64 {
        let error = sanitise(error);

        if !(dt_s > 0.0 && dt_s.is_finite()) {
            self.prev_error = Some(error);
            self.last_output = sanitise(self.k_p * error);
            return self.last_output;
        }

        // Accumulate the integral term, clamped to the anti-windup bound so
        // that an arbitrarily long saturation cannot wind the controller up.
        let bound = self.antiwindup.abs();
        self.integral = clamp(&(self.integral + error * dt_s), &-bound, &bound);

        // Raw derivative, low-passed to keep sensor noise out of the output.
        // No previous error means no derivative.
        let raw_deriv = match self.prev_error {
            Some(e0) => (error - e0) / dt_s,
            None => 0f64,
        };
        self.deriv_filt =
            self.deriv_alpha * raw_deriv + (1.0 - self.deriv_alpha) * self.deriv_filt;

        self.prev_error = Some(error);

        let out = self.k_p * error + self.k_i * self.integral + self.k_d * self.deriv_filt;

        self.last_output = sanitise(out);
        self.last_output
    }

    /// Reset the controller to its initial state. Gains are preserved.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
        self.deriv_filt = 0f64;
        self.last_output = 0f64;
    }

    /// The current accumulated integral error.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// The last computed output.
    pub fn last_output(&self) -> f64 {
        self.last_output
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_proportional_only() {
        let mut ctrl = YawSpeedController::new(2.0, 0.0, 0.0, 0.1, 5.0);
        assert_relative_eq!(ctrl.step(0.5, 0.01), 1.0);
        assert_relative_eq!(ctrl.step(-0.25, 0.01), -0.5);
    }

    #[test]
    fn test_output_monotonic_in_error() {
        let base = YawSpeedController::new(1.5, 0.2, 0.0, 0.1, 5.0);

        // For fixed accumulated state the output must increase with the
        // error
        let mut prev = f64::NEG_INFINITY;
        for i in 0..100 {
            let e = -2.0 + 0.04 * i as f64;
            let mut ctrl = base.clone();
            let out = ctrl.step(e, 0.01);
            assert!(out > prev);
            prev = out;
        }
    }

    #[test]
    fn test_antiwindup_bound() {
        let mut ctrl = YawSpeedController::new(1.0, 1.0, 0.0, 0.1, 0.5);

        // A constant error sustained for a long simulated run must never
        // push the integral past the bound
        for _ in 0..100_000 {
            ctrl.step(10.0, 0.01);
            assert!(ctrl.integral().abs() <= 0.5);
        }
        assert_relative_eq!(ctrl.integral(), 0.5);

        // And the bound holds in the negative direction too
        for _ in 0..100_000 {
            ctrl.step(-10.0, 0.01);
            assert!(ctrl.integral().abs() <= 0.5);
        }
        assert_relative_eq!(ctrl.integral(), -0.5);
    }

    #[test]
    fn test_zero_dt_skips_integration() {
        let mut ctrl = YawSpeedController::new(1.0, 1.0, 0.0, 0.1, 5.0);

        let out = ctrl.step(0.3, 0.0);
        assert_relative_eq!(out, 0.3);
        assert_relative_eq!(ctrl.integral(), 0.0);

        let out = ctrl.step(0.3, -1.0);
        assert_relative_eq!(out, 0.3);
        assert_relative_eq!(ctrl.integral(), 0.0);
    }

    #[test]
    fn test_degenerate_dt_returns_proportional_only() {
        let mut ctrl = YawSpeedController::new(1.0, 1.0, 0.0, 0.1, 5.0);

        // Wind the integral up with a sustained error
        for _ in 0..100 {
            ctrl.step(1.0, 0.01);
        }
        assert_relative_eq!(ctrl.integral(), 1.0, epsilon = 1e-9);

        // A degenerate timestep yields the proportional term alone - the
        // accumulated integral is held but must not reach the output
        let out = ctrl.step(0.5, 0.0);
        assert_relative_eq!(out, 0.5);

        // The held integral contributes again on the next valid timestep
        let out = ctrl.step(0.0, 0.01);
        assert_relative_eq!(out, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_error_contributes_zero() {
        let mut ctrl = YawSpeedController::new(1.0, 1.0, 0.0, 0.1, 5.0);

        assert_relative_eq!(ctrl.step(f64::NAN, 0.01), 0.0);
        assert_relative_eq!(ctrl.step(f64::INFINITY, 0.01), 0.0);
        assert_relative_eq!(ctrl.integral(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut ctrl = YawSpeedController::new(1.0, 1.0, 0.0, 0.1, 5.0);

        for _ in 0..100 {
            ctrl.step(1.0, 0.01);
        }
        assert!(ctrl.integral() > 0.0);

        ctrl.reset();
        assert_relative_eq!(ctrl.integral(), 0.0);
        assert_relative_eq!(ctrl.last_output(), 0.0);

        // First step after reset starts from a clean integral
        let out = ctrl.step(0.5, 0.01);
        assert_relative_eq!(out, 0.5 + 0.5 * 0.01);
    }
}
