//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value between a minimum and maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Replace a non-finite (NaN or infinite) value with zero.
///
/// Used to stop numeric degeneracy in one term of a control calculation from
/// propagating into an actuator demand.
pub fn sanitise<T>(value: T) -> T
where
    T: Float,
{
    if value.is_finite() {
        value
    } else {
        T::zero()
    }
}

/// Wrap an angle into the range (-pi, pi].
///
/// The positive bound is closed so that an input of exactly pi (or -pi) maps
/// to pi.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    pi_t - rem_euclid(pi_t - angle, tau_t)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0f64)).abs() < 1e-12);
        assert!((wrap_pi(PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(-PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((wrap_pi(5.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(0.1f64) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_sanitise() {
        assert_eq!(sanitise(1.5f64), 1.5);
        assert_eq!(sanitise(f64::NAN), 0.0);
        assert_eq!(sanitise(f64::INFINITY), 0.0);
        assert_eq!(sanitise(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&2f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-2f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.5f64, &-1f64, &1f64), 0.5f64);
    }
}
