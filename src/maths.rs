//! Utility maths functions - error and angle calculations
//!
//! These are the pure functions control loops use to turn a target and a
//! sensor reading into an error sample. Angular errors always take the
//! shortest path around the circle, so a target of 10 deg seen from a heading
//! of 350 deg is an error of +20 deg, not -340 deg.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use num_traits::Float;
use std::ops::Add;
use uom::si::angle::degree;

// Internal
use crate::units::{degrees, Angle, Length};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the error between a target displacement and the current reading.
pub fn linear_error(target: Length, reading: Length) -> Length {
    target - reading
}

/// Reduce an angle into the range [0, 360) degrees.
pub fn sanitize_angle(angle: Angle) -> Angle {
    degrees(rem_euclid(angle.get::<degree>(), 360f64))
}

/// Fold an angle into the range (-180, +180] degrees.
///
/// Exact half turns map to +180, not -180.
pub fn wrap_angle(angle: Angle) -> Angle {
    degrees(180f64 - rem_euclid(180f64 - angle.get::<degree>(), 360f64))
}

/// Get the shortest signed angular error between a target and the current
/// reading.
///
/// The target is sanitised before the difference is taken, and the result is
/// folded into (-180, +180] degrees.
pub fn angular_error(target: Angle, reading: Angle) -> Angle {
    wrap_angle(sanitize_angle(target) - reading)
}

/// Convert a relative target into an absolute one given the starting reading.
pub fn relative_target<T>(start: T, target: T) -> T
where
    T: Add<Output = T>,
{
    start + target
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::meters;

    fn assert_angle_eq(actual: Angle, expected_deg: f64) {
        let actual_deg = actual.get::<degree>();
        assert!(
            (actual_deg - expected_deg).abs() < 1e-9,
            "expected {} deg, got {} deg",
            expected_deg,
            actual_deg
        );
    }

    #[test]
    fn test_linear_error() {
        assert_eq!(linear_error(meters(2.0), meters(0.5)), meters(1.5));
        assert_eq!(linear_error(meters(-1.0), meters(1.0)), meters(-2.0));
    }

    #[test]
    fn test_sanitize_angle() {
        assert_angle_eq(sanitize_angle(degrees(0.0)), 0.0);
        assert_angle_eq(sanitize_angle(degrees(360.0)), 0.0);
        assert_angle_eq(sanitize_angle(degrees(370.0)), 10.0);
        assert_angle_eq(sanitize_angle(degrees(-10.0)), 350.0);
        assert_angle_eq(sanitize_angle(degrees(-730.0)), 350.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert_angle_eq(wrap_angle(degrees(0.0)), 0.0);
        assert_angle_eq(wrap_angle(degrees(190.0)), -170.0);
        assert_angle_eq(wrap_angle(degrees(-190.0)), 170.0);

        // half turns stay on the positive side
        assert_angle_eq(wrap_angle(degrees(180.0)), 180.0);
        assert_angle_eq(wrap_angle(degrees(-180.0)), 180.0);
    }

    #[test]
    fn test_angular_error_takes_shortest_path() {
        assert_angle_eq(angular_error(degrees(10.0), degrees(350.0)), 20.0);
        assert_angle_eq(angular_error(degrees(350.0), degrees(10.0)), -20.0);
        assert_angle_eq(angular_error(degrees(90.0), degrees(90.0)), 0.0);

        // the target is sanitised first, the reading is taken as-is
        assert_angle_eq(angular_error(degrees(370.0), degrees(350.0)), 20.0);
        assert_angle_eq(angular_error(degrees(180.0), degrees(0.0)), 180.0);
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(relative_target(meters(1.0), meters(0.5)), meters(1.5));
        assert_angle_eq(relative_target(degrees(90.0), degrees(-30.0)), 60.0);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(5.0f64, 3.0), 2.0);
        assert_eq!(rem_euclid(-1.0f64, 3.0), 2.0);
        assert_eq!(rem_euclid(-3.0f64, 3.0), 0.0);
    }
}
