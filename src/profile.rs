//! # Trapezoidal motion profile
//!
//! A time-optimal velocity profile for a single linear or angular
//! displacement: accelerate at a constant rate, coast at the maximum
//! velocity, decelerate at a constant rate. When the displacement is too
//! short to ever reach the maximum velocity the profile degenerates to a
//! triangle, with the peak ("transition") velocity solved analytically from
//! the asymmetric acceleration and deceleration limits.
//!
//! The profile is immutable once constructed. The three stage cutoff times
//! and the total time are derived at construction and never recomputed; a
//! query at elapsed time `t` classifies `t` against the cutoffs and
//! evaluates the closed-form kinematic equations of that stage, with
//! integration constants chosen so position is continuous across every stage
//! boundary even though acceleration is not.
//!
//! Requested distances may be negative: the internal maths runs on the
//! magnitude and every setpoint is negated at query time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use thiserror::Error;
use uom::si::time::second;

// Internal
use crate::units::{seconds, MotionDim, Time};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The stage a profile is in at a given elapsed time.
///
/// Stages are ordered, and classification is by strict comparison against
/// the cutoffs, so a query landing exactly on a cutoff belongs to the later
/// stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileStage {
    Accelerating,
    Coasting,
    Decelerating,
    Done,
}

/// Errors raised when a profile is constructed from physically inconsistent
/// limits.
///
/// These are reported at construction so a bad profile can never be queried
/// into NaN setpoints mid-motion. Values are in SI base units.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("max_acceleration must be positive, got {0}")]
    NonPositiveAcceleration(f64),

    #[error("max_deceleration must be positive, got {0}")]
    NonPositiveDeceleration(f64),

    #[error("max_velocity must be positive, got {0}")]
    NonPositiveVelocity(f64),

    #[error("total_distance must be finite, got {0}")]
    NonFiniteDistance(f64),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The motion state a profile demands at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSetpoint<D: MotionDim> {
    pub position: D::Position,
    pub velocity: D::Velocity,
    pub acceleration: D::Acceleration,
}

/// A trapezoidal (or degenerate triangular) motion profile.
#[derive(Debug, Clone)]
pub struct TrapezoidProfile<D: MotionDim> {
    max_acceleration: D::Acceleration,
    max_deceleration: D::Acceleration,
    max_velocity: D::Velocity,

    /// Magnitude of the requested displacement
    total_distance: D::Position,

    /// Negate setpoints at query time for a negative requested displacement
    invert: bool,

    accel_cutoff: Time,
    coast_cutoff: Time,
    decel_cutoff: Time,
    total_time: Time,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: MotionDim> TrapezoidProfile<D> {
    /// Build a profile covering `total_distance` within the given kinematic
    /// limits.
    ///
    /// All three limits must be strictly positive magnitudes; the distance
    /// may be of either sign, or zero, which yields an immediately-done
    /// profile.
    pub fn new(
        max_acceleration: D::Acceleration,
        max_deceleration: D::Acceleration,
        max_velocity: D::Velocity,
        total_distance: D::Position,
    ) -> Result<Self, ProfileError> {
        let accel_si = D::acceleration_si(max_acceleration);
        let decel_si = D::acceleration_si(max_deceleration);
        let velocity_si = D::velocity_si(max_velocity);
        let distance_si = D::position_si(total_distance);

        if !(accel_si > 0f64) {
            return Err(ProfileError::NonPositiveAcceleration(accel_si));
        }
        if !(decel_si > 0f64) {
            return Err(ProfileError::NonPositiveDeceleration(decel_si));
        }
        if !(velocity_si > 0f64) {
            return Err(ProfileError::NonPositiveVelocity(velocity_si));
        }
        if !distance_si.is_finite() {
            return Err(ProfileError::NonFiniteDistance(distance_si));
        }

        let invert = distance_si < 0f64;
        let distance = distance_si.abs();

        // Assume both ramps reach the maximum velocity, in which case the
        // two legs are symmetric in time and distance
        let mut accel_time = velocity_si / accel_si;
        let mut decel_time = accel_time;
        let accel_distance = 0.5 * accel_si * accel_time * accel_time;

        let mut coast_distance = distance - 2f64 * accel_distance;

        // A negative coast distance means the cruise velocity is unreachable:
        // solve the triangular profile for the transition velocity the two
        // asymmetric ramps can meet at
        if coast_distance < 0f64 {
            let transition_velocity =
                ((2f64 * distance * accel_si * decel_si) / (accel_si + decel_si)).sqrt();

            accel_time = transition_velocity / accel_si;
            decel_time = transition_velocity / decel_si;
            coast_distance = 0f64;
        }

        let coast_time = coast_distance / velocity_si;
        let total_time = accel_time + coast_time + decel_time;

        debug!(
            "Motion profile over {:.4}: accel {:.4} s, coast {:.4} s, decel {:.4} s, total {:.4} s",
            distance, accel_time, coast_time, decel_time, total_time
        );

        Ok(Self {
            max_acceleration,
            max_deceleration,
            max_velocity,
            total_distance: D::position_from_si(distance),
            invert,
            accel_cutoff: seconds(accel_time),
            coast_cutoff: seconds(accel_time + coast_time),
            decel_cutoff: seconds(total_time),
            total_time: seconds(total_time),
        })
    }

    /// Classify an elapsed time into the stage the profile is in.
    pub fn stage(&self, elapsed_time: Time) -> ProfileStage {
        if elapsed_time < self.accel_cutoff {
            ProfileStage::Accelerating
        } else if elapsed_time < self.coast_cutoff {
            ProfileStage::Coasting
        } else if elapsed_time < self.decel_cutoff {
            ProfileStage::Decelerating
        } else {
            ProfileStage::Done
        }
    }

    /// Calculate the setpoint for an elapsed time.
    ///
    /// Positions are measured from the start of the motion, so `calculate`
    /// at or beyond the total time returns the full signed displacement with
    /// zero velocity and acceleration.
    pub fn calculate(&self, elapsed_time: Time) -> ProfileSetpoint<D> {
        let t = elapsed_time.get::<second>();
        let accel_cutoff = self.accel_cutoff.get::<second>();
        let coast_cutoff = self.coast_cutoff.get::<second>();
        let total_time = self.total_time.get::<second>();

        let accel_si = D::acceleration_si(self.max_acceleration);
        let distance = D::position_si(self.total_distance);

        // The velocity at the end of the acceleration ramp. For a full
        // trapezoid this is the maximum velocity; for a triangle it is the
        // transition velocity.
        let peak_velocity = accel_si * accel_cutoff;

        // The deceleration ramp rate recovered from the cutoffs. This equals
        // the acceleration rate for a symmetric trapezoid and the configured
        // deceleration limit for a triangle.
        let decel_duration = total_time - coast_cutoff;
        let decel_si = if decel_duration > 0f64 {
            peak_velocity / decel_duration
        } else {
            0f64
        };

        let (position, velocity, acceleration) = match self.stage(elapsed_time) {
            ProfileStage::Accelerating => {
                (0.5 * accel_si * t * t, accel_si * t, accel_si)
            }
            ProfileStage::Coasting => {
                // Integration constant matching the end of the ramp
                let coast_const = 0.5 * accel_si * accel_cutoff * accel_cutoff
                    - peak_velocity * accel_cutoff;

                (peak_velocity * t + coast_const, peak_velocity, 0f64)
            }
            ProfileStage::Decelerating => {
                // Integration constant matching the end of the coast
                let coast_end_position = 0.5 * accel_si * accel_cutoff * accel_cutoff
                    + peak_velocity * (coast_cutoff - accel_cutoff);
                let decel_const = coast_end_position
                    - decel_si * (total_time * coast_cutoff - 0.5 * coast_cutoff * coast_cutoff);

                (
                    decel_si * (total_time * t - 0.5 * t * t) + decel_const,
                    decel_si * (total_time - t),
                    -decel_si,
                )
            }
            ProfileStage::Done => (distance, 0f64, 0f64),
        };

        let sign = if self.invert { -1f64 } else { 1f64 };

        ProfileSetpoint {
            position: D::position_from_si(sign * position),
            velocity: D::velocity_from_si(sign * velocity),
            acceleration: D::acceleration_from_si(sign * acceleration),
        }
    }

    /// Get the total duration of the profile.
    pub fn get_total_time(&self) -> Time {
        self.total_time
    }

    /// Get the acceleration limit the profile was built with.
    pub fn get_max_acceleration(&self) -> D::Acceleration {
        self.max_acceleration
    }

    /// Get the deceleration limit the profile was built with.
    pub fn get_max_deceleration(&self) -> D::Acceleration {
        self.max_deceleration
    }

    /// Get the velocity limit the profile was built with.
    pub fn get_max_velocity(&self) -> D::Velocity {
        self.max_velocity
    }

    /// Get the signed displacement the profile covers.
    pub fn get_total_distance(&self) -> D::Position {
        let distance = D::position_si(self.total_distance);
        if self.invert {
            D::position_from_si(-distance)
        } else {
            D::position_from_si(distance)
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::{
        degrees, meters, meters_per_second, meters_per_second_squared,
        radians_per_second_squared, Angular, Linear,
    };
    use uom::si::acceleration::meter_per_second_squared;
    use uom::si::angle::degree;
    use uom::si::length::meter;
    use uom::si::velocity::meter_per_second;

    /// 1 m/s^2 ramps, 1 m/s cruise, 10 m: accel/decel legs of 1 s and 0.5 m
    /// each, 9 m of coast
    fn full_trapezoid() -> TrapezoidProfile<Linear> {
        TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(1.0),
            meters_per_second(1.0),
            meters(10.0),
        )
        .unwrap()
    }

    /// 2 m/s^2 up, 1 m/s^2 down, distance too short to reach 10 m/s:
    /// triangular with a 2 m/s transition velocity, 1 s up, 2 s down
    fn asymmetric_triangle() -> TrapezoidProfile<Linear> {
        TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(2.0),
            meters_per_second_squared(1.0),
            meters_per_second(10.0),
            meters(3.0),
        )
        .unwrap()
    }

    #[test]
    fn test_inconsistent_limits_are_rejected() {
        assert!(TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(0.0),
            meters_per_second_squared(1.0),
            meters_per_second(1.0),
            meters(1.0),
        )
        .is_err());

        assert!(TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(-2.0),
            meters_per_second(1.0),
            meters(1.0),
        )
        .is_err());

        assert!(TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(1.0),
            meters_per_second(0.0),
            meters(1.0),
        )
        .is_err());

        assert!(TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(1.0),
            meters_per_second(1.0),
            meters(f64::NAN),
        )
        .is_err());
    }

    #[test]
    fn test_full_trapezoid_timing() {
        let profile = full_trapezoid();
        assert!((profile.get_total_time().get::<second>() - 11.0).abs() < 1e-12);

        assert_eq!(profile.stage(seconds(0.5)), ProfileStage::Accelerating);
        assert_eq!(profile.stage(seconds(5.0)), ProfileStage::Coasting);
        assert_eq!(profile.stage(seconds(10.5)), ProfileStage::Decelerating);
        assert_eq!(profile.stage(seconds(11.0)), ProfileStage::Done);

        // A tie on a cutoff belongs to the later stage
        assert_eq!(profile.stage(seconds(1.0)), ProfileStage::Coasting);
        assert_eq!(profile.stage(seconds(10.0)), ProfileStage::Decelerating);
    }

    #[test]
    fn test_full_trapezoid_setpoints() {
        let profile = full_trapezoid();

        let start = profile.calculate(seconds(0.0));
        assert_eq!(start.position.get::<meter>(), 0.0);
        assert_eq!(start.velocity.get::<meter_per_second>(), 0.0);

        let mid_ramp = profile.calculate(seconds(0.5));
        assert!((mid_ramp.position.get::<meter>() - 0.125).abs() < 1e-12);
        assert!((mid_ramp.velocity.get::<meter_per_second>() - 0.5).abs() < 1e-12);
        assert!((mid_ramp.acceleration.get::<meter_per_second_squared>() - 1.0).abs() < 1e-12);

        let coasting = profile.calculate(seconds(6.0));
        assert!((coasting.position.get::<meter>() - 5.5).abs() < 1e-12);
        assert!((coasting.velocity.get::<meter_per_second>() - 1.0).abs() < 1e-12);
        assert_eq!(coasting.acceleration.get::<meter_per_second_squared>(), 0.0);

        let braking = profile.calculate(seconds(10.5));
        assert!((braking.position.get::<meter>() - 9.875).abs() < 1e-12);
        assert!((braking.velocity.get::<meter_per_second>() - 0.5).abs() < 1e-12);
        assert!((braking.acceleration.get::<meter_per_second_squared>() + 1.0).abs() < 1e-12);

        let done = profile.calculate(seconds(11.0));
        assert_eq!(done.position.get::<meter>(), 10.0);
        assert_eq!(done.velocity.get::<meter_per_second>(), 0.0);
        assert_eq!(done.acceleration.get::<meter_per_second_squared>(), 0.0);
    }

    #[test]
    fn test_asymmetric_triangle_is_continuous() {
        let profile = asymmetric_triangle();

        // v_peak = sqrt(2 * 3 * 2 * 1 / 3) = 2 m/s: 1 s up, 2 s down
        assert!((profile.get_total_time().get::<second>() - 3.0).abs() < 1e-12);
        assert_eq!(profile.stage(seconds(1.5)), ProfileStage::Decelerating);

        // No discontinuity across the accel/decel boundary
        let before = profile.calculate(seconds(1.0 - 1e-9));
        let after = profile.calculate(seconds(1.0 + 1e-9));
        assert!((before.position.get::<meter>() - after.position.get::<meter>()).abs() < 1e-6);
        assert!((before.velocity.get::<meter_per_second>() - 2.0).abs() < 1e-6);
        assert!((after.velocity.get::<meter_per_second>() - 2.0).abs() < 1e-6);

        // Deceleration runs at the configured asymmetric limit
        assert!((after.acceleration.get::<meter_per_second_squared>() + 1.0).abs() < 1e-9);

        // Midway down the long ramp
        let braking = profile.calculate(seconds(2.0));
        assert!((braking.velocity.get::<meter_per_second>() - 1.0).abs() < 1e-12);
        assert!((braking.position.get::<meter>() - 2.5).abs() < 1e-12);

        let done = profile.calculate(seconds(3.0));
        assert_eq!(done.position.get::<meter>(), 3.0);
        assert_eq!(done.velocity.get::<meter_per_second>(), 0.0);
    }

    #[test]
    fn test_reports_configured_limits() {
        let profile = asymmetric_triangle();

        assert_eq!(
            profile.get_max_acceleration(),
            meters_per_second_squared(2.0)
        );
        assert_eq!(
            profile.get_max_deceleration(),
            meters_per_second_squared(1.0)
        );
        assert_eq!(profile.get_max_velocity(), meters_per_second(10.0));
        assert_eq!(profile.get_total_distance(), meters(3.0));
    }

    #[test]
    fn test_negative_distance_inverts_setpoints() {
        let profile = TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(1.0),
            meters_per_second(1.0),
            meters(-10.0),
        )
        .unwrap();

        let mid_ramp = profile.calculate(seconds(0.5));
        assert!((mid_ramp.position.get::<meter>() + 0.125).abs() < 1e-12);
        assert!((mid_ramp.velocity.get::<meter_per_second>() + 0.5).abs() < 1e-12);
        assert!((mid_ramp.acceleration.get::<meter_per_second_squared>() + 1.0).abs() < 1e-12);

        let done = profile.calculate(seconds(11.0));
        assert_eq!(done.position.get::<meter>(), -10.0);
        assert_eq!(done.velocity.get::<meter_per_second>(), 0.0);

        assert_eq!(profile.get_total_distance(), meters(-10.0));
    }

    #[test]
    fn test_stage_is_monotonic_over_time() {
        let profile = asymmetric_triangle();
        let total = profile.get_total_time().get::<second>();

        let mut last = ProfileStage::Accelerating;
        let mut t = 0.0;
        while t < total + 0.5 {
            let stage = profile.stage(seconds(t));
            assert!(stage >= last, "stage regressed at t = {}", t);
            last = stage;
            t += 0.01;
        }
        assert_eq!(last, ProfileStage::Done);
    }

    #[test]
    fn test_velocity_integrates_to_position() {
        // Trapezoidal-rule integration of the velocity samples reproduces
        // the commanded displacement for both profile shapes
        for profile in &[full_trapezoid(), asymmetric_triangle()] {
            let total = profile.get_total_time().get::<second>();
            let dt = 1e-3;

            let mut integral = 0.0;
            let mut previous = profile.calculate(seconds(0.0)).velocity.get::<meter_per_second>();
            let mut t = dt;
            while t <= total {
                let current = profile.calculate(seconds(t)).velocity.get::<meter_per_second>();
                integral += 0.5 * (previous + current) * dt;
                previous = current;
                t += dt;
            }

            let commanded = profile.calculate(seconds(total)).position.get::<meter>();
            assert!(
                (integral - commanded).abs() < 1e-4,
                "integral {} vs commanded {}",
                integral,
                commanded
            );
        }
    }

    #[test]
    fn test_zero_distance_is_immediately_done() {
        let profile = TrapezoidProfile::<Linear>::new(
            meters_per_second_squared(1.0),
            meters_per_second_squared(1.0),
            meters_per_second(1.0),
            meters(0.0),
        )
        .unwrap();

        assert_eq!(profile.get_total_time().get::<second>(), 0.0);
        assert_eq!(profile.stage(seconds(0.0)), ProfileStage::Done);
        assert_eq!(profile.calculate(seconds(0.0)).position.get::<meter>(), 0.0);
    }

    #[test]
    fn test_angular_profile() {
        let profile = TrapezoidProfile::<Angular>::new(
            radians_per_second_squared(2.0),
            radians_per_second_squared(2.0),
            crate::units::degrees_per_second(90.0),
            degrees(90.0),
        )
        .unwrap();

        let done = profile.calculate(profile.get_total_time());
        assert!((done.position.get::<degree>() - 90.0).abs() < 1e-9);
    }
}
