//! # Settlers
//!
//! Predicates deciding whether a control loop has converged onto its target.
//! Two variants are provided, and a loop owns exactly one of each settler it
//! uses - they are not shared between concurrently running loops.
//!
//! [`ErrorDerivativeSettler`] is stateless: settled means the error and its
//! rate of change are both inside their tolerance bands. It treats the
//! all-exactly-zero sample as "the controller has not run yet" and reports
//! not settled, so a loop cannot terminate before its first cycle.
//!
//! [`ErrorTimeSettler`] requires the error to *stay* inside the band: it
//! accumulates the time spent below the threshold and only reports settled
//! once that time reaches the configured settle duration. Any excursion
//! outside the band aborts the attempt and zeroes the accumulated time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::units::{seconds, MotionDim, Time};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Settled when both the error and its derivative are within threshold.
#[derive(Debug, Clone)]
pub struct ErrorDerivativeSettler<D: MotionDim> {
    error_threshold: D::Position,
    derivative_threshold: D::Velocity,
}

/// Settled when the error has stayed within threshold for a minimum duration.
#[derive(Debug, Clone)]
pub struct ErrorTimeSettler<D: MotionDim> {
    error_threshold: D::Position,
    settle_time: Time,

    is_settling: bool,
    time_below_threshold: Time,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: MotionDim> ErrorDerivativeSettler<D> {
    /// Create a new settler from the acceptable error band and the
    /// acceptable error rate at settlement.
    pub fn new(error_threshold: D::Position, derivative_threshold: D::Velocity) -> Self {
        Self {
            error_threshold,
            derivative_threshold,
        }
    }

    /// Check if the controller has settled.
    ///
    /// Intended to be fed from the controller's own `get_error` and
    /// `get_derivative` accessors each cycle.
    pub fn is_settled(&self, error: D::Position, derivative: D::Velocity) -> bool {
        let error_si = D::position_si(error);
        let derivative_si = D::velocity_si(derivative);

        // Both exactly zero almost certainly means the controller has not
        // been updated yet
        if error_si == 0f64 && derivative_si == 0f64 {
            return false;
        }

        error_si.abs() <= D::position_si(self.error_threshold)
            && derivative_si.abs() <= D::velocity_si(self.derivative_threshold)
    }

    /// Reset the settler. This settler is stateless so this is a no-op,
    /// provided so both settlers present the same surface to loops.
    pub fn reset(&mut self) {}
}

impl<D: MotionDim> ErrorTimeSettler<D> {
    /// Create a new settler from the acceptable error band and the time the
    /// error must remain inside it.
    pub fn new(error_threshold: D::Position, settle_time: Time) -> Self {
        Self {
            error_threshold,
            settle_time,
            is_settling: false,
            time_below_threshold: seconds(0f64),
        }
    }

    /// Check if the controller has settled, accumulating `period` for every
    /// call spent inside the error band.
    ///
    /// The settler moves through three states: not settling while the error
    /// is outside the band, settling while inside it with the in-band time
    /// accumulating, and settled once that time reaches the settle time. An
    /// out-of-band sample while settling aborts back to not settling and the
    /// accumulated time is discarded.
    pub fn is_settled(&mut self, error: D::Position, period: Time) -> bool {
        let absolute_error = D::position_si(error).abs();
        let threshold = D::position_si(self.error_threshold);

        if self.is_settling {
            if absolute_error <= threshold {
                self.time_below_threshold += period;
            } else {
                self.is_settling = false;
                self.time_below_threshold = seconds(0f64);
            }
        }

        if !self.is_settling && absolute_error <= threshold {
            self.is_settling = true;
        }

        self.is_settling
            && self.time_below_threshold >= self.settle_time
            && absolute_error <= threshold
    }

    /// Reset all of the settler state.
    pub fn reset(&mut self) {
        self.is_settling = false;
        self.time_below_threshold = seconds(0f64);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
