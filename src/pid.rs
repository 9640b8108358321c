//! # PID controller
//!
//! A discrete PID controller producing a saturated voltage demand from error
//! samples. The controller is generic over the motion dimension it corrects,
//! so a linear drive controller takes metre errors and an angular one takes
//! degree errors, with no way to cross the two.
//!
//! Two behaviours matter to callers beyond the textbook P/I/D sum:
//!
//! - The integral accumulator is zeroed whenever the error changes sign, so
//!   windup built up on one side of the setpoint cannot drive an overshoot on
//!   the other side.
//! - The accumulator is clamped to the voltage bound *before* the current
//!   cycle's increment is added. A single cycle can therefore carry an
//!   integral term just beyond the bound; the saturation on the summed output
//!   still bounds what reaches the actuators.
//!
//! The controller has no internal clock. The caller supplies the sample
//! period on every update, and a non-positive period is rejected as a
//! contract violation rather than being allowed to poison the state with
//! NaNs.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::time::second;

// Internal
use crate::units::{volts, ElectricPotential, MotionDim, Time};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The gains for a PID controller.
///
/// Gains are dimensionless tuning scalars. Internally they are applied as
/// volts per SI base unit of the controlled dimension (and its time integral
/// and derivative), so the same numbers mean the same thing for a metre
/// controller and a radian controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain - how aggressively the controller responds to error
    pub kp: f64,

    /// Integral gain - how much the response grows while error persists
    pub ki: f64,

    /// Derivative gain - how much the response is damped by the error rate
    pub kd: f64,
}

/// Construction-time configuration for a PID controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    /// The tuning gains
    pub gains: PidGains,

    /// The saturation bound applied to the output and the integral
    /// accumulator
    #[serde(default = "default_max_voltage")]
    pub max_voltage: ElectricPotential,
}

/// A PID controller over one motion dimension.
#[derive(Debug, Clone)]
pub struct Pid<D: MotionDim> {
    gains: PidGains,
    max_voltage: ElectricPotential,

    p: ElectricPotential,
    i: ElectricPotential,
    d: ElectricPotential,

    last_error: D::Position,
    last_derivative: D::Velocity,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by a PID update.
#[derive(Debug, Error)]
pub enum PidError {
    /// The caller supplied a zero or negative sample period. The derivative
    /// is a division by the period, so this cannot be computed.
    #[error("update period must be positive, got {0} s")]
    NonPositivePeriod(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            gains: PidGains::default(),
            max_voltage: default_max_voltage(),
        }
    }
}

impl<D: MotionDim> Pid<D> {
    /// Create a new controller from the given configuration.
    pub fn new(config: PidConfig) -> Self {
        Self {
            gains: config.gains,
            max_voltage: config.max_voltage,
            p: volts(0f64),
            i: volts(0f64),
            d: volts(0f64),
            last_error: D::position_from_si(0f64),
            last_derivative: D::velocity_from_si(0f64),
        }
    }

    /// Reset all of the controller state.
    pub fn reset(&mut self) {
        self.p = volts(0f64);
        self.i = volts(0f64);
        self.d = volts(0f64);
        self.last_error = D::position_from_si(0f64);
        self.last_derivative = D::velocity_from_si(0f64);
    }

    /// Calculate the voltage demand for the given error sample.
    ///
    /// `period` is the interval since the previous update, supplied by the
    /// caller - the controller performs no timing of its own.
    pub fn update(
        &mut self,
        error: D::Position,
        period: Time,
    ) -> Result<ElectricPotential, PidError> {
        let period_s = period.get::<second>();
        if !(period_s > 0f64) {
            return Err(PidError::NonPositivePeriod(period_s));
        }

        let error_si = D::position_si(error);
        let last_error_si = D::position_si(self.last_error);
        let derivative_si = (error_si - last_error_si) / period_s;

        // Zero the accumulated integral when the error crosses the setpoint,
        // then bound the previous accumulation before adding this cycle's
        // increment. The increment itself is unbounded until the next cycle.
        if (error_si < 0f64) != (last_error_si < 0f64) {
            self.i = volts(0f64);
        }

        if self.i > self.max_voltage {
            self.i = self.max_voltage;
        } else if self.i < -self.max_voltage {
            self.i = -self.max_voltage;
        }

        self.p = volts(self.gains.kp * error_si);
        self.i += volts(self.gains.ki * error_si * period_s);
        self.d = volts(self.gains.kd * derivative_si);

        let mut output = self.p + self.i + self.d;
        if output > self.max_voltage {
            output = self.max_voltage;
        } else if output < -self.max_voltage {
            output = -self.max_voltage;
        }

        // State is written after the output so that the read accessors always
        // reflect the most recent update
        self.last_error = error;
        self.last_derivative = D::velocity_from_si(derivative_si);

        Ok(output)
    }

    /// Get the error from the most recent update.
    pub fn get_error(&self) -> D::Position {
        self.last_error
    }

    /// Get the error derivative from the most recent update.
    pub fn get_derivative(&self) -> D::Velocity {
        self.last_derivative
    }

    /// Get the current gains.
    pub fn get_gains(&self) -> PidGains {
        self.gains
    }

    /// Replace the gains, leaving the accumulated state untouched.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    /// Get the proportional term of the most recent update.
    pub fn get_p(&self) -> ElectricPotential {
        self.p
    }

    /// Get the integral term of the most recent update.
    pub fn get_i(&self) -> ElectricPotential {
        self.i
    }

    /// Get the derivative term of the most recent update.
    pub fn get_d(&self) -> ElectricPotential {
        self.d
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The conventional full-battery actuator bound.
fn default_max_voltage() -> ElectricPotential {
    volts(12f64)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
