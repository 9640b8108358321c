//! # Feedforward model
//!
//! An open-loop prediction of the voltage a mechanism needs to follow a
//! target velocity and acceleration, typically summed with a PID correction.
//! The model is the standard three-term one: a static friction term whose
//! sign follows the direction of travel, a back-EMF term proportional to
//! velocity, and an inertial term proportional to acceleration.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Internal
use crate::units::{volts, ElectricPotential, MotionDim};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The gains for a simple motor feedforward model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedforwardGains {
    /// The voltage needed to overcome static friction
    pub ks: f64,

    /// The voltage needed per unit of velocity to hold a cruise against back
    /// EMF and motion-induced friction
    pub kv: f64,

    /// The voltage needed per unit of acceleration
    pub ka: f64,
}

/// A feedforward model over one motion dimension.
#[derive(Debug, Clone)]
pub struct Feedforward<D: MotionDim> {
    gains: FeedforwardGains,
    _dim: PhantomData<D>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: MotionDim> Feedforward<D> {
    /// Create a new model with the given gains.
    pub fn new(gains: FeedforwardGains) -> Self {
        Self {
            gains,
            _dim: PhantomData,
        }
    }

    /// Calculate the voltage required to achieve the target velocity and
    /// acceleration.
    ///
    /// The static term follows the sign of the *velocity*, and contributes
    /// nothing at exactly zero velocity - a stationary target must not be
    /// pushed off its setpoint by a friction compensation in an arbitrary
    /// direction.
    pub fn calculate(
        &self,
        target_velocity: D::Velocity,
        target_acceleration: D::Acceleration,
    ) -> ElectricPotential {
        let velocity_si = D::velocity_si(target_velocity);
        let acceleration_si = D::acceleration_si(target_acceleration);

        let s = if velocity_si == 0f64 {
            0f64
        } else {
            self.gains.ks * velocity_si.signum()
        };
        let v = self.gains.kv * velocity_si;
        let a = self.gains.ka * acceleration_si;

        volts(s + v + a)
    }

    /// Get the current gains.
    pub fn get_gains(&self) -> FeedforwardGains {
        self.gains
    }

    /// Replace the gains.
    pub fn set_gains(&mut self, gains: FeedforwardGains) {
        self.gains = gains;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
