//! # Units layer
//!
//! Everything in this library is expressed in `uom` quantities so that unit
//! confusion is a compile error. Controllers, settlers and profiles are
//! generic over a *motion dimension* - the linear axis (metres) or the
//! angular axis (degrees/radians) - with the time-derived quantities carried
//! along as associated types. Gains are dimensionless tuning scalars applied
//! in SI base units, which is what the conversion methods on [`MotionDim`]
//! are for.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::fmt::Debug;
use uom::si::acceleration::meter_per_second_squared;
use uom::si::angle::{degree, radian};
use uom::si::angular_acceleration::radian_per_second_squared;
use uom::si::angular_velocity::{degree_per_second, radian_per_second};
use uom::si::electric_potential::volt;
use uom::si::length::meter;
use uom::si::time::{millisecond, second};
use uom::si::velocity::meter_per_second;

// Re-exports
pub use uom::si::f64::{
    Acceleration, Angle, AngularAcceleration, AngularVelocity, ElectricPotential, Length, Time,
    Velocity,
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A physical dimension a mechanism can move along.
///
/// Binds together the displacement quantity and its first and second time
/// derivatives, plus conversions to and from SI base values (metres/radians,
/// and their per-second derivatives). Generic code works on base values
/// internally and only ever exposes the typed quantities.
pub trait MotionDim: Copy + Clone + Debug {
    /// Displacement along this dimension
    type Position: Copy + Clone + Debug + PartialEq + PartialOrd;

    /// First time derivative of the displacement
    type Velocity: Copy + Clone + Debug + PartialEq + PartialOrd;

    /// Second time derivative of the displacement
    type Acceleration: Copy + Clone + Debug + PartialEq + PartialOrd;

    /// The SI base value of a displacement
    fn position_si(position: Self::Position) -> f64;

    /// The SI base value of a velocity
    fn velocity_si(velocity: Self::Velocity) -> f64;

    /// The SI base value of an acceleration
    fn acceleration_si(acceleration: Self::Acceleration) -> f64;

    /// Build a displacement from an SI base value
    fn position_from_si(value: f64) -> Self::Position;

    /// Build a velocity from an SI base value
    fn velocity_from_si(value: f64) -> Self::Velocity;

    /// Build an acceleration from an SI base value
    fn acceleration_from_si(value: f64) -> Self::Acceleration;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The linear motion dimension (metres)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear;

/// The angular motion dimension (radians internally, degrees at the rim)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angular;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionDim for Linear {
    type Position = Length;
    type Velocity = Velocity;
    type Acceleration = Acceleration;

    fn position_si(position: Length) -> f64 {
        position.get::<meter>()
    }

    fn velocity_si(velocity: Velocity) -> f64 {
        velocity.get::<meter_per_second>()
    }

    fn acceleration_si(acceleration: Acceleration) -> f64 {
        acceleration.get::<meter_per_second_squared>()
    }

    fn position_from_si(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    fn velocity_from_si(value: f64) -> Velocity {
        Velocity::new::<meter_per_second>(value)
    }

    fn acceleration_from_si(value: f64) -> Acceleration {
        Acceleration::new::<meter_per_second_squared>(value)
    }
}

impl MotionDim for Angular {
    type Position = Angle;
    type Velocity = AngularVelocity;
    type Acceleration = AngularAcceleration;

    fn position_si(position: Angle) -> f64 {
        position.get::<radian>()
    }

    fn velocity_si(velocity: AngularVelocity) -> f64 {
        velocity.get::<radian_per_second>()
    }

    fn acceleration_si(acceleration: AngularAcceleration) -> f64 {
        acceleration.get::<radian_per_second_squared>()
    }

    fn position_from_si(value: f64) -> Angle {
        Angle::new::<radian>(value)
    }

    fn velocity_from_si(value: f64) -> AngularVelocity {
        AngularVelocity::new::<radian_per_second>(value)
    }

    fn acceleration_from_si(value: f64) -> AngularAcceleration {
        AngularAcceleration::new::<radian_per_second_squared>(value)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// A length in metres
pub fn meters(value: f64) -> Length {
    Length::new::<meter>(value)
}

/// A velocity in metres per second
pub fn meters_per_second(value: f64) -> Velocity {
    Velocity::new::<meter_per_second>(value)
}

/// An acceleration in metres per second squared
pub fn meters_per_second_squared(value: f64) -> Acceleration {
    Acceleration::new::<meter_per_second_squared>(value)
}

/// An angle in degrees
pub fn degrees(value: f64) -> Angle {
    Angle::new::<degree>(value)
}

/// An angle in radians
pub fn radians(value: f64) -> Angle {
    Angle::new::<radian>(value)
}

/// An angular velocity in degrees per second
pub fn degrees_per_second(value: f64) -> AngularVelocity {
    AngularVelocity::new::<degree_per_second>(value)
}

/// An angular acceleration in radians per second squared
pub fn radians_per_second_squared(value: f64) -> AngularAcceleration {
    AngularAcceleration::new::<radian_per_second_squared>(value)
}

/// A time in seconds
pub fn seconds(value: f64) -> Time {
    Time::new::<second>(value)
}

/// A time in milliseconds
pub fn milliseconds(value: f64) -> Time {
    Time::new::<millisecond>(value)
}

/// An electric potential in volts
pub fn volts(value: f64) -> ElectricPotential {
    ElectricPotential::new::<volt>(value)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
