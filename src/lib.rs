//! # Motion control core library
//!
//! This library is the motion-control and trajectory core of a
//! differential-drive ground robot. It converts high level movement goals
//! (target displacement, target heading, target velocity profile) into
//! actuator voltage demands, and converts raw wheel/heading readings into a
//! continuously updated pose estimate.
//!
//! All physical values are `uom` quantities, so mixing incompatible units
//! (degrees where metres are expected, volts where seconds are expected) is a
//! compile error rather than a field failure.
//!
//! Hardware drivers, the operator dashboard and the autonomous sequencer are
//! external collaborators: they own sampling, actuation and loop timing, and
//! feed this library dimensioned readings at a fixed period.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Feedforward model - predicts the voltage needed for a target motion state
pub mod feedforward;

/// Localisation module - provides the robot with an idea of where it is in
/// the world
pub mod loc;

/// Logger initialisation - sets up the `log` facade for the embedding
/// application
pub mod logger;

/// Utility maths - error and angle calculations
pub mod maths;

/// Generic parameter file loading
pub mod params;

/// PID controller - closed loop voltage correction from error samples
pub mod pid;

/// Motion profile - time-indexed trapezoidal velocity profiles
pub mod profile;

/// Settlers - predicates deciding whether a control loop has converged
pub mod settle;

/// Units layer - dimension tags and quantity helpers over `uom`
pub mod units;
