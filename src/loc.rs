//! # Localisation module
//!
//! Provides the robot with an idea of where it is in the world by
//! integrating per-cycle wheel and heading readings into a 2D pose.
//!
//! Integration is arc based rather than linear: when the heading changed
//! between samples the motion is modelled as a circular arc, the local
//! displacement is scaled by the chord correction `2 sin(dtheta/2) / dtheta`,
//! and the lateral component is corrected for the fore/aft offset of the
//! horizontal tracking wheel from the turning centre. The corrected local
//! displacement is rotated into the global frame about the *average* heading
//! over the interval, which materially improves accuracy through curves over
//! integrating at either endpoint heading.
//!
//! One periodic task owns the `update` call; any number of tasks may query
//! the pose concurrently. The whole tracking state lives behind a single
//! mutex, and every operation locks it for its full duration, so readers can
//! never observe a torn pose.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uom::si::angle::radian;

// Internal
use crate::maths::wrap_angle;
use crate::units::{degrees, meters, Angle, Length};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2d {
    /// The x component of the pose
    pub x: Length,

    /// The y component of the pose
    pub y: Length,

    /// The heading of the pose. Accumulated without wrapping, so a full
    /// clockwise lap reads 360 deg, not 0
    pub theta: Angle,
}

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2d {
    /// The x component of the point
    pub x: Length,

    /// The y component of the point
    pub y: Length,
}

/// The pose estimator.
///
/// Owns the single source of truth for the robot's position. The estimator
/// is `Send + Sync`; clones of an `Arc<Odometry>` are shared between the
/// localisation task and any readers.
#[derive(Debug)]
pub struct Odometry {
    /// Fore/aft offset of the horizontal tracking wheel from the turning
    /// centre
    horizontal_wheel_offset: Length,

    shared: Mutex<TrackingState>,
}

/// State guarded by the estimator's mutex.
#[derive(Debug, Clone, Copy)]
struct TrackingState {
    position: Pose2d,

    previous_forward: Length,
    previous_horizontal: Length,
    previous_theta: Angle,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2d {
    /// Create a new pose.
    pub fn new(x: Length, y: Length, theta: Angle) -> Self {
        Self { x, y, theta }
    }
}

impl Vector2d {
    /// Create a new point.
    pub fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }
}

impl Odometry {
    /// Create a new estimator at the origin.
    ///
    /// `horizontal_wheel_offset` is zero for robots without a horizontal
    /// tracking wheel.
    pub fn new(horizontal_wheel_offset: Length) -> Self {
        Self {
            horizontal_wheel_offset,
            shared: Mutex::new(TrackingState {
                position: Pose2d::default(),
                previous_forward: meters(0f64),
                previous_horizontal: meters(0f64),
                previous_theta: degrees(0f64),
            }),
        }
    }

    /// Update the tracking state from the current cumulative sensor
    /// readings.
    ///
    /// `left_displacement` and `right_displacement` are the total linear
    /// displacements of each side of the chassis, `horizontal_displacement`
    /// the total displacement of the horizontal tracking wheel, and
    /// `heading` the current absolute heading. Deltas since the previous
    /// call are derived internally.
    pub fn update(
        &self,
        left_displacement: Length,
        right_displacement: Length,
        horizontal_displacement: Length,
        heading: Angle,
    ) {
        let mut shared = self.lock();

        let current_forward = (left_displacement + right_displacement) / 2f64;
        let current_horizontal = horizontal_displacement;
        let current_theta = heading;

        let delta_forward = current_forward - shared.previous_forward;
        let delta_horizontal = current_horizontal - shared.previous_horizontal;
        let delta_theta = current_theta - shared.previous_theta;

        let mut local_x = delta_forward;
        let mut local_y = delta_horizontal;

        // A zero heading delta is the expected straight-line case, the arc
        // correction below would divide by it
        let delta_theta_rad = delta_theta.get::<radian>();
        if delta_theta_rad != 0f64 {
            // chord = 2 sin(dtheta / 2) * radius
            let arc_to_line = 2f64 * (delta_theta_rad / 2f64).sin();

            local_x = (local_x / delta_theta_rad) * arc_to_line;
            local_y =
                (local_y / delta_theta_rad + self.horizontal_wheel_offset) * arc_to_line;
        }

        // Rotate the local movement into the global frame about the average
        // heading of the interval
        let average_theta = shared.position.theta + delta_theta / 2f64;
        let (sin_avg, cos_avg) = average_theta.get::<radian>().sin_cos();

        let position = Pose2d {
            x: shared.position.x + local_x * cos_avg - local_y * sin_avg,
            y: shared.position.y + local_y * cos_avg + local_x * sin_avg,
            theta: shared.position.theta + delta_theta,
        };

        // The trackers keep the raw readings, not the corrected
        // displacements, ready for the next delta
        *shared = TrackingState {
            position,
            previous_forward: current_forward,
            previous_horizontal: current_horizontal,
            previous_theta: current_theta,
        };
    }

    /// Get a snapshot of the current pose.
    pub fn get_position(&self) -> Pose2d {
        self.lock().position
    }

    /// Overwrite the current pose, e.g. when re-zeroing against a known
    /// field location.
    ///
    /// The sensor trackers are left alone - they follow the raw cumulative
    /// readings, which a pose override does not change.
    pub fn set_position(&self, position: Pose2d) {
        debug!(
            "Pose override: x {:?}, y {:?}, theta {:?}",
            position.x, position.y, position.theta
        );
        self.lock().position = position;
    }

    /// Calculate the displacement from the current pose to a point.
    ///
    /// With `reverse` the robot is expected to drive backwards to the point
    /// and the displacement is negated.
    pub fn displacement_to(&self, point: Vector2d, reverse: bool) -> Length {
        let position = self.get_position();

        let dx = point.x - position.x;
        let dy = point.y - position.y;

        let mut displacement = (dx * dx + dy * dy).sqrt();
        if reverse {
            displacement = -displacement;
        }

        displacement
    }

    /// Calculate the bearing from the current pose to a point, in
    /// (-180, +180] degrees.
    ///
    /// With `reverse` the rear of the robot faces the point instead of the
    /// front, i.e. the bearing gains a half turn before normalisation.
    pub fn angle_to(&self, point: Vector2d, reverse: bool) -> Angle {
        let position = self.get_position();

        let dx = point.x - position.x;
        let dy = point.y - position.y;

        let mut angle = dy.atan2(dx);
        if reverse {
            angle += degrees(180f64);
        }

        wrap_angle(angle)
    }

    /// Take the tracking lock.
    ///
    /// The state is only ever written as a whole struct, so the value
    /// recovered from a poisoned lock is never torn.
    fn lock(&self) -> MutexGuard<TrackingState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
