use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coords::Coords;
use super::workout::Workout;
use super::workout_type::WorkoutType;
use crate::error::ValidationError;

/// The values of the workout input form.
///
/// Empty numeric fields read as zero, so a missing cadence fails validation
/// while a missing elevation gain is a valid flat ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutForm {
    pub workout_type: WorkoutType,
    pub distance: f64,
    pub duration: f64,
    pub cadence: Option<f64>,
    pub elevation_gain: Option<f64>,
}

impl WorkoutForm {
    pub fn running(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            workout_type: WorkoutType::Running,
            distance,
            duration,
            cadence: Some(cadence),
            elevation_gain: None,
        }
    }

    pub fn cycling(distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self {
            workout_type: WorkoutType::Cycling,
            distance,
            duration,
            cadence: None,
            elevation_gain: Some(elevation_gain),
        }
    }

    /// Builds the workout this form describes, anchored at `coords`.
    pub fn build(
        &self,
        coords: Coords,
        created_at: DateTime<Utc>,
    ) -> Result<Workout, ValidationError> {
        match self.workout_type {
            WorkoutType::Running => Workout::running_at(
                created_at,
                coords,
                self.distance,
                self.duration,
                self.cadence.unwrap_or(0.0),
            ),
            WorkoutType::Cycling => Workout::cycling_at(
                created_at,
                coords,
                self.distance,
                self.duration,
                self.elevation_gain.unwrap_or(0.0),
            ),
        }
    }
}

impl From<&Workout> for WorkoutForm {
    /// Pre-populates the form from an existing workout (edit flow).
    fn from(workout: &Workout) -> Self {
        use super::workout::WorkoutKind;

        let (cadence, elevation_gain) = match workout.kind {
            WorkoutKind::Running { cadence, .. } => (Some(f64::from(cadence)), None),
            WorkoutKind::Cycling { elevation_gain, .. } => (None, Some(elevation_gain)),
        };

        Self {
            workout_type: workout.workout_type(),
            distance: workout.distance,
            duration: workout.duration,
            cadence,
            elevation_gain,
        }
    }
}
