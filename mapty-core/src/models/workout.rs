use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::coords::Coords;
use super::workout_type::WorkoutType;
use crate::error::ValidationError;

/// A recorded running or cycling session anchored to a point on the map.
///
/// The derived metric (`pace` or `speed`) and the `description` label are
/// computed once by the constructors and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    /// Kilometres
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    pub description: String,
    #[serde(default, alias = "clicks")]
    pub click_count: u32,
    #[serde(flatten)]
    pub kind: WorkoutKind,
}

/// Variant-specific fields, tagged by `type` in the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        /// Steps per minute
        cadence: u32,
        /// Minutes per kilometre
        pace: f64,
    },
    Cycling {
        /// Metres
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// Kilometres per hour
        speed: f64,
    },
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        Self::running_at(Utc::now(), coords, distance, duration, cadence)
    }

    pub fn running_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        require_positive("distance", distance)?;
        require_positive("duration", duration)?;
        require_positive("cadence", cadence)?;
        let cadence = require_whole("cadence", cadence)?;

        let kind = WorkoutKind::Running {
            cadence,
            pace: duration / distance,
        };
        Ok(Self::build(created_at, coords, distance, duration, kind))
    }

    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        Self::cycling_at(Utc::now(), coords, distance, duration, elevation_gain)
    }

    pub fn cycling_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        require_positive("distance", distance)?;
        require_positive("duration", duration)?;
        require_non_negative("elevation gain", elevation_gain)?;

        let kind = WorkoutKind::Cycling {
            elevation_gain,
            speed: distance / (duration / 60.0),
        };
        Ok(Self::build(created_at, coords, distance, duration, kind))
    }

    fn build(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
    ) -> Self {
        let workout_type = kind.workout_type();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at,
            coords,
            distance,
            duration,
            description: describe(workout_type, created_at),
            click_count: 0,
            kind,
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    /// Re-checks the constructor rules on a workout that came from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("distance", self.distance)?;
        require_positive("duration", self.duration)?;
        match self.kind {
            WorkoutKind::Running { cadence, .. } => {
                require_positive("cadence", f64::from(cadence))
            }
            WorkoutKind::Cycling { elevation_gain, .. } => {
                require_non_negative("elevation gain", elevation_gain)
            }
        }
    }

    /// Minutes per kilometre, for running workouts.
    pub fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    /// Kilometres per hour, for cycling workouts.
    pub fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }

    pub fn record_interaction(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }

    /// Text shown in the marker popup.
    pub fn popup_text(&self) -> String {
        format!("{} {}", self.workout_type().icon(), self.description)
    }
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// "Running on April 14", dated in the local timezone.
fn describe(workout_type: WorkoutType, created_at: DateTime<Utc>) -> String {
    format!(
        "{} on {}",
        workout_type.label(),
        created_at.with_timezone(&Local).format("%B %-d")
    )
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

fn require_whole(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ValidationError::NotWholeNumber { field, value });
    }
    Ok(value as u32)
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.workout_type().icon(), self.description)?;
        writeln!(f, "{}", "=".repeat(self.description.chars().count() + 3))?;
        writeln!(f, "Distance: {} km", self.distance)?;
        writeln!(f, "Duration: {} min", self.duration)?;

        match &self.kind {
            WorkoutKind::Running { cadence, pace } => {
                writeln!(f, "Pace: {:.1} min/km", pace)?;
                writeln!(f, "Cadence: {} spm", cadence)?;
            }
            WorkoutKind::Cycling {
                elevation_gain,
                speed,
            } => {
                writeln!(f, "Speed: {:.1} km/h", speed)?;
                writeln!(f, "Elevation gain: {} m", elevation_gain)?;
            }
        }

        writeln!(f, "Location: {}", self.coords)?;
        Ok(())
    }
}
