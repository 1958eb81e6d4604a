//! Error taxonomy shared by the model, the store and the engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::collection::DuplicateId;

/// Bad numeric input on a workout submission. User-correctable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a whole number, got {value}")]
    NotWholeNumber { field: &'static str, value: f64 },
}

/// Failure of the durable medium behind a [`crate::store::WorkoutStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for {0:?}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Stored workouts are malformed: {0}")]
    Malformed(String),

    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}

/// The geolocation collaborator could not produce a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not get your position: {0}")]
pub struct PositionUnavailable(pub String);

/// Errors returned by [`crate::engine::SyncEngine`] operations.
///
/// Every variant is returned before the collection is touched, so a failed
/// operation leaves collection, store and view as they were.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid workout: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workout not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    PositionUnavailable(#[from] PositionUnavailable),

    #[error("No point selected on the map for the new workout")]
    NoPointSelected,

    #[error(transparent)]
    Duplicate(#[from] DuplicateId),
}

pub type Result<T> = std::result::Result<T, Error>;
