//! Persistent store adapter for the workout collection.
//!
//! The whole collection is written as one durable record: a JSON array of
//! workout records. There is no incremental persistence; every save
//! overwrites the previous record with a full snapshot.
//!
//! # Record layout
//!
//! ```text
//! [
//!   { "id": "...", "createdAt": "2025-04-14T09:30:00Z", "coords": [40.7, -74.0],
//!     "distance": 5.0, "duration": 25.0, "type": "running",
//!     "cadence": 150, "pace": 5.0,
//!     "description": "Running on April 14", "clickCount": 0, "editPending": false },
//!   ...
//! ]
//! ```

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::models::Workout;

/// One element of the durable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWorkout {
    #[serde(flatten)]
    pub workout: Workout,
    /// True only for the target of an in-progress edit.
    #[serde(rename = "editPending", alias = "edit", default)]
    pub edit_pending: bool,
}

impl StoredWorkout {
    pub fn new(workout: Workout, edit_pending: bool) -> Self {
        Self {
            workout,
            edit_pending,
        }
    }
}

/// Durable key-value medium holding the workout collection.
pub trait WorkoutStore {
    /// Overwrites the durable record with the full collection.
    fn save_all(&self, records: &[StoredWorkout]) -> Result<(), StorageError>;

    /// Reads the durable record. An absent record is an empty collection.
    fn load_all(&self) -> Result<Vec<StoredWorkout>, StorageError>;

    /// Removes the durable record. Idempotent.
    fn clear(&self) -> Result<(), StorageError>;
}

pub(crate) fn encode(records: &[StoredWorkout]) -> Result<String, StorageError> {
    serde_json::to_string(records).map_err(|e| StorageError::Malformed(e.to_string()))
}

pub(crate) fn decode(data: &str) -> Result<Vec<StoredWorkout>, StorageError> {
    // The browser app stored the literal `null` after clearing.
    if data.trim().is_empty() || data.trim() == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(data).map_err(|e| StorageError::Malformed(e.to_string()))
}
