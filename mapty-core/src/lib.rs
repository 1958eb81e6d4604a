//! Mapty Core Library
//!
//! Workout model, persistence and the engine that keeps the in-memory
//! collection, the stored record and the rendered view in sync.

pub mod collection;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
pub mod view;

pub use collection::{DuplicateId, WorkoutCollection};
pub use engine::{Applied, EditSession, SyncEngine};
pub use error::{Error, PositionUnavailable, Result, StorageError, ValidationError};
pub use models::{Coords, Workout, WorkoutForm, WorkoutKind, WorkoutType};
pub use store::{JsonFileStore, MemoryStore, StoredWorkout, WorkoutStore};
pub use view::{parse_confirmation, PositionProvider, WorkoutView};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
