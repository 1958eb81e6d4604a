mod coords;
mod form;
mod workout;
mod workout_type;

pub use coords::Coords;
pub use form::WorkoutForm;
pub use workout::{Workout, WorkoutKind};
pub use workout_type::WorkoutType;
