//! Contracts the engine consumes from its collaborators: the view that
//! renders list entries and map markers, and the geolocation provider.

use crate::error::PositionUnavailable;
use crate::models::{Coords, Workout};

/// Renders workouts as list entries and map markers.
///
/// The engine calls these as side effects and never reads anything back
/// except the marker handle, which it stores next to the workout it belongs
/// to and hands back to [`WorkoutView::remove_marker`].
pub trait WorkoutView {
    type Marker;

    fn render_entry(&mut self, workout: &Workout);

    fn remove_entry(&mut self, id: &str);

    fn remove_all_entries(&mut self);

    fn add_marker(&mut self, workout: &Workout) -> Self::Marker;

    fn remove_marker(&mut self, marker: Self::Marker);

    /// Shows the input form, pre-populated when `editing` is set.
    fn show_form(&mut self, editing: Option<&Workout>);

    /// Clears and hides the input form.
    fn reset_form(&mut self);

    fn set_delete_all_visible(&mut self, visible: bool);

    /// Centres the map on `coords`.
    fn focus(&mut self, coords: Coords);

    /// Asks the user to confirm deleting every workout.
    fn confirm_delete_all(&mut self) -> bool;
}

/// Source of the user's current position.
pub trait PositionProvider {
    fn current_position(&self) -> Result<Coords, PositionUnavailable>;
}

/// Reads a yes/no answer to the delete-all prompt.
///
/// Only an explicit "no" (or a cancelled prompt) keeps the workouts.
pub fn parse_confirmation(answer: Option<&str>) -> bool {
    match answer {
        None => false,
        Some(answer) => !matches!(answer.trim().to_lowercase().as_str(), "no" | "n"),
    }
}
