//! Synchronization engine.
//!
//! The engine is the only writer of the workout collection. Each operation
//! runs to completion and leaves three representations in agreement: the
//! in-memory collection, the durable record in the [`WorkoutStore`], and what
//! the [`WorkoutView`] has rendered (list entries and map markers).
//!
//! Failures split in two groups:
//! - validation and lookup failures are returned before anything changes;
//! - storage failures happen after the in-memory and view updates were
//!   applied, so they are not errors: the operation succeeds and carries the
//!   [`StorageError`] as a warning in [`Applied`].

use chrono::Utc;

use crate::collection::WorkoutCollection;
use crate::error::{Error, Result, StorageError};
use crate::models::{Coords, Workout, WorkoutForm};
use crate::store::{StoredWorkout, WorkoutStore};
use crate::view::{PositionProvider, WorkoutView};

/// Result of an operation that went through.
///
/// `warning` is set when the durable record could not be updated; the change
/// is visible now but may not survive a reload.
#[derive(Debug)]
#[must_use]
pub struct Applied<T> {
    pub value: T,
    pub warning: Option<StorageError>,
}

impl<T> Applied<T> {
    fn new(value: T, warning: Option<StorageError>) -> Self {
        Self { value, warning }
    }

    pub fn is_durable(&self) -> bool {
        self.warning.is_none()
    }
}

/// An edit in progress: the next submission replaces `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target_id: String,
}

pub struct SyncEngine<S, V: WorkoutView> {
    collection: WorkoutCollection<V::Marker>,
    store: S,
    view: V,
    edit: Option<EditSession>,
    selected_point: Option<Coords>,
    sorted: bool,
}

impl<S: WorkoutStore, V: WorkoutView> SyncEngine<S, V> {
    /// Creates an engine with an empty collection. Call
    /// [`SyncEngine::load_persisted_workouts`] to rehydrate from the store.
    pub fn new(store: S, view: V) -> Self {
        Self {
            collection: WorkoutCollection::new(),
            store,
            view,
            edit: None,
            selected_point: None,
            sorted: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Workouts in insertion order.
    pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
        self.collection.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.collection.get(id)
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn selected_point(&self) -> Option<Coords> {
        self.selected_point
    }

    /// Marker handle owned by the workout `id`.
    pub fn marker(&self, id: &str) -> Option<&V::Marker> {
        self.collection.marker(id)
    }

    /// Workouts in the order a full re-render of the list produces (loading
    /// or toggling the sort). Rows submitted since then are appended after
    /// that order, even while sorted.
    pub fn render_order(&self) -> Vec<&Workout> {
        if self.sorted {
            self.collection.sorted_by_distance()
        } else {
            self.collection.iter().collect()
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_parts(self) -> (S, V) {
        (self.store, self.view)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Rehydrates the collection from the store and renders every workout.
    ///
    /// Meant to run once at startup. Anything already loaded is dropped from
    /// the view first. A malformed or unreadable record degrades to an empty
    /// collection; the failure comes back as the warning. Workouts that break
    /// the constructor rules are skipped and reported the same way.
    pub fn load_persisted_workouts(&mut self) -> Applied<usize> {
        self.view.remove_all_entries();
        for (_, marker) in self.collection.drain() {
            self.view.remove_marker(marker);
        }
        self.edit = None;
        self.sorted = false;

        let (records, mut warning) = match self.store.load_all() {
            Ok(records) => (records, None),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring stored workouts");
                (Vec::new(), Some(e))
            }
        };

        for StoredWorkout {
            workout,
            edit_pending,
        } in records
        {
            if let Err(e) = workout.validate() {
                tracing::warn!(id = %workout.id, error = %e, "Skipping invalid stored workout");
                warning.get_or_insert_with(|| {
                    StorageError::Malformed(format!("workout {}: {}", workout.id, e))
                });
                continue;
            }

            let id = workout.id.clone();
            let view = &mut self.view;
            if let Err(e) = self
                .collection
                .push_with(workout, |workout| view.add_marker(workout))
            {
                tracing::warn!(error = %e, "Skipping stored workout");
                continue;
            }
            if let Some(workout) = self.collection.get(&id) {
                self.view.render_entry(workout);
            }
            if edit_pending && self.edit.is_none() {
                self.edit = Some(EditSession { target_id: id });
            }
        }

        if !self.collection.is_empty() {
            self.view.set_delete_all_visible(true);
        }

        tracing::debug!(
            count = self.collection.len(),
            editing = ?self.edit,
            "Loaded stored workouts"
        );
        Applied::new(self.collection.len(), warning)
    }

    /// Records a click on the map: the next plain submission is placed here.
    pub fn select_point(&mut self, coords: Coords) {
        self.selected_point = Some(coords);

        let editing = self
            .edit
            .as_ref()
            .and_then(|session| self.collection.get(&session.target_id));
        self.view.show_form(editing);
    }

    /// Asks `provider` for the user's position and centres the view on it.
    pub fn locate(&mut self, provider: &impl PositionProvider) -> Result<Coords> {
        match provider.current_position() {
            Ok(coords) => {
                self.view.focus(coords);
                Ok(coords)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Position unavailable");
                Err(e.into())
            }
        }
    }

    /// Creates a workout from the form, or completes the pending edit.
    ///
    /// A completed edit appends the replacement and removes only the list
    /// entry of the original: the original workout stays in the collection
    /// with its marker, so the edited location shows two markers.
    ///
    /// Returns the id of the new workout.
    pub fn submit_new_workout(&mut self, form: &WorkoutForm) -> Result<Applied<String>> {
        let editing = self
            .edit
            .as_ref()
            .and_then(|session| self.collection.get(&session.target_id));

        if self.edit.is_some() && editing.is_none() {
            tracing::warn!(edit = ?self.edit, "Edit target is gone, creating a new workout");
        }

        let coords = match (self.selected_point, editing) {
            (Some(point), _) => point,
            (None, Some(original)) => original.coords,
            (None, None) => return Err(Error::NoPointSelected),
        };
        let original_id = editing.map(|original| original.id.clone());

        let workout = form.build(coords, Utc::now())?;
        let id = workout.id.clone();

        let view = &mut self.view;
        self.collection
            .push_with(workout, |workout| view.add_marker(workout))?;
        self.edit = None;

        let warning = self.persist();

        if let Some(workout) = self.collection.get(&id) {
            self.view.render_entry(workout);
        }
        if let Some(original_id) = &original_id {
            self.view.remove_entry(original_id);
        }
        self.view.set_delete_all_visible(true);
        self.view.reset_form();
        self.selected_point = None;

        tracing::debug!(id = %id, replaces = ?original_id, "Workout created");
        Ok(Applied::new(id, warning))
    }

    /// Starts editing workout `id`; the next submission completes the edit.
    pub fn begin_edit(&mut self, id: &str) -> Result<Applied<()>> {
        let workout = self.collection.get(id).ok_or_else(|| not_found(id))?;

        self.view.show_form(Some(workout));
        self.edit = Some(EditSession {
            target_id: id.to_string(),
        });

        let warning = self.persist();

        tracing::debug!(id = %id, "Edit started");
        Ok(Applied::new((), warning))
    }

    /// Deletes one workout with its list entry and marker.
    ///
    /// Deleting the last workout removes the durable record entirely.
    pub fn delete_workout(&mut self, id: &str) -> Result<Applied<()>> {
        let (_, marker) = self.collection.remove(id).ok_or_else(|| not_found(id))?;
        self.view.remove_marker(marker);

        if self
            .edit
            .as_ref()
            .is_some_and(|session| session.target_id == id)
        {
            self.edit = None;
        }

        let mut warning = self.persist();

        if self.collection.is_empty() {
            if let Err(e) = self.store.clear() {
                tracing::warn!(error = %e, "Failed to clear stored workouts");
                warning.get_or_insert(e);
            }
            self.view.set_delete_all_visible(false);
        }

        self.view.remove_entry(id);

        tracing::debug!(id = %id, remaining = self.collection.len(), "Workout deleted");
        Ok(Applied::new((), warning))
    }

    /// Deletes every workout after the view confirms.
    ///
    /// Returns `None` when the user declined, otherwise the number of
    /// workouts removed.
    pub fn delete_all_workouts(&mut self) -> Option<Applied<usize>> {
        if !self.view.confirm_delete_all() {
            tracing::debug!("Delete all declined");
            return None;
        }

        let removed = self.collection.drain();
        let count = removed.len();
        for (_, marker) in removed {
            self.view.remove_marker(marker);
        }
        self.edit = None;

        let warning = match self.store.clear() {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear stored workouts");
                Some(e)
            }
        };

        self.view.remove_all_entries();
        self.view.set_delete_all_visible(false);

        tracing::debug!(count, "All workouts deleted");
        Some(Applied::new(count, warning))
    }

    /// Flips between distance order and insertion order in the rendered
    /// list. The collection itself is never reordered. Returns the new state.
    pub fn toggle_sort(&mut self) -> bool {
        self.sorted = !self.sorted;

        self.view.remove_all_entries();
        let order = if self.sorted {
            self.collection.sorted_by_distance()
        } else {
            self.collection.iter().collect()
        };
        for workout in order {
            self.view.render_entry(workout);
        }

        tracing::debug!(sorted = self.sorted, "Sort toggled");
        self.sorted
    }

    /// Handles a click on a list entry: counts the interaction and moves the
    /// map to the workout.
    pub fn focus_workout(&mut self, id: &str) -> Result<Applied<Coords>> {
        let workout = self.collection.get_mut(id).ok_or_else(|| not_found(id))?;
        workout.record_interaction();
        let coords = workout.coords;

        let warning = self.persist();
        self.view.focus(coords);

        Ok(Applied::new(coords, warning))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn snapshot(&self) -> Vec<StoredWorkout> {
        let pending = self.edit.as_ref().map(|session| session.target_id.as_str());
        self.collection
            .iter()
            .map(|workout| StoredWorkout::new(workout.clone(), pending == Some(workout.id.as_str())))
            .collect()
    }

    /// Writes the full collection. A failure is logged and returned as a
    /// warning; the in-memory state is kept either way.
    fn persist(&self) -> Option<StorageError> {
        match self.store.save_all(&self.snapshot()) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Workouts not saved; changes may not survive a reload");
                Some(e)
            }
        }
    }
}

fn not_found(id: &str) -> Error {
    tracing::error!(id = %id, "Workout id not in collection");
    Error::NotFound(id.to_string())
}
