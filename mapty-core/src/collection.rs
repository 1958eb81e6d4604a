//! The authoritative in-memory list of workouts.
//!
//! Each entry owns the marker handle the view returned for its workout, so
//! removing a workout and removing its marker are the same operation and the
//! two can never drift apart.

use thiserror::Error;

use crate::models::Workout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate workout id: {0}")]
pub struct DuplicateId(pub String);

#[derive(Debug)]
struct Entry<M> {
    workout: Workout,
    marker: M,
}

/// Workouts in insertion order, unique by id.
#[derive(Debug)]
pub struct WorkoutCollection<M> {
    entries: Vec<Entry<M>>,
}

impl<M> Default for WorkoutCollection<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M> WorkoutCollection<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Index of `id` in insertion order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.workout.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.entries
            .iter()
            .find(|entry| entry.workout.id == id)
            .map(|entry| &entry.workout)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Workout> {
        self.entries
            .iter_mut()
            .find(|entry| entry.workout.id == id)
            .map(|entry| &mut entry.workout)
    }

    pub fn marker(&self, id: &str) -> Option<&M> {
        self.entries
            .iter()
            .find(|entry| entry.workout.id == id)
            .map(|entry| &entry.marker)
    }

    /// Appends a workout together with its marker.
    pub fn push(&mut self, workout: Workout, marker: M) -> Result<(), DuplicateId> {
        self.push_with(workout, |_| marker)
    }

    /// Appends a workout, creating its marker only once the id is known to
    /// be free.
    pub fn push_with(
        &mut self,
        workout: Workout,
        make_marker: impl FnOnce(&Workout) -> M,
    ) -> Result<(), DuplicateId> {
        if self.contains(&workout.id) {
            return Err(DuplicateId(workout.id));
        }
        let marker = make_marker(&workout);
        self.entries.push(Entry { workout, marker });
        Ok(())
    }

    /// Removes a workout and hands back its marker.
    pub fn remove(&mut self, id: &str) -> Option<(Workout, M)> {
        let index = self.position(id)?;
        let entry = self.entries.remove(index);
        Some((entry.workout, entry.marker))
    }

    /// Swaps the workout stored under `id` for `workout`, keeping its
    /// position and marker. Returns the previous workout.
    pub fn replace(&mut self, id: &str, workout: Workout) -> Result<Option<Workout>, DuplicateId> {
        if workout.id != id && self.contains(&workout.id) {
            return Err(DuplicateId(workout.id));
        }
        Ok(self
            .get_mut(id)
            .map(|slot| std::mem::replace(slot, workout)))
    }

    /// Empties the collection, returning every workout with its marker.
    pub fn drain(&mut self) -> Vec<(Workout, M)> {
        self.entries
            .drain(..)
            .map(|entry| (entry.workout, entry.marker))
            .collect()
    }

    /// Workouts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.entries.iter().map(|entry| &entry.workout)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|workout| workout.id.as_str()).collect()
    }

    /// Workouts ordered by ascending distance. Ties keep insertion order and
    /// the collection itself is left untouched.
    pub fn sorted_by_distance(&self) -> Vec<&Workout> {
        let mut sorted: Vec<&Workout> = self.iter().collect();
        sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coords;

    fn run(distance: f64) -> Workout {
        Workout::running(Coords::new(40.7, -74.0), distance, 25.0, 150.0).unwrap()
    }

    #[test]
    fn test_push_and_get() {
        let mut collection = WorkoutCollection::new();
        let workout = run(5.0);
        let id = workout.id.clone();

        collection.push(workout, 1u32).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(&id).unwrap().distance, 5.0);
        assert_eq!(collection.marker(&id), Some(&1));
        assert_eq!(collection.position(&id), Some(0));
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut collection = WorkoutCollection::new();
        let workout = run(5.0);
        let copy = workout.clone();

        collection.push(workout, 1u32).unwrap();
        let err = collection.push(copy.clone(), 2).unwrap_err();

        assert_eq!(err, DuplicateId(copy.id));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_remove_returns_marker() {
        let mut collection = WorkoutCollection::new();
        let (a, b, c) = (run(1.0), run(2.0), run(3.0));
        let b_id = b.id.clone();
        collection.push(a, 10u32).unwrap();
        collection.push(b, 20).unwrap();
        collection.push(c, 30).unwrap();

        let (removed, marker) = collection.remove(&b_id).unwrap();

        assert_eq!(removed.id, b_id);
        assert_eq!(marker, 20);
        assert_eq!(collection.len(), 2);
        assert!(collection.remove(&b_id).is_none());
        let remaining: Vec<u32> = collection
            .ids()
            .iter()
            .map(|id| *collection.marker(id).unwrap())
            .collect();
        assert_eq!(remaining, vec![10, 30]);
    }

    #[test]
    fn test_replace_keeps_position_and_marker() {
        let mut collection = WorkoutCollection::new();
        let (a, b) = (run(1.0), run(2.0));
        let a_id = a.id.clone();
        collection.push(a, 1u32).unwrap();
        collection.push(b, 2).unwrap();

        let mut moved = collection.get(&a_id).unwrap().clone();
        moved.coords = Coords::new(0.0, 0.0);
        let previous = collection.replace(&a_id, moved).unwrap().unwrap();

        assert_eq!(previous.coords, Coords::new(40.7, -74.0));
        assert_eq!(collection.position(&a_id), Some(0));
        assert_eq!(collection.get(&a_id).unwrap().coords, Coords::new(0.0, 0.0));
        assert_eq!(collection.marker(&a_id), Some(&1));
    }

    #[test]
    fn test_replace_unknown_and_clashing_ids() {
        let mut collection = WorkoutCollection::new();
        let (a, b) = (run(1.0), run(2.0));
        let a_id = a.id.clone();
        let b_copy = b.clone();
        collection.push(a, 1u32).unwrap();
        collection.push(b, 2).unwrap();

        assert_eq!(collection.replace("missing", run(3.0)).unwrap(), None);
        assert!(collection.replace(&a_id, b_copy).is_err());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_sorted_by_distance_leaves_order() {
        let mut collection = WorkoutCollection::new();
        for (marker, distance) in [3.0, 1.0, 2.0, 1.0].into_iter().enumerate() {
            collection.push(run(distance), marker).unwrap();
        }
        let original = collection.ids().iter().map(|id| id.to_string()).collect::<Vec<_>>();

        let sorted: Vec<f64> = collection
            .sorted_by_distance()
            .iter()
            .map(|w| w.distance)
            .collect();

        assert_eq!(sorted, vec![1.0, 1.0, 2.0, 3.0]);
        assert_eq!(collection.ids(), original);
        // equal distances stay in insertion order
        let ties: Vec<&str> = collection.sorted_by_distance()[..2]
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ties, vec![original[1].as_str(), original[3].as_str()]);
    }

    #[test]
    fn test_drain() {
        let mut collection = WorkoutCollection::new();
        collection.push(run(1.0), 'a').unwrap();
        collection.push(run(2.0), 'b').unwrap();

        let drained = collection.drain();

        assert!(collection.is_empty());
        let markers: Vec<char> = drained.into_iter().map(|(_, m)| m).collect();
        assert_eq!(markers, vec!['a', 'b']);
    }
}
