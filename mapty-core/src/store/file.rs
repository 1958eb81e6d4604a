use std::fs;
use std::io;
use std::path::PathBuf;

use super::{decode, encode, StoredWorkout, WorkoutStore};
use crate::error::StorageError;

/// Filename of the durable record inside the data directory.
const RECORD_FILE: &str = "workouts.json";

/// Stores the workout record as a JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Full path of the record file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(RECORD_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }
}

impl WorkoutStore for JsonFileStore {
    /// Creates the data directory if it doesn't exist. The record is written
    /// to a sibling temp file and renamed over the old one, so a failed write
    /// never leaves a truncated record behind.
    fn save_all(&self, records: &[StoredWorkout]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        let data = encode(records)?;

        fs::write(&tmp, data).map_err(|e| StorageError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredWorkout>, StorageError> {
        let path = self.path();

        match fs::read_to_string(&path) {
            Ok(data) => decode(&data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let path = self.path();

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coords, Workout};
    use tempfile::TempDir;

    fn test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn record(distance: f64) -> StoredWorkout {
        let run = Workout::running(Coords::new(40.7, -74.0), distance, 25.0, 150.0).unwrap();
        StoredWorkout::new(run, false)
    }

    #[test]
    fn test_store_path() {
        let (store, _temp) = test_store();
        assert!(store.path().ends_with("workouts.json"));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let (store, _temp) = test_store();
        assert!(!store.exists());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_dir = temp_dir.path().join("nested").join("data");
        let store = JsonFileStore::new(nested_dir.clone());

        store.save_all(&[record(5.0)]).unwrap();

        assert!(nested_dir.exists());
        assert!(store.exists());
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let (store, _temp) = test_store();

        store.save_all(&[record(5.0), record(6.0)]).unwrap();
        let latest = vec![record(7.0)];
        store.save_all(&latest).unwrap();

        assert_eq!(store.load_all().unwrap(), latest);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, _temp) = test_store();
        store.save_all(&[record(5.0)]).unwrap();

        store.clear().unwrap();
        assert!(!store.exists());
        store.clear().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let (store, _temp) = test_store();
        fs::write(store.path(), "{ definitely not workouts").unwrap();

        assert!(matches!(store.load_all(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_unwritable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let store = JsonFileStore::new(blocker.join("data"));
        assert!(matches!(
            store.save_all(&[record(5.0)]),
            Err(StorageError::Io(_, _))
        ));
    }
}
