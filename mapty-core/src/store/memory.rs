use std::cell::{Cell, RefCell};

use super::{decode, encode, StoredWorkout, WorkoutStore};
use crate::error::StorageError;

/// Single-key in-process store, shaped like browser local storage.
///
/// The record is kept serialized so loads go through the same decoding as
/// the file store. An optional byte quota rejects writes that would not fit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<Option<String>>,
    quota: Option<usize>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Starts from a raw record, e.g. one left behind by another client.
    pub fn with_raw(data: impl Into<String>) -> Self {
        Self {
            record: RefCell::new(Some(data.into())),
            ..Self::default()
        }
    }

    /// Makes every later write fail as if the medium went away.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn raw(&self) -> Option<String> {
        self.record.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.record.borrow().is_none()
    }
}

impl WorkoutStore for MemoryStore {
    fn save_all(&self, records: &[StoredWorkout]) -> Result<(), StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Rejected("storage unavailable".into()));
        }

        let data = encode(records)?;
        if let Some(quota) = self.quota {
            if data.len() > quota {
                return Err(StorageError::Rejected(format!(
                    "quota exceeded ({} bytes, limit {})",
                    data.len(),
                    quota
                )));
            }
        }

        *self.record.borrow_mut() = Some(data);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StoredWorkout>, StorageError> {
        match self.record.borrow().as_deref() {
            Some(data) => decode(data),
            None => Ok(Vec::new()),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.unavailable.get() {
            return Err(StorageError::Rejected("storage unavailable".into()));
        }
        *self.record.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coords, Workout};

    fn record() -> StoredWorkout {
        let ride = Workout::cycling(Coords::new(1.0, 2.0), 20.0, 60.0, 300.0).unwrap();
        StoredWorkout::new(ride, false)
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        let records = vec![record(), record()];
        store.save_all(&records).unwrap();

        assert_eq!(store.load_all().unwrap(), records);
    }

    #[test]
    fn test_quota_rejects_large_write() {
        let store = MemoryStore::with_quota(16);
        let result = store.save_all(&[record()]);

        assert!(matches!(result, Err(StorageError::Rejected(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unavailable_keeps_previous_record() {
        let store = MemoryStore::new();
        store.save_all(&[record()]).unwrap();
        let before = store.raw();

        store.set_unavailable(true);
        assert!(store.save_all(&[]).is_err());
        assert_eq!(store.raw(), before);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        store.save_all(&[record()]).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_with_raw_malformed() {
        let store = MemoryStore::with_raw("[{\"id\": 1");
        assert!(matches!(store.load_all(), Err(StorageError::Malformed(_))));
    }
}
