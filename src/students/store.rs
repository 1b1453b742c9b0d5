//! Mutex-guarded in-memory student repository.

use super::types::{Student, StudentDraft, StudentId, StoreError};
use std::sync::{Mutex, MutexGuard};

/// Sole owner of the student collection and the identifier counter.
///
/// Every operation holds one exclusive lock for its entire duration, so reads and writes are
/// serialized and no caller observes a half-applied mutation. Records are handed out as clones;
/// mutating a returned value never touches the store.
#[derive(Debug)]
pub struct StudentStore {
    inner: Mutex<StoreState>,
}

#[derive(Debug)]
struct StoreState {
    records: Vec<Student>,
    next_id: StudentId,
}

impl Default for StudentStore {
    /// An empty store whose first assigned identifier is `1`.
    fn default() -> Self {
        Self {
            inner: Mutex::new(StoreState::empty()),
        }
    }
}

impl StudentStore {
    /// The process-start store: Alice (`1`) and Bob (`2`), next identifier `3`.
    pub fn seeded() -> Self {
        let mut state = StoreState::empty();
        for draft in [
            StudentDraft::new("Alice", 20, "alice@example.com"),
            StudentDraft::new("Bob", 22, "bob@example.com"),
        ] {
            state.insert(draft);
        }
        Self {
            inner: Mutex::new(state),
        }
    }

    /// Assign the next identifier to `draft`, append it, and return the stored copy.
    pub fn create(&self, draft: StudentDraft) -> Result<Student, StoreError> {
        let mut state = self.lock()?;
        Ok(state.insert(draft))
    }

    /// Return every record in insertion order.
    pub fn list(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.lock()?.records.clone())
    }

    /// Return the record carrying `id`.
    pub fn get(&self, id: StudentId) -> Result<Student, StoreError> {
        let state = self.lock()?;
        state
            .records
            .iter()
            .find(|student| student.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Replace every field of the record carrying `id` with `draft`, keeping the identifier.
    pub fn update(&self, id: StudentId, draft: StudentDraft) -> Result<Student, StoreError> {
        let mut state = self.lock()?;
        let slot = state
            .records
            .iter_mut()
            .find(|student| student.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = draft.into_student(id);
        Ok(slot.clone())
    }

    /// Remove the record carrying `id`, keeping the relative order of the rest.
    pub fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let index = state
            .records
            .iter()
            .position(|student| student.id == id)
            .ok_or(StoreError::NotFound(id))?;
        state.records.remove(index);
        Ok(())
    }

    /// Number of records currently held.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.records.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl StoreState {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, draft: StudentDraft) -> Student {
        let student = draft.into_student(self.next_id);
        self.next_id += 1;
        self.records.push(student.clone());
        student
    }
}
