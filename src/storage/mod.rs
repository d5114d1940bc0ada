/// Storage layer for persisting habits
///
/// The `HabitStorage` trait is the only thing the service layer sees.
/// Two implementations live here: an in-memory store and a SQLite store.

pub mod memory;
pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use memory::*;
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate habit id: {habit_id}")]
    DuplicateId { habit_id: String },

    #[error("Habit id mismatch: replacing {expected} with a habit whose id is {found}")]
    IdMismatch { expected: String, found: String },

    #[error("Corrupt row in column {column}: {message}")]
    CorruptRow { column: &'static str, message: String },
}

/// Trait defining the storage interface for habits
///
/// Every call is atomic on its own. Callers that need read-modify-write
/// atomicity across calls must serialize those calls themselves.
pub trait HabitStorage: Send + Sync {
    /// Store a new, already validated habit
    fn insert(&self, habit: Habit) -> Result<Habit, StorageError>;

    /// Get a habit by ID
    fn get(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List all habits in insertion order
    fn list(&self) -> Result<Vec<Habit>, StorageError>;

    /// Overwrite the stored habit for `habit_id`
    fn replace(&self, habit_id: &HabitId, habit: Habit) -> Result<Habit, StorageError>;

    /// Delete a habit permanently
    fn remove(&self, habit_id: &HabitId) -> Result<(), StorageError>;
}

impl<S: HabitStorage + ?Sized> HabitStorage for Box<S> {
    fn insert(&self, habit: Habit) -> Result<Habit, StorageError> {
        (**self).insert(habit)
    }

    fn get(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        (**self).get(habit_id)
    }

    fn list(&self) -> Result<Vec<Habit>, StorageError> {
        (**self).list()
    }

    fn replace(&self, habit_id: &HabitId, habit: Habit) -> Result<Habit, StorageError> {
        (**self).replace(habit_id, habit)
    }

    fn remove(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        (**self).remove(habit_id)
    }
}

/// Reject a replacement whose id differs from the key it is stored under
pub(crate) fn check_same_id(habit_id: &HabitId, habit: &Habit) -> Result<(), StorageError> {
    if &habit.id != habit_id {
        return Err(StorageError::IdMismatch {
            expected: habit_id.to_string(),
            found: habit.id.to_string(),
        });
    }
    Ok(())
}
