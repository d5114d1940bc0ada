/// In-memory implementation of the habit storage interface
///
/// Nothing is persisted. Useful for tests and for running the server with
/// `--in-memory`.

use parking_lot::Mutex;

use crate::domain::{Habit, HabitId};
use crate::storage::{check_same_id, HabitStorage, StorageError};

/// Habits kept in a vector in insertion order
#[derive(Debug, Default)]
pub struct MemoryStorage {
    habits: Mutex<Vec<Habit>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(habit_id: &HabitId) -> StorageError {
        StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        }
    }
}

impl HabitStorage for MemoryStorage {
    fn insert(&self, habit: Habit) -> Result<Habit, StorageError> {
        let mut habits = self.habits.lock();
        if habits.iter().any(|h| h.id == habit.id) {
            return Err(StorageError::DuplicateId {
                habit_id: habit.id.to_string(),
            });
        }
        habits.push(habit.clone());

        tracing::debug!("Stored habit in memory: {} ({})", habit.name, habit.id);
        Ok(habit)
    }

    fn get(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.habits
            .lock()
            .iter()
            .find(|h| &h.id == habit_id)
            .cloned()
            .ok_or_else(|| Self::not_found(habit_id))
    }

    fn list(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(self.habits.lock().clone())
    }

    fn replace(&self, habit_id: &HabitId, habit: Habit) -> Result<Habit, StorageError> {
        check_same_id(habit_id, &habit)?;

        let mut habits = self.habits.lock();
        let slot = habits
            .iter_mut()
            .find(|h| &h.id == habit_id)
            .ok_or_else(|| Self::not_found(habit_id))?;
        *slot = habit.clone();
        Ok(habit)
    }

    fn remove(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let mut habits = self.habits.lock();
        let index = habits
            .iter()
            .position(|h| &h.id == habit_id)
            .ok_or_else(|| Self::not_found(habit_id))?;
        habits.remove(index);

        tracing::debug!("Removed habit from memory: {}", habit_id);
        Ok(())
    }
}
