/// Habit service: validation, the completion toggle and activity aggregation
///
/// The service never keeps its own copy of a habit. Every operation reads
/// through the store, so results always reflect current store state.

use chrono::NaiveDate;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ActivitySummary, DayProgress, Habit, HabitId, ValidationError};
use crate::storage::{HabitStorage, StorageError};

/// Failures returned by service operations
#[derive(Error, Debug)]
pub enum HabitError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: String },

    #[error("Internal storage failure: {0}")]
    Internal(StorageError),
}

impl HabitError {
    /// Whether the caller can fix this by changing its input
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, HabitError::Internal(_))
    }
}

impl From<StorageError> for HabitError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::HabitNotFound { habit_id } => HabitError::NotFound { habit_id },
            other => HabitError::Internal(other),
        }
    }
}

/// Domain operations on top of a `HabitStorage`
pub struct HabitService<S> {
    storage: S,
    // Held across get-then-replace and delete so read-modify-write on the
    // same habit is never interleaved
    write_lock: Mutex<()>,
}

impl<S: HabitStorage> HabitService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying store
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate and store a new habit with no completions
    ///
    /// Nothing is written when validation fails.
    pub fn create_habit(
        &self,
        name: &str,
        description: Option<String>,
        goal_days: Option<i64>,
    ) -> Result<Habit, HabitError> {
        let habit = Habit::new(name, description, goal_days)?;
        let habit = self.storage.insert(habit)?;

        info!("Created habit '{}' ({})", habit.name, habit.id);
        Ok(habit)
    }

    pub fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, HabitError> {
        Ok(self.storage.get(habit_id)?)
    }

    pub fn list_habits(&self) -> Result<Vec<Habit>, HabitError> {
        Ok(self.storage.list()?)
    }

    /// Remove a habit and its completion history for good
    pub fn delete_habit(&self, habit_id: &HabitId) -> Result<(), HabitError> {
        let _guard = self.write_lock.lock();
        self.storage.remove(habit_id)?;

        info!("Deleted habit {}", habit_id);
        Ok(())
    }

    /// Flip whether the habit is completed on `date` and return the updated habit
    ///
    /// Only `completed_dates` changes. Calling this twice with the same date
    /// restores the original habit.
    pub fn toggle_completion(&self, habit_id: &HabitId, date: NaiveDate) -> Result<Habit, HabitError> {
        let _guard = self.write_lock.lock();

        let mut habit = self.storage.get(habit_id)?;
        let completed = habit.toggle(date);
        let habit = self.storage.replace(habit_id, habit)?;

        debug!(
            "Toggled habit {} on {}: {}",
            habit_id,
            date,
            if completed { "completed" } else { "not completed" }
        );
        Ok(habit)
    }

    /// Count, for every date, how many habits were completed on it
    ///
    /// Recomputed from the store on every call.
    pub fn get_activity(&self) -> Result<ActivitySummary, HabitError> {
        let habits = self.storage.list()?;
        Ok(ActivitySummary::from_habits(&habits))
    }

    /// How many of the current habits were completed on `date`
    pub fn day_progress(&self, date: NaiveDate) -> Result<DayProgress, HabitError> {
        let habits = self.storage.list()?;
        Ok(DayProgress::from_habits(&habits, date))
    }
}
