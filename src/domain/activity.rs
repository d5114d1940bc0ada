/// Activity aggregation across all habits
///
/// The summary answers "how active was the user on each date" by counting,
/// for every calendar date, how many habits were completed on it.

use std::collections::BTreeMap;
use serde::Serialize;
use chrono::NaiveDate;
use crate::domain::Habit;

/// Sparse mapping from calendar date to the number of habits completed that day
///
/// Dates with zero completions are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub activity: BTreeMap<NaiveDate, u32>,
}

impl ActivitySummary {
    /// Build the summary from the current set of habits
    ///
    /// Each habit contributes at most one to a given date because its
    /// completed dates are a set. The result does not depend on habit order.
    pub fn from_habits(habits: &[Habit]) -> Self {
        let mut activity = BTreeMap::new();
        for habit in habits {
            for date in &habit.completed_dates {
                *activity.entry(*date).or_insert(0) += 1;
            }
        }
        Self { activity }
    }

    /// Number of habits completed on `date` (0 if none)
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.activity.get(&date).copied().unwrap_or(0)
    }

    /// Sum of completions over every date
    pub fn total_completions(&self) -> u64 {
        self.activity.values().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.activity.is_empty()
    }
}

/// How many of the current habits were completed on a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl DayProgress {
    pub fn from_habits(habits: &[Habit], date: NaiveDate) -> Self {
        let completed = habits.iter().filter(|h| h.is_completed_on(date)).count();
        Self {
            date,
            completed: completed as u32,
            total: habits.len() as u32,
        }
    }
}
