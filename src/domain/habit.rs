/// Habit entity and related functionality
///
/// This module defines the Habit struct, its validating constructor, and the
/// completion toggle that is the only way a stored habit ever changes.

use std::collections::BTreeSet;
use serde::Serialize;
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{HabitId, ValidationError};

/// A habit the user wants to do regularly
///
/// `completed_dates` is a set of calendar dates, so a date can never be
/// recorded twice. It serializes as an ascending list of `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name, stored trimmed and never blank
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional target number of days; advisory only
    pub goal_days: Option<u32>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Calendar dates on which the habit was completed
    pub completed_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The name is trimmed and must not be empty afterwards. A goal, when
    /// given, must be a positive number of days. A blank description is
    /// treated as no description.
    pub fn new(
        name: &str,
        description: Option<String>,
        goal_days: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let name = Self::validate_name(name)?;
        let goal_days = Self::validate_goal(goal_days)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            description: Self::normalize_description(description),
            goal_days,
            created_at: Utc::now(),
            completed_dates: BTreeSet::new(),
        })
    }

    /// Create a habit from existing data (used when loading from storage)
    ///
    /// This constructor assumes data is already validated.
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        goal_days: Option<u32>,
        created_at: DateTime<Utc>,
        completed_dates: BTreeSet<NaiveDate>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            goal_days,
            created_at,
            completed_dates,
        }
    }

    /// Flip whether the habit counts as completed on `date`
    ///
    /// Returns `true` if the date is now completed and `false` if it was
    /// removed. Toggling the same date twice restores the original set.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }

    /// Check whether the habit was completed on `date`
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Number of distinct days this habit was completed
    pub fn completion_count(&self) -> usize {
        self.completed_dates.len()
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankName);
        }
        Ok(trimmed.to_string())
    }

    fn validate_goal(goal_days: Option<i64>) -> Result<Option<u32>, ValidationError> {
        match goal_days {
            None => Ok(None),
            Some(days) if days <= 0 => Err(ValidationError::InvalidGoal(days)),
            Some(days) => u32::try_from(days)
                .map(Some)
                .map_err(|_| ValidationError::InvalidGoal(days)),
        }
    }

    fn normalize_description(description: Option<String>) -> Option<String> {
        description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
    }
}
