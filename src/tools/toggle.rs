/// Tool for toggling a habit's completion on a date
///
/// This module implements the habit_toggle MCP tool.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::domain::Habit;
use crate::service::HabitService;
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or_today, parse_habit_id, ToolError};

/// Parameters for toggling a completion
#[derive(Debug, Deserialize)]
pub struct ToggleHabitParams {
    pub habit_id: String,
    /// `YYYY-MM-DD`; defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

/// Response from toggling a completion
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    #[serde(skip)]
    pub message: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub habit: Habit,
}

pub fn toggle_habit<S: HabitStorage>(
    service: &HabitService<S>,
    params: ToggleHabitParams,
) -> Result<ToggleHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = parse_date_or_today(params.date.as_deref())?;

    let habit = service.toggle_completion(&habit_id, date)?;
    let completed = habit.is_completed_on(date);

    let message = if completed {
        format!("🔥 Marked '{}' as done on {}", habit.name, date)
    } else {
        format!("↩️ Unmarked '{}' on {}", habit.name, date)
    };

    Ok(ToggleHabitResponse {
        message,
        date,
        completed,
        habit,
    })
}
