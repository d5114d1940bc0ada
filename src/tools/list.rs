/// Tools for reading habits
///
/// This module implements the habit_list and habit_get MCP tools.

use serde::{Deserialize, Serialize};
use crate::domain::Habit;
use crate::service::HabitService;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for fetching a single habit
#[derive(Debug, Deserialize)]
pub struct GetHabitParams {
    pub habit_id: String,
}

/// Response carrying one habit
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    #[serde(skip)]
    pub message: String,
    pub habit: Habit,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    #[serde(skip)]
    pub message: String,
    pub habits: Vec<Habit>,
}

/// Fetch a single habit by ID
pub fn get_habit<S: HabitStorage>(
    service: &HabitService<S>,
    params: GetHabitParams,
) -> Result<HabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = service.get_habit(&habit_id)?;

    let message = format!(
        "🎯 {} ({} day{} completed)",
        habit.name,
        habit.completion_count(),
        if habit.completion_count() == 1 { "" } else { "s" }
    );
    Ok(HabitResponse { message, habit })
}

/// List every habit in creation order
pub fn list_habits<S: HabitStorage>(
    service: &HabitService<S>,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = service.list_habits()?;

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        format!("📋 {} habit{}", habits.len(), if habits.len() == 1 { "" } else { "s" })
    };
    Ok(ListHabitsResponse { message, habits })
}
