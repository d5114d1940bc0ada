/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};
use crate::domain::Habit;
use crate::service::HabitService;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "goalDays")]
    pub goal_days: Option<i64>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    #[serde(skip)]
    pub message: String,
    pub habit: Habit,
}

/// Create a new habit through the service
pub fn create_habit<S: HabitStorage>(
    service: &HabitService<S>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let habit = service.create_habit(&params.name, params.description, params.goal_days)?;

    let message = match habit.goal_days {
        Some(goal) => format!("✅ Created habit '{}' with a goal of {} days", habit.name, goal),
        None => format!("✅ Created habit '{}'", habit.name),
    };

    Ok(CreateHabitResponse { message, habit })
}
