/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion is permanent
/// and takes the habit's completion history with it.

use serde::{Deserialize, Serialize};
use crate::service::HabitService;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    #[serde(skip)]
    pub message: String,
    pub deleted: String,
}

pub fn delete_habit<S: HabitStorage>(
    service: &HabitService<S>,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    service.delete_habit(&habit_id)?;

    Ok(DeleteHabitResponse {
        message: format!("🗑️ Deleted habit {}", habit_id),
        deleted: habit_id.to_string(),
    })
}
