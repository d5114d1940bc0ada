/// Tools for the cross-habit activity view
///
/// This module implements the habit_activity and habit_progress MCP tools.

use serde::{Deserialize, Serialize};
use crate::domain::{ActivitySummary, DayProgress};
use crate::service::HabitService;
use crate::storage::HabitStorage;
use crate::tools::{parse_date_or_today, ToolError};

/// Response from the activity tool
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(skip)]
    pub message: String,
    #[serde(flatten)]
    pub summary: ActivitySummary,
}

/// Parameters for the day progress tool
#[derive(Debug, Default, Deserialize)]
pub struct ProgressParams {
    /// `YYYY-MM-DD`; defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

/// Response from the day progress tool
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    #[serde(skip)]
    pub message: String,
    #[serde(flatten)]
    pub progress: DayProgress,
}

pub fn get_activity<S: HabitStorage>(
    service: &HabitService<S>,
) -> Result<ActivityResponse, ToolError> {
    let summary = service.get_activity()?;

    let message = if summary.is_empty() {
        "No completions recorded yet.".to_string()
    } else {
        format!(
            "📊 {} completions across {} active days",
            summary.total_completions(),
            summary.activity.len()
        )
    };
    Ok(ActivityResponse { message, summary })
}

pub fn get_progress<S: HabitStorage>(
    service: &HabitService<S>,
    params: ProgressParams,
) -> Result<ProgressResponse, ToolError> {
    let date = parse_date_or_today(params.date.as_deref())?;
    let progress = service.day_progress(date)?;

    let message = format!(
        "✅ {}/{} habits done on {}",
        progress.completed, progress.total, progress.date
    );
    Ok(ProgressResponse { message, progress })
}
