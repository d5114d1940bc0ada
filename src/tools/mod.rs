/// MCP tools for habit management
///
/// Each tool turns loosely typed arguments into service calls and wraps the
/// result in a serializable response. Argument problems that the service
/// never sees (unparseable dates) are reported as `ToolError::InvalidArgument`.

pub mod create;
pub mod list;
pub mod delete;
pub mod toggle;
pub mod activity;

// Re-export tool functions for easy access
pub use create::*;
pub use list::*;
pub use delete::*;
pub use toggle::*;
pub use activity::*;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use crate::domain::HabitId;
use crate::service::HabitError;

/// Errors a tool call can produce
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Habit(#[from] HabitError),

    #[error("Failed to encode tool response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Whether the caller can fix this by changing its arguments
    pub fn is_recoverable(&self) -> bool {
        match self {
            ToolError::InvalidArgument(_) => true,
            ToolError::Habit(e) => e.is_recoverable(),
            ToolError::Serialization(_) => false,
        }
    }
}

/// Parse a habit ID argument
///
/// A string that is not a valid ID cannot name an existing habit, so it is
/// reported as not found rather than as a malformed argument.
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    HabitId::from_string(raw).map_err(|_| {
        ToolError::Habit(HabitError::NotFound {
            habit_id: raw.to_string(),
        })
    })
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today's UTC date
pub(crate) fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate, ToolError> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            ToolError::InvalidArgument(format!("Invalid date '{}', expected YYYY-MM-DD", s))
        }),
        None => Ok(Utc::now().date_naive()),
    }
}
