/// Domain module containing the habit entity and its rules
///
/// This module defines the Habit entity, its validation, the completion
/// toggle, and the activity summary built from completion history. Nothing
/// in here knows about storage or transport.

pub mod habit;
pub mod activity;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use activity::*;
pub use types::*;

use thiserror::Error;

/// Caller-supplied data that violates a habit invariant at creation time
///
/// Always recoverable: the caller can resubmit corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Habit name cannot be blank")]
    BlankName,

    #[error("{}", invalid_goal_message(.0))]
    InvalidGoal(i64),
}

fn invalid_goal_message(days: &i64) -> String {
    if *days <= 0 {
        format!("Goal days must be greater than 0, got {}", days)
    } else {
        format!("Goal days must be at most {}, got {}", u32::MAX, days)
    }
}
