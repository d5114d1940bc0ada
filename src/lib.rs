/// Public library interface for the HabitFlow server
///
/// This module exports the habit domain, the storage backends, the habit
/// service, and the MCP server that exposes the service over stdio.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod service;
mod tools;
pub mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use service::{HabitError, HabitService};
pub use tools::ToolError;
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Habit service error: {0}")]
    Habit(#[from] HabitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage chosen at startup
pub type DynStorage = Box<dyn HabitStorage>;

/// Main HabitFlow server
///
/// Owns the habit service and whichever store backs it, and runs the MCP
/// protocol loop on top of them.
pub struct HabitFlowServer {
    service: HabitService<DynStorage>,
}

impl HabitFlowServer {
    /// Create a server backed by the SQLite database at `db_path`
    ///
    /// The schema is created or migrated if needed.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing HabitFlow server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Create a server whose habits only live as long as the process
    pub fn in_memory() -> Self {
        tracing::info!("Initializing HabitFlow server with in-memory storage");
        Self::with_storage(MemoryStorage::new())
    }

    pub fn with_storage<S: HabitStorage + 'static>(storage: S) -> Self {
        Self {
            service: HabitService::new(Box::new(storage)),
        }
    }

    /// Run the MCP server over stdin/stdout until the input closes
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let habits = self.service.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the habit service
    pub fn service(&self) -> &HabitService<DynStorage> {
        &self.service
    }
}
