/// Main entry point for the HabitFlow MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habitflow::HabitFlowServer;

const DATABASE_FILE: &str = "habits.db";

/// Resolve `habits.db` under the first writable data directory
///
/// Prefers `~/.habitflow`, then the platform data and config directories,
/// then `./.habitflow`. The system temp directory is the last resort.
fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|home| home.join(".habitflow")),
        dirs::data_dir().map(|data| data.join("habitflow")),
        dirs::config_dir().map(|config| config.join("habitflow")),
        std::env::current_dir().ok().map(|cwd| cwd.join(".habitflow")),
    ];

    if let Some(dir) = candidates.into_iter().flatten().find(|dir| is_writable_dir(dir)) {
        return Ok(dir.join(DATABASE_FILE));
    }

    let dir = std::env::temp_dir().join("habitflow");
    std::fs::create_dir_all(&dir)?;
    warn!("No writable data directory found, using {}", dir.display());
    Ok(dir.join(DATABASE_FILE))
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(".write_check");
    let writable = std::fs::write(&marker, b"").is_ok();
    let _ = std::fs::remove_file(&marker);
    writable
}

/// Command line arguments for the HabitFlow MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, conflicts_with = "in_memory")]
    database: Option<PathBuf>,

    /// Keep habits in memory only; nothing is written to disk
    #[arg(long)]
    in_memory: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habitflow={}", log_level))
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    info!("Starting HabitFlow MCP server");

    let server = if args.in_memory {
        HabitFlowServer::in_memory()
    } else {
        let db_path = match args.database {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            None => default_database_path()?,
        };

        info!("Using database at: {}", db_path.display());
        HabitFlowServer::new(db_path).await?
    };

    server.run().await?;

    info!("HabitFlow MCP server shutdown complete");
    Ok(())
}
