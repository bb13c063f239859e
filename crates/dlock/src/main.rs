//! dlock - Entry Point
//!
//! Command-line front end for the lock: probe the configured store, or run
//! a command while holding a lock.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dlock ping` | Check out a pooled connection and `PING` the store |
//! | `dlock exec --key K -- CMD ARGS...` | Run `CMD` while holding lock `K` |

mod commands;

use clap::{Parser, Subcommand};
use commands::ExecArgs;
use dlock_infrastructure::ConfigLoader;
use dlock_infrastructure::logging::init_logging;
use std::process::ExitCode;

/// Command line interface for dlock
#[derive(Parser, Debug)]
#[command(name = "dlock")]
#[command(about = "dlock - Distributed locks on Redis")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the configured store answers PING
    Ping,
    /// Run a command while holding a lock
    Exec(ExecArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    let code = match cli.command {
        Command::Ping => commands::ping(&config).await,
        Command::Exec(args) => commands::exec(&config, args).await,
    };
    Ok(code)
}
