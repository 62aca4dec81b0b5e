//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `phishguard` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing summary output
//!
//! Results go to stdout as JSON lines; the summary and logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use phishguard::initialization::init_logger_with;
use phishguard::{run_classification, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // PHISHGUARD_BUNDLE may be set in .env, next to the binary or in the cwd
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_classification(config).await {
        Ok(report) => {
            eprintln!(
                "Classified {} URL{} ({} phishing, {} legitimate, {} failed) in {:.1}s",
                report.total,
                if report.total == 1 { "" } else { "s" },
                report.phishing,
                report.legitimate,
                report.failed,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("phishguard error: {:#}", e);
            process::exit(1);
        }
    }
}
