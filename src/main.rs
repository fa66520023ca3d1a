//! Resumable translation run: languages already translated by a previous
//! run are skipped.
//!
//! Usage:
//!   cargo run --bin translate-batch
//!   TARGET_LANGUAGES=es,fr cargo run --bin translate-batch
//!
//! See `Config::from_env` for the environment variables.

use anyhow::Result;
use langpack_translator::batch::{self, RunMode};
use langpack_translator::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langpack_translator=info".parse()?),
        )
        .init();

    info!("Starting language pack translation");

    let config = Config::from_env()?;
    batch::run(&config, RunMode::Resume).await?;

    Ok(())
}
