//! Forced translation run: deletes every target language's bundle first,
//! then translates all of them from scratch.
//!
//! Usage:
//!   cargo run --bin force-retranslate
//!
//! Takes the same environment variables as `translate-batch`.

use anyhow::Result;
use langpack_translator::batch::{self, RunMode};
use langpack_translator::config::Config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("langpack_translator=info".parse()?)
                .add_directive("force_retranslate=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    warn!(
        "Force mode: every target bundle in {} will be deleted and retranslated",
        config.output_dir.display()
    );

    let report = batch::run(&config, RunMode::Force).await?;
    info!(
        "Forced run finished: {} translated, {} failed",
        report.saved, report.failed
    );

    Ok(())
}
