//! `arise` command line client.
//!
//! Each invocation restores the saved game from the data directory, runs one
//! command through the runtime and shuts it down so every change is
//! persisted and, when online, synced.
//!
//! ```bash
//! arise plant math wheat
//! arise --offline score quiz 80
//! arise --lang hi status
//! ```
mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use arise_content::{ContentFactory, Language};
use arise_runtime::Runtime;
use clap::Parser;

use commands::Command;
use config::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "arise", version, about = "Offline-first AriseEDU learning game")]
struct Cli {
    /// Directory for saved progress and cached assets
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Start without network access; changes queue until the next online run
    #[arg(long, global = true)]
    offline: bool,

    /// Interface language code (en, hi, ...)
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.runtime.data_dir = Some(dir);
    }
    if cli.offline {
        config.runtime.start_online = false;
    }
    if cli.lang.is_some() {
        config.language = cli.lang;
    }

    let _log_guard = logging::setup_logging(config.session_id.as_deref())?;

    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let content = factory.load_content().context("loading game content")?;

    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .content(content)
        .build()
        .await
        .context("starting runtime")?;

    let handle = runtime.handle();
    if let Some(language) = config.language {
        handle.set_preferred_language(language)?;
    }
    let language = handle.preferred_language()?.unwrap_or_default();
    let translator = factory
        .load_translator(language)
        .context("loading translations")?;

    let outcome = commands::run(cli.command, &runtime, &translator).await;

    runtime.shutdown().await.context("shutting down runtime")?;
    outcome
}
