//! Doodle pad - drawing surface engine
//!
//! Speaks JSON lines over stdin/stdout with the UI shell; logs go to stderr.

mod bridge;
mod clipboard;
mod config;
mod logging;
mod pad;
mod runner;
mod store;
mod tool_state;

use anyhow::Context;
use doodle_suggest::RemoteSuggester;
use tokio::io::BufReader;
use tracing::info;

use clipboard::SystemClipboard;
use config::AppConfig;
use logging::LogConfig;
use pad::DoodlePad;
use store::FileStore;

fn main() -> anyhow::Result<()> {
    logging::init(LogConfig::from_env());

    let config = AppConfig::from_env();
    let store = FileStore::new(&config.data_dir);
    info!("Drawing storage at {}", store.path().display());

    let suggester = config.suggest_url.clone().map(RemoteSuggester::new);
    match &suggester {
        Some(suggester) => info!("Color suggestions via {}", suggester.server_url()),
        None => info!("Color suggestions disabled (DOODLE_SUGGEST_URL not set)"),
    }

    let pad = DoodlePad::new(
        store,
        SystemClipboard,
        config.download_dir.clone(),
        suggester.is_some(),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let local = tokio::task::LocalSet::new();

    local.block_on(
        &runtime,
        runner::run(
            pad,
            suggester,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        ),
    )
}
