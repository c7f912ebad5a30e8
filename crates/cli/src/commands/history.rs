//! History command - show stored post history

use anyhow::Result;
use memo_poster_adapters::history::JsonHistoryStore;
use memo_poster_domain::HistoryStore;
use std::path::PathBuf;

use crate::args::HistoryArgs;
use crate::config::AppConfig;

pub async fn execute(args: HistoryArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let store = JsonHistoryStore::new(&config.general.history_path);
    let entries = store.load().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    // Newest entries are at the end of the file
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry);
    }

    Ok(())
}
