//! Preview command - compose today's post and print it

use anyhow::{Context, Result};
use memo_poster_adapters::history::JsonHistoryStore;
use memo_poster_adapters::x::XPublisher;
use memo_poster_domain::usecases::{PostOnce, PostOnceConfig};
use memo_poster_domain::{HistoryStore, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::PreviewArgs;
use crate::commands::post::{build_generator, load_persona, resolve_repo_id};
use crate::config::AppConfig;

pub async fn execute(args: PreviewArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let generation = config.generation.resolved();

    let persona = load_persona(&config.general.persona_path).await?;
    let history_store = Arc::new(JsonHistoryStore::new(&config.general.history_path));

    let history = match history_store.load().await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load history, previewing against empty");
            vec![]
        }
    };

    let text_generator = build_generator(&config, generation.strategy)?;

    // Publisher is never reached: preview only composes
    let post_once = PostOnce::new(
        Arc::new(XPublisher::disabled()),
        history_store,
        Arc::new(SystemClock),
        text_generator,
        persona,
        PostOnceConfig {
            strategy: generation.strategy,
            dry_run: true,
            history_cap: generation.history_cap,
            max_attempts: generation.max_attempts,
            similarity: generation.similarity,
            repo_id: resolve_repo_id(&config),
        },
    );

    let post = post_once
        .compose(&history)
        .await
        .context("Failed to compose post")?;

    if args.json {
        let output = serde_json::json!({
            "text": post.text,
            "chars": post.text.chars().count(),
            "attempts": post.attempts,
            "used_fallback": post.used_fallback,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", post.text);
    }

    Ok(())
}
