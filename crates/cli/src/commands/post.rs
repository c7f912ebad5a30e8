//! Post command - compose today's post and publish it

use anyhow::{Context, Result, bail};
use memo_poster_adapters::history::JsonHistoryStore;
use memo_poster_adapters::llm::{LlmConfig as AdapterLlmConfig, OpenAiGenerator};
use memo_poster_adapters::persona::FsPersonaRepo;
use memo_poster_adapters::x::{XCredentials, XPublisher};
use memo_poster_domain::usecases::{PostOnce, PostOnceConfig};
use memo_poster_domain::{
    Persona, PersonaRepo, Publisher, StrategyKind, SystemClock, TextGenerator,
};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::args::PostArgs;
use crate::config::AppConfig;

pub async fn execute(args: PostArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let dry_run = args.dry_run || config.general.dry_run;
    let generation = config.generation.resolved();

    tracing::info!(
        dry_run = dry_run,
        strategy = ?generation.strategy,
        "Starting memo-poster run"
    );

    let persona = load_persona(&config.general.persona_path).await?;
    let history_store = Arc::new(JsonHistoryStore::new(&config.general.history_path));

    let publisher: Arc<dyn Publisher> = if config.x.enabled && !dry_run {
        Arc::new(build_x_publisher(&config)?)
    } else {
        Arc::new(XPublisher::disabled())
    };

    let text_generator = build_generator(&config, generation.strategy)?;

    let post_once = PostOnce::new(
        publisher,
        history_store,
        Arc::new(SystemClock),
        text_generator,
        persona,
        PostOnceConfig {
            strategy: generation.strategy,
            dry_run,
            history_cap: generation.history_cap,
            max_attempts: generation.max_attempts,
            similarity: generation.similarity,
            repo_id: resolve_repo_id(&config),
        },
    );

    let report = post_once.execute().await?;

    match report.receipt {
        Some(receipt) => {
            println!("Posted: {}", receipt.id);
            if let Some(url) = receipt.url {
                println!("{}", url);
            }
        }
        None => {
            println!("[dry-run] {}", report.post.text);
        }
    }

    Ok(())
}

/// Missing persona file is not an error; the defaults describe a usable
/// (if bland) persona
pub(crate) async fn load_persona(path: &Path) -> Result<Persona> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Persona file not found, using defaults");
        return Ok(Persona::default());
    }

    FsPersonaRepo::new(path)
        .load()
        .await
        .context("Failed to load persona")
}

/// Repository identifier mixed into the daily seed
pub(crate) fn resolve_repo_id(config: &AppConfig) -> String {
    std::env::var(&config.general.repository_env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "local".to_string())
}

pub(crate) fn build_generator(
    config: &AppConfig,
    strategy: StrategyKind,
) -> Result<Option<Arc<dyn TextGenerator>>> {
    if strategy != StrategyKind::Generative {
        return Ok(None);
    }

    let api_key = load_credential(&config.llm.api_key_env, "llm")?;
    let generator = OpenAiGenerator::with_base_url(
        api_key,
        config.llm.base_url.clone(),
        AdapterLlmConfig {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            top_p: config.llm.top_p,
            max_output_tokens: config.llm.max_output_tokens,
            timeout_secs: config.llm.timeout_secs,
        },
    );

    Ok(Some(Arc::new(generator)))
}

fn build_x_publisher(config: &AppConfig) -> Result<XPublisher> {
    let credentials = XCredentials {
        api_key: load_credential_plain(&config.x.api_key_env, "x")?,
        api_secret: load_credential(&config.x.api_secret_env, "x")?,
        access_token: load_credential_plain(&config.x.access_token_env, "x")?,
        access_secret: load_credential(&config.x.access_secret_env, "x")?,
    };

    Ok(XPublisher::with_base_url(
        credentials,
        config.x.base_url.clone(),
        config.x.max_chars,
        true,
    ))
}

pub(crate) fn load_credential(env_var: &str, component: &str) -> Result<SecretString> {
    Ok(SecretString::new(
        load_credential_plain(env_var, component)?.into(),
    ))
}

fn load_credential_plain(env_var: &str, component: &str) -> Result<String> {
    if env_var.trim().is_empty() {
        bail!("No credential env var configured for {}", component);
    }

    let value = std::env::var(env_var)
        .with_context(|| format!("Missing credential env var {} for {}", env_var, component))?;

    if value.trim().is_empty() {
        bail!("Credential env var {} is empty for {}", env_var, component);
    }

    Ok(value)
}
