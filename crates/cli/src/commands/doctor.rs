//! Doctor command - validate configuration and show status

use anyhow::Result;
use memo_poster_adapters::history::JsonHistoryStore;
use memo_poster_adapters::persona::FsPersonaRepo;
use memo_poster_domain::{HistoryStore, PersonaRepo, StrategyKind};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    persona: CheckResult,
    history: CheckResult,
    llm: CheckResult,
    x: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        persona: CheckResult::error("Not checked"),
        history: CheckResult::error("Not checked"),
        llm: CheckResult::error("Not checked"),
        x: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.persona = check_persona(config).await;
        report.history = check_history(config).await;
        report.llm = check_llm(config);
        report.x = check_x(config);
    }

    // Determine overall status
    let checks = [
        &report.config,
        &report.persona,
        &report.history,
        &report.llm,
        &report.x,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_persona(config: &AppConfig) -> CheckResult {
    let path = &config.general.persona_path;

    if !path.exists() {
        return CheckResult::warn(format!(
            "Persona file not found, defaults will be used: {}",
            path.display()
        ));
    }

    match FsPersonaRepo::new(path).load().await {
        Ok(persona) => CheckResult::ok(format!(
            "Persona: {}, max_chars: {}",
            if persona.name.is_empty() {
                "(unnamed)"
            } else {
                persona.name.as_str()
            },
            persona.guardrails.max_chars
        ))
        .with_details(serde_json::json!({
            "banned_words": persona.guardrails.banned_words.len(),
            "example_posts": persona.example_posts.len(),
            "topics": persona.content_preferences.topics_pool.len(),
        })),
        Err(e) => CheckResult::error(format!("Failed to load persona: {}", e)),
    }
}

async fn check_history(config: &AppConfig) -> CheckResult {
    let path = &config.general.history_path;

    if !path.exists() {
        return CheckResult::ok(format!(
            "History file will be created on first post: {}",
            path.display()
        ));
    }

    match JsonHistoryStore::new(path).load().await {
        Ok(entries) => CheckResult::ok(format!("{} history entries", entries.len())),
        Err(e) => CheckResult::warn(format!(
            "History unreadable, runs will start empty: {}",
            e
        )),
    }
}

fn check_llm(config: &AppConfig) -> CheckResult {
    if config.generation.strategy != StrategyKind::Generative {
        return CheckResult::ok("Not used by the template strategy");
    }

    let env_var = &config.llm.api_key_env;
    if env_var.trim().is_empty() {
        return CheckResult::error("No API key env var configured for the LLM");
    }

    // Check if API key env var is set (without revealing the value)
    match std::env::var(env_var) {
        Ok(val) if !val.trim().is_empty() => CheckResult::ok(format!(
            "Model: {}, API key: {} (set)",
            config.llm.model, env_var
        )),
        _ => CheckResult::error(format!(
            "Model: {}, API key: {} (not set)",
            config.llm.model, env_var
        )),
    }
}

fn check_x(config: &AppConfig) -> CheckResult {
    if !config.x.enabled {
        return CheckResult::ok("X publishing disabled");
    }

    let env_vars = [
        &config.x.api_key_env,
        &config.x.api_secret_env,
        &config.x.access_token_env,
        &config.x.access_secret_env,
    ];

    let missing: Vec<&str> = env_vars
        .iter()
        .filter(|v| {
            std::env::var(v.as_str())
                .map(|val| val.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|v| v.as_str())
        .collect();

    if missing.is_empty() {
        CheckResult::ok(format!(
            "All credentials set, max_chars: {}",
            config.x.max_chars
        ))
    } else {
        CheckResult::error(format!("Credentials not set: {}", missing.join(", ")))
    }
}

fn print_report(report: &DoctorReport) {
    println!("memo-poster Doctor Report");
    println!("=========================");
    println!();

    print_check("Config", &report.config);
    print_check("Persona", &report.persona);
    print_check("History", &report.history);
    print_check("LLM", &report.llm);
    print_check("X", &report.x);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: memo-poster post --dry-run");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
