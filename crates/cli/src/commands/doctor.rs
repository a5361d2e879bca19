//! Doctor command - validate configuration and show status

use anyhow::Result;
use crosspub_adapters::state::JsonStateStore;
use crosspub_domain::StateStore;
use crosspub_domain::frontmatter;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::{AppConfig, load_token};

#[derive(Debug, Serialize)]
struct Check {
    name: String,
    ok: bool,
    detail: String,
}

impl Check {
    fn new(name: &str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            ok,
            detail: detail.into(),
        }
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let mut checks = Vec::new();

    checks.push(check_articles_dir(&config));
    checks.push(check_state_file(&config).await);
    checks.push(check_token("qiita_token", &config.qiita.api_token_env));
    checks.push(check_token("devto_api_key", &config.devto.api_key_env));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        for check in &checks {
            let marker = if check.ok { "ok" } else { "FAIL" };
            println!("[{marker}] {}: {}", check.name, check.detail);
        }
    }

    // Missing credentials are a supported mode; only structural problems fail
    let fatal = checks
        .iter()
        .any(|check| !check.ok && check.name != "qiita_token" && check.name != "devto_api_key");
    if fatal {
        anyhow::bail!("Doctor found problems");
    }

    Ok(())
}

fn check_articles_dir(config: &AppConfig) -> Check {
    let dir = &config.general.articles_dir;
    if !dir.is_dir() {
        return Check::new(
            "articles_dir",
            false,
            format!("{} is not a directory", dir.display()),
        );
    }

    let mut eligible = 0usize;
    let mut total = 0usize;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            total += 1;
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(content) = std::fs::read_to_string(&path) {
                if let Ok(article) = frontmatter::parse_article(slug, file_name, &content) {
                    if article.is_eligible() {
                        eligible += 1;
                    }
                }
            }
        }
    }

    Check::new(
        "articles_dir",
        true,
        format!("{total} articles, {eligible} eligible"),
    )
}

async fn check_state_file(config: &AppConfig) -> Check {
    let path = &config.general.state_file;
    if !path.exists() {
        return Check::new("state_file", true, "no prior state (first run)");
    }

    match JsonStateStore::new(path).load().await {
        Ok(state) => Check::new(
            "state_file",
            true,
            format!("{} slugs recorded", state.records.len()),
        ),
        Err(e) => Check::new("state_file", false, format!("unreadable: {e}")),
    }
}

fn check_token(name: &str, env_name: &str) -> Check {
    match load_token(env_name) {
        Some(_) => Check::new(name, true, format!("{env_name} is set")),
        None => Check::new(name, false, format!("{env_name} not set (will skip)")),
    }
}
