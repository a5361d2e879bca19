//! Publish command - create or update articles on the platform APIs

use anyhow::{Context, Result};
use crosspub_adapters::articles::FsArticleSource;
use crosspub_adapters::state::JsonStateStore;
use crosspub_adapters::variants::FsVariantRepo;
use crosspub_adapters::{DevtoPublisher, QiitaPublisher};
use crosspub_domain::usecases::{PublishConfig, PublishRun, PublishSummary};
use crosspub_domain::{FixedDelay, PlatformPublisher, PublishOutcome, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::args::PublishArgs;
use crate::config::{AppConfig, load_token};

pub async fn execute(args: PublishArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!(
        articles_dir = %config.general.articles_dir.display(),
        dry_run = args.dry_run,
        "Starting publish run"
    );

    let source = Arc::new(FsArticleSource::new(&config.general.articles_dir));
    let variants = Arc::new(FsVariantRepo::new(
        &config.qiita.output_dir,
        &config.devto.output_dir,
    ));
    let state_store = Arc::new(JsonStateStore::new(&config.general.state_file));

    let qiita: Arc<dyn PlatformPublisher> = match load_token(&config.qiita.api_token_env) {
        Some(token) => Arc::new(QiitaPublisher::with_base_url(
            token,
            config.qiita.base_url.clone(),
        )),
        None => {
            tracing::info!(env = %config.qiita.api_token_env, "Qiita token not set, publishing disabled");
            Arc::new(QiitaPublisher::disabled())
        }
    };

    let devto: Arc<dyn PlatformPublisher> = match load_token(&config.devto.api_key_env) {
        Some(key) => Arc::new(DevtoPublisher::with_base_url(
            key,
            config.devto.base_url.clone(),
        )),
        None => {
            tracing::info!(env = %config.devto.api_key_env, "Dev.to api key not set, publishing disabled");
            Arc::new(DevtoPublisher::disabled())
        }
    };

    let pacer = Arc::new(FixedDelay::new(Duration::from_millis(
        config.general.article_delay_ms,
    )));
    let clock = Arc::new(SystemClock);

    let run = PublishRun::new(
        source,
        variants,
        qiita,
        devto,
        state_store,
        pacer,
        clock,
        PublishConfig {
            dry_run: args.dry_run,
            zenn_enabled: config.zenn.enabled,
        },
    );

    let outcomes = run.run().await.context("Publish run failed")?;

    for (slug, platform, outcome) in &outcomes {
        match outcome {
            PublishOutcome::Published { id, url, updated } => {
                tracing::info!(
                    slug = %slug,
                    platform = %platform,
                    id = %id,
                    url = %url,
                    updated = updated,
                    "Published"
                );
            }
            PublishOutcome::Skipped { reason } => {
                tracing::debug!(slug = %slug, platform = %platform, reason = %reason, "Skipped");
            }
            PublishOutcome::Failed { error } => {
                tracing::error!(slug = %slug, platform = %platform, error = %error, "Failed");
            }
        }
    }

    let summary = PublishSummary::from_outcomes(&outcomes);
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        failed = summary.failed,
        "Publish finished"
    );

    // Individual publish failures degrade gracefully; the run still exits 0
    Ok(())
}
