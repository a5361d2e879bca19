//! Convert command - render platform variants for changed articles

use anyhow::{Context, Result};
use crosspub_adapters::articles::{FsArticleSource, GitChangeDetector};
use crosspub_adapters::variants::FsVariantRepo;
use crosspub_domain::usecases::{ConvertConfig, ConvertRun};
use crosspub_domain::usecases::transform::AssetConfig;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::ConvertArgs;
use crate::config::AppConfig;

pub async fn execute(args: ConvertArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!(
        articles_dir = %config.general.articles_dir.display(),
        all = args.all,
        "Starting convert run"
    );

    let detector = Arc::new(GitChangeDetector::new(".", &config.general.articles_dir));
    let source = Arc::new(
        FsArticleSource::new(&config.general.articles_dir).with_change_detector(detector),
    );
    let variants = Arc::new(FsVariantRepo::new(
        &config.qiita.output_dir,
        &config.devto.output_dir,
    ));

    let run = ConvertRun::new(
        source,
        variants,
        ConvertConfig {
            assets: AssetConfig {
                raw_base_url: config.assets.raw_base_url.clone(),
            },
            changed_only: !args.all,
        },
    );

    let summary = run.run().await.context("Convert run failed")?;

    tracing::info!(
        articles = summary.articles,
        qiita = summary.qiita_written,
        devto = summary.devto_written,
        "Convert finished"
    );

    Ok(())
}
