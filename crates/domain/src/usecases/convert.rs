//! Convert run - renders per-platform variants for changed articles

use std::sync::Arc;
use thiserror::Error;

use crate::model::Platform;
use crate::ports::{ArticleError, ArticleSource, VariantError, VariantRepo};
use crate::usecases::transform::{self, AssetConfig};

/// Configuration for a convert run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Asset host used for image link rewriting
    pub assets: AssetConfig,
    /// Convert only articles changed since the previous commit
    pub changed_only: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            assets: AssetConfig::default(),
            changed_only: true,
        }
    }
}

/// Per-platform counts reported at the end of a convert run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub articles: usize,
    pub qiita_written: usize,
    pub devto_written: usize,
}

/// Errors from the convert run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Article source error: {0}")]
    Source(#[from] ArticleError),
    #[error("Variant write error: {0}")]
    Variant(#[from] VariantError),
}

/// Convert run orchestrator
pub struct ConvertRun<S, V>
where
    S: ArticleSource + ?Sized,
    V: VariantRepo + ?Sized,
{
    source: Arc<S>,
    variants: Arc<V>,
    config: ConvertConfig,
}

impl<S, V> ConvertRun<S, V>
where
    S: ArticleSource + ?Sized,
    V: VariantRepo + ?Sized,
{
    pub fn new(source: Arc<S>, variants: Arc<V>, config: ConvertConfig) -> Self {
        Self {
            source,
            variants,
            config,
        }
    }

    pub async fn run(&self) -> Result<ConvertSummary, ConvertError> {
        let articles = if self.config.changed_only {
            self.source.load_changed().await?
        } else {
            self.source.load_all().await?
        };

        if articles.is_empty() {
            tracing::info!("No changed articles, nothing to convert");
            return Ok(ConvertSummary::default());
        }

        let mut summary = ConvertSummary {
            articles: articles.len(),
            ..Default::default()
        };

        for article in &articles {
            tracing::info!(slug = %article.slug, "Converting article");

            match transform::qiita_variant(article, &self.config.assets) {
                Some(variant) => {
                    let path = self
                        .variants
                        .write(Platform::Qiita, &article.slug, &variant.document)
                        .await?;
                    summary.qiita_written += 1;
                    tracing::info!(slug = %article.slug, path = %path.display(), "Wrote qiita variant");
                }
                None => {
                    tracing::debug!(slug = %article.slug, "Qiita disabled by platform toggle");
                }
            }

            match transform::devto_variant(article, &self.config.assets) {
                Some(variant) => {
                    let path = self
                        .variants
                        .write(Platform::Devto, &article.slug, &variant.document)
                        .await?;
                    summary.devto_written += 1;
                    tracing::info!(slug = %article.slug, path = %path.display(), "Wrote dev.to variant");
                }
                None => {
                    tracing::debug!(slug = %article.slug, "Dev.to disabled by platform toggle");
                }
            }
        }

        tracing::info!(
            articles = summary.articles,
            qiita = summary.qiita_written,
            devto = summary.devto_written,
            "Convert run complete"
        );

        Ok(summary)
    }
}
