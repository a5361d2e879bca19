//! Publish run - reconciles local articles against the platform APIs
//!
//! For each eligible article and each API platform the run decides
//! create-vs-update from the persisted state, calls the platform adapter, and
//! upserts the returned identifiers. The state is loaded once at run start
//! and saved exactly once at run end; an individual publish failure never
//! aborts the run.

use std::sync::Arc;
use thiserror::Error;

use crate::model::{Article, Platform, PlatformRecord, PublishOutcome, PublishState};
use crate::ports::{
    ArticleError, ArticleSource, Clock, Pacer, PlatformPublisher, StateError, StateStore,
    VariantRepo,
};
use crate::usecases::transform;

/// Configuration for a publish run
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Log what would be published without calling any API
    pub dry_run: bool,
    /// Acknowledge articles published on Zenn by the git integration
    pub zenn_enabled: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            zenn_enabled: true,
        }
    }
}

/// Aggregate counts over the outcomes of a publish run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PublishSummary {
    pub fn from_outcomes(outcomes: &[(String, Platform, PublishOutcome)]) -> Self {
        let mut summary = Self::default();
        for (_, _, outcome) in outcomes {
            match outcome {
                PublishOutcome::Published { updated: true, .. } => summary.updated += 1,
                PublishOutcome::Published { updated: false, .. } => summary.created += 1,
                PublishOutcome::Skipped { .. } => summary.skipped += 1,
                PublishOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Errors that abort a publish run
#[derive(Debug, Error)]
pub enum PublishRunError {
    #[error("Article source error: {0}")]
    Source(#[from] ArticleError),
    #[error("State store error: {0}")]
    State(#[from] StateError),
}

/// Publish run orchestrator
pub struct PublishRun<S, V, Q, D, St, P, Cl>
where
    S: ArticleSource + ?Sized,
    V: VariantRepo + ?Sized,
    Q: PlatformPublisher + ?Sized,
    D: PlatformPublisher + ?Sized,
    St: StateStore + ?Sized,
    P: Pacer + ?Sized,
    Cl: Clock + ?Sized,
{
    source: Arc<S>,
    variants: Arc<V>,
    qiita: Arc<Q>,
    devto: Arc<D>,
    state_store: Arc<St>,
    pacer: Arc<P>,
    clock: Arc<Cl>,
    config: PublishConfig,
}

impl<S, V, Q, D, St, P, Cl> PublishRun<S, V, Q, D, St, P, Cl>
where
    S: ArticleSource + ?Sized,
    V: VariantRepo + ?Sized,
    Q: PlatformPublisher + ?Sized,
    D: PlatformPublisher + ?Sized,
    St: StateStore + ?Sized,
    P: Pacer + ?Sized,
    Cl: Clock + ?Sized,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<S>,
        variants: Arc<V>,
        qiita: Arc<Q>,
        devto: Arc<D>,
        state_store: Arc<St>,
        pacer: Arc<P>,
        clock: Arc<Cl>,
        config: PublishConfig,
    ) -> Self {
        Self {
            source,
            variants,
            qiita,
            devto,
            state_store,
            pacer,
            clock,
            config,
        }
    }

    /// Run a full publish cycle over every eligible article
    pub async fn run(
        &self,
    ) -> Result<Vec<(String, Platform, PublishOutcome)>, PublishRunError> {
        let articles = self.source.load_all().await?;
        let mut state = self.state_store.load().await?;

        tracing::info!(count = articles.len(), "Loaded eligible articles");

        let mut outcomes = Vec::new();

        for article in &articles {
            tracing::info!(slug = %article.slug, "Processing article");

            let outcome = self
                .publish_one(self.qiita.as_ref(), article, &mut state)
                .await;
            outcomes.push((article.slug.clone(), Platform::Qiita, outcome));

            let outcome = self
                .publish_one(self.devto.as_ref(), article, &mut state)
                .await;
            outcomes.push((article.slug.clone(), Platform::Devto, outcome));

            // Zenn is published by the git integration; acknowledge only.
            if self.config.zenn_enabled && article.front.published {
                tracing::info!(slug = %article.slug, "zenn: published by git integration");
                outcomes.push((
                    article.slug.clone(),
                    Platform::Zenn,
                    PublishOutcome::Skipped {
                        reason: "published by git integration".to_string(),
                    },
                ));
            }

            // Rate-limit courtesy between articles
            self.pacer.pause().await;
        }

        self.state_store.save(&state).await?;

        let summary = PublishSummary::from_outcomes(&outcomes);
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Publish run complete"
        );

        Ok(outcomes)
    }

    /// Publish one article to one platform, upserting state on success
    async fn publish_one<Pb>(
        &self,
        publisher: &Pb,
        article: &Article,
        state: &mut PublishState,
    ) -> PublishOutcome
    where
        Pb: PlatformPublisher + ?Sized,
    {
        let platform = publisher.platform();
        let slug = article.slug.as_str();

        if !article.platform_enabled(platform) {
            tracing::debug!(slug, %platform, "Platform toggle disabled");
            return PublishOutcome::Skipped {
                reason: "platform toggle disabled".to_string(),
            };
        }

        if !publisher.is_enabled() {
            tracing::info!(slug, %platform, "Credential not configured, skipping");
            return PublishOutcome::Skipped {
                reason: "credential not configured".to_string(),
            };
        }

        let document = match self.variants.read(platform, slug).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::warn!(slug, %platform, "Variant file missing, skipping");
                return PublishOutcome::Skipped {
                    reason: "variant file missing".to_string(),
                };
            }
            Err(e) => {
                tracing::error!(slug, %platform, error = %e, "Failed to read variant");
                return PublishOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let payload = match transform::payload_for(platform, &document) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(slug, %platform, error = %e, "Malformed variant, skipping");
                return PublishOutcome::Skipped {
                    reason: format!("malformed variant: {e}"),
                };
            }
        };

        let existing_id = state.get(slug, platform).map(|record| record.id.clone());

        if self.config.dry_run {
            tracing::info!(
                slug,
                %platform,
                action = if existing_id.is_some() { "update" } else { "create" },
                title = %payload.title,
                "[DRY RUN] Would publish"
            );
            return PublishOutcome::Skipped {
                reason: "dry run".to_string(),
            };
        }

        let result = match &existing_id {
            Some(id) => {
                tracing::info!(slug, %platform, id = %id, "Updating article");
                publisher.update(id, &payload).await
            }
            None => {
                tracing::info!(slug, %platform, "Creating article");
                publisher.create(&payload).await
            }
        };

        match result {
            Ok(published) => {
                state.upsert(
                    slug,
                    platform,
                    PlatformRecord {
                        id: published.id.clone(),
                        url: published.url.clone(),
                        published_at: self.clock.now(),
                    },
                );
                tracing::info!(slug, %platform, url = %published.url, "Published");
                PublishOutcome::Published {
                    id: published.id,
                    url: published.url,
                    updated: existing_id.is_some(),
                }
            }
            Err(e) => {
                tracing::error!(slug, %platform, error = %e, "Publish failed");
                PublishOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
