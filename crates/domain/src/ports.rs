//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Article, ArticlePayload, Platform};

/// Error type for article loading
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
}

/// Port for loading eligible source articles
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Load every eligible article from the articles directory
    async fn load_all(&self) -> Result<Vec<Article>, ArticleError>;

    /// Load eligible articles changed since the previous commit.
    ///
    /// Falls back to a full scan when no change information is available.
    async fn load_changed(&self) -> Result<Vec<Article>, ArticleError>;
}

/// Error type for the version-control diff collaborator
#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("git invocation failed: {0}")]
    Command(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for detecting changed article files between the two most recent
/// commits
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    async fn changed_files(&self) -> Result<Vec<PathBuf>, ChangeError>;
}

/// Error type for variant file storage
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for platform-specific variant documents on disk
#[async_trait]
pub trait VariantRepo: Send + Sync {
    /// Write a variant document, creating the output directory as needed.
    /// Returns the written path.
    async fn write(
        &self,
        platform: Platform,
        slug: &str,
        document: &str,
    ) -> Result<PathBuf, VariantError>;

    /// Read back a variant document; `None` when it was never written
    async fn read(&self, platform: Platform, slug: &str) -> Result<Option<String>, VariantError>;
}

/// Error type for publisher operations
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    Network(String),
}

/// Result of a successful publish operation
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Platform-assigned article id
    pub id: String,
    /// Canonical URL of the published article
    pub url: String,
}

/// Port for a platform's article API
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Create a new article
    async fn create(&self, payload: &ArticlePayload) -> Result<PublishResult, PublishError>;

    /// Update an existing article by its platform id
    async fn update(
        &self,
        id: &str,
        payload: &ArticlePayload,
    ) -> Result<PublishResult, PublishError>;

    /// Whether a credential is configured for this platform
    fn is_enabled(&self) -> bool;

    /// The platform this publisher targets
    fn platform(&self) -> Platform;
}

/// Error type for state store operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the persisted publish state
///
/// Loaded once at run start, mutated in memory, saved once at run end.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted state, empty when no prior state exists
    async fn load(&self) -> Result<crate::model::PublishState, StateError>;

    /// Persist the state as a whole-file overwrite
    async fn save(&self, state: &crate::model::PublishState) -> Result<(), StateError>;
}

/// Port for the inter-article courtesy delay (enables tests without real
/// waiting)
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Fixed delay backed by the tokio timer
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No-op pacer for tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

#[async_trait]
impl Pacer for NoPause {
    async fn pause(&self) {}
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
