//! Filesystem article source

use async_trait::async_trait;
use crosspub_domain::frontmatter;
use crosspub_domain::{Article, ArticleError, ArticleSource, ChangeDetector};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads articles from a directory of markdown files.
///
/// Files that fail to parse or reference missing paths are skipped with a
/// diagnostic; only an unreadable articles directory is fatal.
pub struct FsArticleSource {
    articles_dir: PathBuf,
    change_detector: Option<Arc<dyn ChangeDetector>>,
}

impl FsArticleSource {
    pub fn new(articles_dir: impl AsRef<Path>) -> Self {
        Self {
            articles_dir: articles_dir.as_ref().to_path_buf(),
            change_detector: None,
        }
    }

    /// Attach a change detector used by `load_changed`
    pub fn with_change_detector(mut self, detector: Arc<dyn ChangeDetector>) -> Self {
        self.change_detector = Some(detector);
        self
    }

    fn load_file(&self, path: &Path) -> Option<Article> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let slug = path.file_stem()?.to_str()?.to_string();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable article");
                return None;
            }
        };

        match frontmatter::parse_article(&slug, &file_name, &content) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping malformed article");
                None
            }
        }
    }

    fn is_markdown(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some("md")
    }
}

#[async_trait]
impl ArticleSource for FsArticleSource {
    async fn load_all(&self) -> Result<Vec<Article>, ArticleError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.articles_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && Self::is_markdown(path))
            .collect();

        // Deterministic iteration order
        paths.sort();

        let articles: Vec<Article> = paths
            .iter()
            .filter_map(|path| self.load_file(path))
            .filter(Article::is_eligible)
            .collect();

        tracing::debug!(
            dir = %self.articles_dir.display(),
            count = articles.len(),
            "Scanned articles directory"
        );

        Ok(articles)
    }

    async fn load_changed(&self) -> Result<Vec<Article>, ArticleError> {
        let Some(detector) = &self.change_detector else {
            return self.load_all().await;
        };

        let changed = match detector.changed_files().await {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "Change detection failed, falling back to full scan");
                return self.load_all().await;
            }
        };

        tracing::info!(count = changed.len(), "Detected changed article files");

        let articles: Vec<Article> = changed
            .iter()
            .filter(|path| Self::is_markdown(path))
            .filter_map(|path| {
                if !path.exists() {
                    tracing::warn!(file = %path.display(), "Changed file not found, skipping");
                    return None;
                }
                self.load_file(path)
            })
            .filter(Article::is_eligible)
            .collect();

        Ok(articles)
    }
}
