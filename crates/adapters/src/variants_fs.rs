//! Per-platform variant files on disk

use async_trait::async_trait;
use crosspub_domain::{Platform, VariantError, VariantRepo};
use std::path::{Path, PathBuf};

/// Stores variant documents under one output directory per platform,
/// named `<slug>.md`.
pub struct FsVariantRepo {
    qiita_dir: PathBuf,
    devto_dir: PathBuf,
}

impl FsVariantRepo {
    pub fn new(qiita_dir: impl AsRef<Path>, devto_dir: impl AsRef<Path>) -> Self {
        Self {
            qiita_dir: qiita_dir.as_ref().to_path_buf(),
            devto_dir: devto_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, platform: Platform, slug: &str) -> PathBuf {
        let dir = match platform {
            Platform::Qiita => &self.qiita_dir,
            // Zenn variants are never requested; the source tree is the
            // Zenn tree.
            Platform::Devto | Platform::Zenn => &self.devto_dir,
        };
        dir.join(format!("{slug}.md"))
    }
}

#[async_trait]
impl VariantRepo for FsVariantRepo {
    async fn write(
        &self,
        platform: Platform,
        slug: &str,
        document: &str,
    ) -> Result<PathBuf, VariantError> {
        let path = self.path_for(platform, slug);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, document)?;
        Ok(path)
    }

    async fn read(&self, platform: Platform, slug: &str) -> Result<Option<String>, VariantError> {
        let path = self.path_for(platform, slug);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }
}
