//! crosspub adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `articles`: Filesystem article source with git change detection
//! - `variants`: Per-platform variant file repository
//! - `state`: JSON file publish-state store
//! - `qiita` / `devto`: Platform API publishers

mod articles_fs;
mod devto;
mod git;
mod qiita;
mod state_json;
mod variants_fs;

/// Re-exports for article source adapters
pub mod articles {
    pub use crate::articles_fs::FsArticleSource;
    pub use crate::git::GitChangeDetector;
}

/// Re-exports for variant file adapters
pub mod variants {
    pub use crate::variants_fs::FsVariantRepo;
}

/// Re-exports for state adapters
pub mod state {
    pub use crate::state_json::JsonStateStore;
}

pub use devto::DevtoPublisher;
pub use qiita::QiitaPublisher;
