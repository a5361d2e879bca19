//! Git change detection between the two most recent commits

use async_trait::async_trait;
use crosspub_domain::{ChangeDetector, ChangeError};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Lists article files changed between `HEAD~1` and `HEAD`.
///
/// Used only to narrow the convert run; any failure (shallow clone, first
/// commit, not a repository) is reported as an error and the caller falls
/// back to a full scan.
pub struct GitChangeDetector {
    repo_root: PathBuf,
    articles_dir: PathBuf,
}

impl GitChangeDetector {
    pub fn new(repo_root: impl AsRef<Path>, articles_dir: impl AsRef<Path>) -> Self {
        Self {
            repo_root: repo_root.as_ref().to_path_buf(),
            articles_dir: articles_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ChangeDetector for GitChangeDetector {
    async fn changed_files(&self) -> Result<Vec<PathBuf>, ChangeError> {
        let output = Command::new("git")
            .arg("diff")
            .arg("--name-only")
            .arg("HEAD~1")
            .arg("HEAD")
            .arg("--")
            .arg(&self.articles_dir)
            .current_dir(&self.repo_root)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChangeError::Command(stderr.trim().to_string()));
        }

        let files = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| self.repo_root.join(line))
            .collect();

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Stdio;
    use tempfile::TempDir;

    async fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .expect("run git");
        assert!(status.success(), "git {args:?} failed");
    }

    #[tokio::test]
    async fn detects_files_changed_in_the_last_commit() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("articles")).unwrap();

        git(root, &["init", "-q"]).await;
        git(root, &["config", "user.email", "test@example.com"]).await;
        git(root, &["config", "user.name", "Test"]).await;

        std::fs::write(root.join("articles/first.md"), "---\ntitle: A\n---\nBody").unwrap();
        git(root, &["add", "."]).await;
        git(root, &["commit", "-q", "-m", "first"]).await;

        std::fs::write(root.join("articles/second.md"), "---\ntitle: B\n---\nBody").unwrap();
        git(root, &["add", "."]).await;
        git(root, &["commit", "-q", "-m", "second"]).await;

        let detector = GitChangeDetector::new(root, "articles");
        let changed = detector.changed_files().await.unwrap();

        assert_eq!(changed, vec![root.join("articles/second.md")]);
    }

    #[tokio::test]
    async fn single_commit_history_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("articles")).unwrap();

        git(root, &["init", "-q"]).await;
        git(root, &["config", "user.email", "test@example.com"]).await;
        git(root, &["config", "user.name", "Test"]).await;
        std::fs::write(root.join("articles/only.md"), "---\ntitle: A\n---\nBody").unwrap();
        git(root, &["add", "."]).await;
        git(root, &["commit", "-q", "-m", "only"]).await;

        let detector = GitChangeDetector::new(root, "articles");
        assert!(detector.changed_files().await.is_err());
    }
}
