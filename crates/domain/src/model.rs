//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A publishing target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Qiita (REST API, bearer token)
    Qiita,
    /// Dev.to (REST API, api-key header)
    Devto,
    /// Zenn (published by git-based CD, never called directly)
    Zenn,
}

impl Platform {
    /// Key used in the frontmatter `platforms` toggle map and in logs
    pub fn key(&self) -> &'static str {
        match self {
            Platform::Qiita => "qiita",
            Platform::Devto => "devto",
            Platform::Zenn => "zenn",
        }
    }

    /// Platforms reached through their HTTP API, in publish order
    pub const API_PLATFORMS: [Platform; 2] = [Platform::Qiita, Platform::Devto];
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsed article frontmatter
///
/// Required fields plus an open passthrough map for anything else authors put
/// in the block. The `platforms` toggle map is the canonical schema; the
/// legacy array-of-names form fails deserialization and the article is
/// skipped with a diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleFrontmatter {
    /// Article title
    pub title: String,
    /// Whether the article is published on Zenn (git integration)
    #[serde(default)]
    pub published: bool,
    /// Topic tags shared by all platforms
    #[serde(default)]
    pub topics: Vec<String>,
    /// Per-platform toggles; absent means all platforms enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<BTreeMap<String, bool>>,
    /// Passthrough for extra frontmatter keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A source article loaded from the articles directory
#[derive(Debug, Clone)]
pub struct Article {
    /// Filename-derived identifier, stable across platforms
    pub slug: String,
    /// Original file name (`<slug>.md`)
    pub file_name: String,
    /// Parsed frontmatter
    pub front: ArticleFrontmatter,
    /// Markdown body (frontmatter stripped)
    pub body: String,
}

impl Article {
    /// An article is eligible when it is published (Zenn) or any platform
    /// toggle is explicitly true.
    pub fn is_eligible(&self) -> bool {
        if self.front.published {
            return true;
        }
        self.front
            .platforms
            .as_ref()
            .is_some_and(|toggles| toggles.values().any(|enabled| *enabled))
    }

    /// Whether a platform should receive this article.
    ///
    /// With no `platforms` map every platform is enabled. With a map, a
    /// platform is enabled only when its key is present and true.
    pub fn platform_enabled(&self, platform: Platform) -> bool {
        match &self.front.platforms {
            None => true,
            Some(toggles) => toggles.get(platform.key()).copied().unwrap_or(false),
        }
    }
}

/// A transformed article ready to be written to a platform output directory
#[derive(Debug, Clone)]
pub struct PlatformVariant {
    /// Target platform
    pub platform: Platform,
    /// Full document: frontmatter block, blank line, body
    pub document: String,
}

/// Fields carried by create/update requests to a platform API
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePayload {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    /// Visibility flag: Qiita `private` is the negation, Dev.to `published`
    pub visible: bool,
    /// Short description (Dev.to only)
    pub description: Option<String>,
}

/// Remote identifiers recorded after a successful publish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    /// Platform-assigned article id
    pub id: String,
    /// Canonical URL of the published article
    pub url: String,
    /// When the last successful create/update happened
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
}

/// Per-slug publish records, one slot per API platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlugRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qiita: Option<PlatformRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devto: Option<PlatformRecord>,
}

/// Persisted publish state: slug -> per-platform records
///
/// A record exists for (slug, platform) iff a successful create or update
/// response was received at least once. Records are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishState {
    pub records: BTreeMap<String, SlugRecord>,
}

impl PublishState {
    /// Look up the record for a slug/platform pair
    pub fn get(&self, slug: &str, platform: Platform) -> Option<&PlatformRecord> {
        let slot = self.records.get(slug)?;
        match platform {
            Platform::Qiita => slot.qiita.as_ref(),
            Platform::Devto => slot.devto.as_ref(),
            Platform::Zenn => None,
        }
    }

    /// Record or overwrite the identifiers for a slug/platform pair
    pub fn upsert(&mut self, slug: &str, platform: Platform, record: PlatformRecord) {
        let slot = self.records.entry(slug.to_string()).or_default();
        match platform {
            Platform::Qiita => slot.qiita = Some(record),
            Platform::Devto => slot.devto = Some(record),
            Platform::Zenn => {}
        }
    }
}

/// Outcome for a single (slug, platform) publish attempt
#[derive(Debug)]
pub enum PublishOutcome {
    /// Create or update succeeded
    Published {
        id: String,
        url: String,
        /// true when an existing record was updated
        updated: bool,
    },
    /// Skipped for an expected reason (toggle off, no credential, no variant)
    Skipped { reason: String },
    /// API or network failure; the run continues
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(published: bool, platforms: Option<&[(&str, bool)]>) -> Article {
        Article {
            slug: "post".to_string(),
            file_name: "post.md".to_string(),
            front: ArticleFrontmatter {
                title: "Post".to_string(),
                published,
                topics: vec![],
                platforms: platforms.map(|entries| {
                    entries
                        .iter()
                        .map(|(k, v)| (k.to_string(), *v))
                        .collect()
                }),
                extra: BTreeMap::new(),
            },
            body: String::new(),
        }
    }

    #[test]
    fn unpublished_article_without_toggles_is_ineligible() {
        assert!(!article(false, None).is_eligible());
        assert!(!article(false, Some(&[("qiita", false)])).is_eligible());
    }

    #[test]
    fn any_true_toggle_makes_article_eligible() {
        assert!(article(false, Some(&[("qiita", true), ("devto", false)])).is_eligible());
        assert!(article(true, None).is_eligible());
    }

    #[test]
    fn platforms_default_to_enabled_without_toggle_map() {
        let a = article(true, None);
        assert!(a.platform_enabled(Platform::Qiita));
        assert!(a.platform_enabled(Platform::Devto));
    }

    #[test]
    fn toggle_map_enables_only_listed_true_entries() {
        let a = article(false, Some(&[("qiita", true), ("devto", false)]));
        assert!(a.platform_enabled(Platform::Qiita));
        assert!(!a.platform_enabled(Platform::Devto));
        // Absent key counts as disabled once the map exists
        assert!(!a.platform_enabled(Platform::Zenn));
    }

    #[test]
    fn upsert_overwrites_existing_record() {
        let mut state = PublishState::default();
        let first = PlatformRecord {
            id: "a1".to_string(),
            url: "https://qiita.com/items/a1".to_string(),
            published_at: OffsetDateTime::UNIX_EPOCH,
        };
        let second = PlatformRecord {
            id: "a2".to_string(),
            url: "https://qiita.com/items/a2".to_string(),
            published_at: OffsetDateTime::UNIX_EPOCH,
        };

        state.upsert("post", Platform::Qiita, first);
        state.upsert("post", Platform::Qiita, second.clone());

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.get("post", Platform::Qiita), Some(&second));
    }

    #[test]
    fn records_for_different_platforms_share_a_slug_slot() {
        let mut state = PublishState::default();
        let record = PlatformRecord {
            id: "1".to_string(),
            url: "https://dev.to/a/1".to_string(),
            published_at: OffsetDateTime::UNIX_EPOCH,
        };
        state.upsert("post", Platform::Devto, record);

        assert!(state.get("post", Platform::Qiita).is_none());
        assert!(state.get("post", Platform::Devto).is_some());
    }
}
