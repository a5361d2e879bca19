//! Per-platform article transforms
//!
//! Pure functions from a source [`Article`] to a platform variant document,
//! and the reverse parsing used by the publisher to build API payloads from a
//! variant file on disk.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::frontmatter;
use crate::model::{Article, ArticlePayload, Platform, PlatformVariant};

/// Matches root-relative image references only, so rewriting an already
/// rewritten body is a no-op.
static IMAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(/images/([^)]+)\)").expect("valid regex"));

/// Where rewritten image links point
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Base URL prefixed to `/images/...` paths
    pub raw_base_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            raw_base_url:
                "https://raw.githubusercontent.com/pipipi-dev/multi-platform-publisher/main"
                    .to_string(),
        }
    }
}

/// Rewrite `![alt](/images/X)` references to absolute URLs under `base_url`.
///
/// Alt text and path segment are carried over verbatim. Absolute URLs never
/// match the pattern, so the rewrite is idempotent.
pub fn rewrite_image_links(body: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    IMAGE_LINK
        .replace_all(body, |caps: &regex::Captures<'_>| {
            format!("![{}]({}/images/{})", &caps[1], base, &caps[2])
        })
        .into_owned()
}

/// Build the Qiita variant document (Qiita CLI frontmatter schema).
///
/// Returns `None` when the article's toggle map does not enable Qiita.
pub fn qiita_variant(article: &Article, assets: &AssetConfig) -> Option<PlatformVariant> {
    if !article.platform_enabled(Platform::Qiita) {
        return None;
    }

    let tags = if article.front.topics.is_empty() {
        "tags: []".to_string()
    } else {
        let items: Vec<String> = article
            .front
            .topics
            .iter()
            .map(|topic| format!("  - {topic}"))
            .collect();
        format!("tags:\n{}", items.join("\n"))
    };

    let front = format!(
        "title: {title}\n{tags}\nprivate: false\nupdated_at: \"\"\nid: null\norganization_url_name: null\nslide: false",
        title = yaml_quote(&article.front.title),
    );

    let body = rewrite_image_links(&article.body, &assets.raw_base_url);

    Some(PlatformVariant {
        platform: Platform::Qiita,
        document: format!("---\n{front}\n---\n\n{body}"),
    })
}

/// Build the Dev.to variant document.
///
/// Returns `None` when the article's toggle map does not enable Dev.to.
pub fn devto_variant(article: &Article, assets: &AssetConfig) -> Option<PlatformVariant> {
    if !article.platform_enabled(Platform::Devto) {
        return None;
    }

    let body = rewrite_image_links(&article.body, &assets.raw_base_url);

    let front = format!(
        "title: {title}\npublished: true\ntags: {tags}\ncanonical_url: null\ndescription: {description}",
        title = yaml_quote(&article.front.title),
        tags = yaml_quote(&article.front.topics.join(", ")),
        description = yaml_quote(&summarize(&article.body)),
    );

    Some(PlatformVariant {
        platform: Platform::Devto,
        document: format!("---\n{front}\n---\n\n{body}"),
    })
}

/// First 150 characters of the body, whitespace collapsed, `...` suffix
fn summarize(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let head: String = flat.chars().take(150).collect();
    format!("{head}...")
}

fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Error type for parsing a variant document back into an API payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("variant parse error: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct QiitaVariantFront {
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    private: bool,
}

#[derive(Deserialize)]
struct DevtoVariantFront {
    title: String,
    #[serde(default = "default_true")]
    published: bool,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Parse a variant document into the payload for its platform's API.
///
/// Only the API platforms carry payloads; Zenn is never called.
pub fn payload_for(platform: Platform, document: &str) -> Result<ArticlePayload, PayloadError> {
    let (yaml, body) = frontmatter::split(document)
        .ok_or_else(|| PayloadError::Parse("missing frontmatter block".to_string()))?;

    match platform {
        Platform::Qiita => {
            let front: QiitaVariantFront =
                serde_yaml::from_str(yaml).map_err(|e| PayloadError::Parse(e.to_string()))?;
            Ok(ArticlePayload {
                title: front.title,
                body: body.to_string(),
                tags: front.tags,
                visible: !front.private,
                description: None,
            })
        }
        Platform::Devto => {
            let front: DevtoVariantFront =
                serde_yaml::from_str(yaml).map_err(|e| PayloadError::Parse(e.to_string()))?;
            let tags = front
                .tags
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
            Ok(ArticlePayload {
                title: front.title,
                body: body.to_string(),
                tags,
                visible: front.published,
                description: front.description,
            })
        }
        Platform::Zenn => Err(PayloadError::Parse(
            "zenn has no API payload".to_string(),
        )),
    }
}
