//! YAML frontmatter splitting and article parsing

use crate::model::{Article, ArticleFrontmatter};
use crate::ports::ArticleError;

/// Split a document into its frontmatter YAML and body.
///
/// The document must start with a `---` fence and contain a closing fence.
/// Returns `None` when no valid fence pair is present.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n"))?;

    let (yaml, after) = rest.split_once("\n---")?;
    // CRLF documents leave a \r before the closing fence
    let yaml = yaml.strip_suffix('\r').unwrap_or(yaml);

    // The closing fence must end its line
    let body = after
        .strip_prefix('\n')
        .or_else(|| after.strip_prefix("\r\n"))
        .or(if after.is_empty() { Some("") } else { None })?;

    Some((yaml, body.trim_start_matches(['\r', '\n'])))
}

/// Parse a source article from its raw file content.
///
/// Missing fences, invalid YAML, or a missing `title` are parse errors; the
/// caller skips the article with a diagnostic rather than aborting the run.
pub fn parse_article(slug: &str, file_name: &str, content: &str) -> Result<Article, ArticleError> {
    let (yaml, body) = split(content).ok_or_else(|| ArticleError::Parse {
        file: file_name.to_string(),
        message: "missing frontmatter block".to_string(),
    })?;

    let front: ArticleFrontmatter =
        serde_yaml::from_str(yaml).map_err(|e| ArticleError::Parse {
            file: file_name.to_string(),
            message: e.to_string(),
        })?;

    Ok(Article {
        slug: slug.to_string(),
        file_name: file_name.to_string(),
        front,
        body: body.to_string(),
    })
}
