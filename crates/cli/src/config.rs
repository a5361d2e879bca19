//! Configuration loading and management

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub qiita: QiitaConfig,

    #[serde(default)]
    pub devto: DevtoConfig,

    #[serde(default)]
    pub zenn: ZennConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_articles_dir")]
    pub articles_dir: PathBuf,

    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Courtesy delay between articles during publishing
    #[serde(default = "default_article_delay_ms")]
    pub article_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Absolute base for rewritten `/images/...` links
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiitaConfig {
    #[serde(default = "default_qiita_token_env")]
    pub api_token_env: String,

    #[serde(default = "default_qiita_base_url")]
    pub base_url: String,

    #[serde(default = "default_qiita_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevtoConfig {
    #[serde(default = "default_devto_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_devto_base_url")]
    pub base_url: String,

    #[serde(default = "default_devto_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZennConfig {
    /// Zenn publishes through its git integration; when true the publish run
    /// acknowledges published articles in the log.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// Default value functions
fn default_articles_dir() -> PathBuf {
    PathBuf::from("./articles")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./config/published-articles.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_article_delay_ms() -> u64 {
    1000
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com/pipipi-dev/multi-platform-publisher/main".to_string()
}

fn default_qiita_token_env() -> String {
    "QIITA_API_TOKEN".to_string()
}

fn default_qiita_base_url() -> String {
    "https://qiita.com".to_string()
}

fn default_qiita_output_dir() -> PathBuf {
    PathBuf::from("./qiita/public")
}

fn default_devto_api_key_env() -> String {
    "DEV_TO_API_KEY".to_string()
}

fn default_devto_base_url() -> String {
    "https://dev.to".to_string()
}

fn default_devto_output_dir() -> PathBuf {
    PathBuf::from("./dev-to")
}

fn default_true() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            articles_dir: default_articles_dir(),
            state_file: default_state_file(),
            log_level: default_log_level(),
            article_delay_ms: default_article_delay_ms(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            raw_base_url: default_raw_base_url(),
        }
    }
}

impl Default for QiitaConfig {
    fn default() -> Self {
        Self {
            api_token_env: default_qiita_token_env(),
            base_url: default_qiita_base_url(),
            output_dir: default_qiita_output_dir(),
        }
    }
}

impl Default for DevtoConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_devto_api_key_env(),
            base_url: default_devto_base_url(),
            output_dir: default_devto_output_dir(),
        }
    }
}

impl Default for ZennConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("CROSSPUB")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# crosspub configuration

[general]
articles_dir = "./articles"
state_file = "./config/published-articles.json"
log_level = "info"
# Courtesy delay between articles while publishing
article_delay_ms = 1000

[assets]
# Absolute base for rewritten /images/... links
raw_base_url = "https://raw.githubusercontent.com/pipipi-dev/multi-platform-publisher/main"

[qiita]
api_token_env = "QIITA_API_TOKEN"
base_url = "https://qiita.com"
output_dir = "./qiita/public"

[devto]
api_key_env = "DEV_TO_API_KEY"
base_url = "https://dev.to"
output_dir = "./dev-to"

[zenn]
# Zenn articles are published by the GitHub integration, never via API
enabled = true
"#
        .to_string()
    }
}

/// Read a platform credential from the process environment.
///
/// An unset or blank variable means the platform is skipped, not an error:
/// local runs without tokens are a supported mode.
pub fn load_token(env_name: &str) -> Option<SecretString> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::new(value.into())),
        _ => None,
    }
}
