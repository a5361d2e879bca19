//! Qiita API publisher

use async_trait::async_trait;
use crosspub_domain::{ArticlePayload, Platform, PlatformPublisher, PublishError, PublishResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Qiita item API adapter (create via POST, update via PATCH)
pub struct QiitaPublisher {
    client: Client,
    token: SecretString,
    base_url: String,
    enabled: bool,
}

impl QiitaPublisher {
    pub fn new(token: SecretString) -> Self {
        Self::with_base_url(token, "https://qiita.com".to_string())
    }

    pub fn with_base_url(token: SecretString, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token,
            base_url,
            enabled: true,
        }
    }

    /// Publisher without a credential; every run skips it
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            token: SecretString::new("".into()),
            base_url: String::new(),
            enabled: false,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<PublishResult, PublishError> {
        let response = request
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(PublishError::Auth("Invalid Qiita token".to_string()));
        }
        if status == 429 {
            return Err(PublishError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!("{status}: {body}")));
        }

        let item: ItemResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        Ok(PublishResult {
            id: item.id,
            url: item.url,
        })
    }
}

#[derive(Serialize)]
struct ItemRequest {
    title: String,
    body: String,
    tags: Vec<ItemTag>,
    private: bool,
}

/// Qiita tags are name objects, not plain strings
#[derive(Serialize)]
struct ItemTag {
    name: String,
}

impl ItemRequest {
    fn from_payload(payload: &ArticlePayload) -> Self {
        Self {
            title: payload.title.clone(),
            body: payload.body.clone(),
            tags: payload
                .tags
                .iter()
                .map(|tag| ItemTag { name: tag.clone() })
                .collect(),
            private: !payload.visible,
        }
    }
}

#[derive(Deserialize)]
struct ItemResponse {
    id: String,
    url: String,
}

#[async_trait]
impl PlatformPublisher for QiitaPublisher {
    async fn create(&self, payload: &ArticlePayload) -> Result<PublishResult, PublishError> {
        let url = format!("{}/api/v2/items", self.base_url);
        self.send(
            self.client
                .post(&url)
                .json(&ItemRequest::from_payload(payload)),
        )
        .await
    }

    async fn update(
        &self,
        id: &str,
        payload: &ArticlePayload,
    ) -> Result<PublishResult, PublishError> {
        let url = format!("{}/api/v2/items/{}", self.base_url, id);
        self.send(
            self.client
                .patch(&url)
                .json(&ItemRequest::from_payload(payload)),
        )
        .await
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn platform(&self) -> Platform {
        Platform::Qiita
    }
}
