//! Dev.to API publisher

use async_trait::async_trait;
use crosspub_domain::{ArticlePayload, Platform, PlatformPublisher, PublishError, PublishResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dev.to article API adapter (create via POST, update via PUT)
pub struct DevtoPublisher {
    client: Client,
    api_key: SecretString,
    base_url: String,
    enabled: bool,
}

impl DevtoPublisher {
    pub fn new(api_key: SecretString) -> Self {
        Self::with_base_url(api_key, "https://dev.to".to_string())
    }

    pub fn with_base_url(api_key: SecretString, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            enabled: true,
        }
    }

    /// Publisher without a credential; every run skips it
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new("".into()),
            base_url: String::new(),
            enabled: false,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<PublishResult, PublishError> {
        let response = request
            .header("api-key", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(PublishError::Auth("Invalid Dev.to api key".to_string()));
        }
        if status == 429 {
            return Err(PublishError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(format!("{status}: {body}")));
        }

        let article: ArticleResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Api(e.to_string()))?;

        Ok(PublishResult {
            // Dev.to assigns numeric ids
            id: article.id.to_string(),
            url: article.url,
        })
    }
}

#[derive(Serialize)]
struct ArticleRequest {
    article: ArticleBody,
}

#[derive(Serialize)]
struct ArticleBody {
    title: String,
    body_markdown: String,
    published: bool,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ArticleRequest {
    fn from_payload(payload: &ArticlePayload) -> Self {
        Self {
            article: ArticleBody {
                title: payload.title.clone(),
                body_markdown: payload.body.clone(),
                published: payload.visible,
                tags: payload.tags.clone(),
                description: payload.description.clone(),
            },
        }
    }
}

#[derive(Deserialize)]
struct ArticleResponse {
    id: u64,
    url: String,
}

#[async_trait]
impl PlatformPublisher for DevtoPublisher {
    async fn create(&self, payload: &ArticlePayload) -> Result<PublishResult, PublishError> {
        let url = format!("{}/api/articles", self.base_url);
        self.send(
            self.client
                .post(&url)
                .json(&ArticleRequest::from_payload(payload)),
        )
        .await
    }

    async fn update(
        &self,
        id: &str,
        payload: &ArticlePayload,
    ) -> Result<PublishResult, PublishError> {
        let url = format!("{}/api/articles/{}", self.base_url, id);
        self.send(
            self.client
                .put(&url)
                .json(&ArticleRequest::from_payload(payload)),
        )
        .await
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn platform(&self) -> Platform {
        Platform::Devto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_payload() -> ArticlePayload {
        ArticlePayload {
            title: "My Post".to_string(),
            body: "Body text.".to_string(),
            tags: vec!["rust".to_string()],
            visible: true,
            description: Some("Short summary...".to_string()),
        }
    }

    #[tokio::test]
    async fn create_posts_nested_article_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .and(header("api-key", "test-key"))
            .and(body_json(serde_json::json!({
                "article": {
                    "title": "My Post",
                    "body_markdown": "Body text.",
                    "published": true,
                    "tags": ["rust"],
                    "description": "Short summary..."
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 4242,
                "url": "https://dev.to/user/my-post-4242"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let publisher =
            DevtoPublisher::with_base_url(SecretString::new("test-key".into()), mock_server.uri());

        let result = publisher.create(&sample_payload()).await.unwrap();

        assert_eq!(result.id, "4242");
        assert_eq!(result.url, "https://dev.to/user/my-post-4242");
    }

    #[tokio::test]
    async fn update_puts_to_article_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/articles/4242"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 4242,
                "url": "https://dev.to/user/my-post-4242"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let publisher =
            DevtoPublisher::with_base_url(SecretString::new("test-key".into()), mock_server.uri());

        let result = publisher.update("4242", &sample_payload()).await.unwrap();
        assert_eq!(result.id, "4242");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let publisher =
            DevtoPublisher::with_base_url(SecretString::new("bad-key".into()), mock_server.uri());

        let result = publisher.create(&sample_payload()).await;
        assert!(matches!(result, Err(PublishError::Auth(_))));
    }

    #[tokio::test]
    async fn validation_error_carries_response_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_string("{\"error\":\"title has already been used\"}"),
            )
            .mount(&mock_server)
            .await;

        let publisher =
            DevtoPublisher::with_base_url(SecretString::new("test-key".into()), mock_server.uri());

        let result = publisher.create(&sample_payload()).await;
        match result {
            Err(PublishError::Api(message)) => {
                assert!(message.contains("title has already been used"))
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_publisher_reports_disabled() {
        let publisher = DevtoPublisher::disabled();
        assert!(!publisher.is_enabled());
        assert_eq!(publisher.platform(), Platform::Devto);
    }
}
