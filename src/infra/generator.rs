//! HTTP client for the external draft generation backend.
//!
//! The backend exposes `POST {endpoint}/summarize` and
//! `POST {endpoint}/generate-post`, both answering a raw draft
//! `{title, body, tags, category}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::json;

use crate::application::generation::{
    ContentGenerator, GeneratePostParams, GeneratorError, RawDraft,
};
use crate::infra::error::InfraError;
use crate::infra::with_trailing_slash;

#[derive(Clone, Debug)]
pub struct HttpContentGenerator {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpContentGenerator {
    /// `timeout` is a transport ceiling; the service applies its own bound on top.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: with_trailing_slash(endpoint),
            api_key,
        })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RawDraft, GeneratorError> {
        let url = self
            .endpoint
            .join(path)
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;

        let mut request = self.client.post(url).json(body);
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GeneratorError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(GeneratorError::Backend {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).trim().to_string(),
            });
        }

        let draft: RawDraft = serde_json::from_slice(&bytes)
            .map_err(|err| GeneratorError::Malformed(err.to_string()))?;
        if draft.title.trim().is_empty() || draft.body.trim().is_empty() {
            return Err(GeneratorError::Malformed(
                "draft is missing a title or body".to_string(),
            ));
        }
        Ok(draft)
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn summarize(&self, content: &str) -> Result<RawDraft, GeneratorError> {
        self.post("summarize", &json!({ "content": content })).await
    }

    async fn generate_post(&self, params: &GeneratePostParams) -> Result<RawDraft, GeneratorError> {
        self.post("generate-post", params).await
    }
}
