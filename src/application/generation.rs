//! Boundary to the external text-generation backend.
//!
//! The backend is opaque and may be slow or fail. The service bounds every
//! call with a timeout and turns raw output into an editable post draft.
//! Failures never touch stored posts; callers simply re-submit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::repos::{CategoriesRepo, RepoError};
use crate::domain::categories::find_by_name;
use crate::domain::content::{derive_excerpt, paragraphs_to_html, split_tag_list};

/// Category every summarised article is filed under.
pub const SUMMARY_CATEGORY: &str = "News";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePostParams {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Backend output as produced: plain-text body, comma-separated tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub category: String,
}

/// Draft ready to populate the post editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDraft {
    pub title: String,
    pub body_html: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation backend unreachable: {0}")]
    Transport(String),
    #[error("generation backend answered {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("generation backend returned malformed output: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn summarize(&self, content: &str) -> Result<RawDraft, GeneratorError>;

    async fn generate_post(&self, params: &GeneratePostParams) -> Result<RawDraft, GeneratorError>;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation disabled")]
    Disabled,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Backend(#[from] GeneratorError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Option<Arc<dyn ContentGenerator>>,
    categories: Arc<dyn CategoriesRepo>,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(
        generator: Option<Arc<dyn ContentGenerator>>,
        categories: Arc<dyn CategoriesRepo>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            categories,
            timeout,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn summarize(&self, content: &str) -> Result<GeneratedDraft, GenerationError> {
        if content.trim().is_empty() {
            return Err(GenerationError::InvalidInput("content"));
        }
        let generator = self.generator()?;

        let raw = self.bounded("summarize", generator.summarize(content)).await?;
        let mut draft = self.adapt(raw).await?;
        draft.category = SUMMARY_CATEGORY.to_string();
        Ok(draft)
    }

    pub async fn generate_post(
        &self,
        params: &GeneratePostParams,
    ) -> Result<GeneratedDraft, GenerationError> {
        if params.keyword.trim().is_empty() {
            return Err(GenerationError::InvalidInput("keyword"));
        }
        let generator = self.generator()?;

        let raw = self
            .bounded("generate_post", generator.generate_post(params))
            .await?;
        self.adapt(raw).await
    }

    fn generator(&self) -> Result<&Arc<dyn ContentGenerator>, GenerationError> {
        self.generator.as_ref().ok_or(GenerationError::Disabled)
    }

    async fn bounded<F>(&self, operation: &'static str, call: F) -> Result<RawDraft, GenerationError>
    where
        F: Future<Output = Result<RawDraft, GeneratorError>>,
    {
        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(raw)) => {
                info!(
                    target = "newsdesk::application::generation",
                    operation,
                    title = %raw.title,
                    "draft generated"
                );
                return Ok(raw);
            }
            Ok(Err(err)) => GenerationError::Backend(err),
            Err(_) => GenerationError::Timeout(self.timeout),
        };

        counter!("newsdesk_generation_failures_total", "operation" => operation).increment(1);
        warn!(
            target = "newsdesk::application::generation",
            operation,
            error = %outcome,
            "draft generation failed"
        );
        Err(outcome)
    }

    /// Shape backend output into an editor draft.
    ///
    /// The category is kept when it is part of the vocabulary and falls back to
    /// the first known category otherwise.
    async fn adapt(&self, raw: RawDraft) -> Result<GeneratedDraft, GenerationError> {
        let categories = self.categories.list_categories().await?;
        let category = find_by_name(&categories, &raw.category)
            .or_else(|| categories.first())
            .map(|category| category.name.clone())
            .unwrap_or_default();

        let body_html = paragraphs_to_html(&raw.body);
        Ok(GeneratedDraft {
            title: raw.title.trim().to_string(),
            excerpt: derive_excerpt(&body_html),
            body_html,
            tags: split_tag_list(&raw.tags),
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CategoryRecord;
    use time::OffsetDateTime;

    struct FixedCategories(Vec<CategoryRecord>);

    #[async_trait]
    impl CategoriesRepo for FixedCategories {
        async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
            Ok(self.0.clone())
        }

        async fn find_category(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError> {
            Ok(self.0.iter().find(|category| category.id == id).cloned())
        }
    }

    struct ScriptedGenerator {
        draft: RawDraft,
        delay: Duration,
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn summarize(&self, _content: &str) -> Result<RawDraft, GeneratorError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.draft.clone())
        }

        async fn generate_post(
            &self,
            _params: &GeneratePostParams,
        ) -> Result<RawDraft, GeneratorError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.draft.clone())
        }
    }

    fn category(name: &str) -> CategoryRecord {
        let now = OffsetDateTime::UNIX_EPOCH;
        CategoryRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            color: "#3B82F6".to_string(),
            is_active: true,
            source_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(category: &str, delay: Duration) -> GenerationService {
        let generator = ScriptedGenerator {
            draft: RawDraft {
                title: " Chips get smaller ".to_string(),
                body: "First paragraph.\n\nSecond <paragraph>.".to_string(),
                tags: "hardware, chips, ,hardware".to_string(),
                category: category.to_string(),
            },
            delay,
        };
        let categories = FixedCategories(vec![
            self::category("Technology"),
            self::category("Science"),
            self::category("News"),
        ]);
        GenerationService::new(
            Some(Arc::new(generator)),
            Arc::new(categories),
            Duration::from_secs(5),
        )
    }

    fn params() -> GeneratePostParams {
        GeneratePostParams {
            keyword: "chips".to_string(),
            source_url: None,
            instruction: None,
            category: "Science".to_string(),
            provider: None,
            model: None,
        }
    }

    #[tokio::test]
    async fn generated_draft_is_shaped_for_the_editor() {
        let draft = service("science", Duration::ZERO)
            .generate_post(&params())
            .await
            .expect("draft");

        assert_eq!(draft.title, "Chips get smaller");
        assert_eq!(
            draft.body_html,
            "<p>First paragraph.</p><p>Second &lt;paragraph&gt;.</p>"
        );
        assert_eq!(draft.excerpt, "First paragraph. Second <paragraph>.");
        assert_eq!(draft.tags, vec!["hardware", "chips"]);
        assert_eq!(draft.category, "Science");
    }

    #[tokio::test]
    async fn unknown_category_falls_back_to_first_known() {
        let draft = service("Gardening", Duration::ZERO)
            .generate_post(&params())
            .await
            .expect("draft");
        assert_eq!(draft.category, "Technology");
    }

    #[tokio::test]
    async fn summaries_are_filed_under_news() {
        let draft = service("Technology", Duration::ZERO)
            .summarize("https://example.com/article")
            .await
            .expect("draft");
        assert_eq!(draft.category, SUMMARY_CATEGORY);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let err = service("Science", Duration::from_secs(30))
            .generate_post(&params())
            .await
            .expect_err("timeout");
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn missing_backend_reports_disabled() {
        let service = GenerationService::new(
            None,
            Arc::new(FixedCategories(Vec::new())),
            Duration::from_secs(1),
        );
        assert!(!service.is_enabled());
        assert!(matches!(
            service.summarize("text").await,
            Err(GenerationError::Disabled)
        ));
    }

    #[tokio::test]
    async fn blank_keyword_is_rejected() {
        let mut params = params();
        params.keyword = "  ".to_string();
        let err = service("Science", Duration::ZERO)
            .generate_post(&params)
            .await
            .expect_err("invalid");
        assert!(matches!(err, GenerationError::InvalidInput("keyword")));
    }
}
