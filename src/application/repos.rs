//! Repository traits describing collection sources.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{Author, CategoryRecord, PostRecord, SourceUrl};
use crate::domain::posts::PostCriteria;
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("remote source rejected the credentials")]
    Unauthorized,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the failure is transient and the caller should keep prior state.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepoError::Transport { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_html: String,
    pub source_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub author: Author,
    pub status: PostStatus,
    pub publish_date: OffsetDateTime,
    pub featured: bool,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body_html: Option<String>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub author: Option<Author>,
    pub status: Option<PostStatus>,
    pub publish_date: Option<OffsetDateTime>,
    pub featured: Option<bool>,
}

impl PostPatch {
    /// Merge the patch into `post`, stamping `updated_at`.
    pub fn apply_to(self, post: &mut PostRecord, now: OffsetDateTime) {
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(body_html) = self.body_html {
            post.body_html = body_html;
        }
        if let Some(source_url) = self.source_url {
            post.source_url = non_empty(source_url);
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = non_empty(image_url);
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
        if let Some(publish_date) = self.publish_date {
            post.publish_date = publish_date;
        }
        if let Some(featured) = self.featured {
            post.featured = featured;
        }
        post.updated_at = now;
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub is_active: bool,
    pub source_urls: Vec<SourceUrl>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
    pub source_urls: Option<Vec<SourceUrl>>,
}

impl CategoryPatch {
    pub fn apply_to(self, category: &mut CategoryRecord, now: OffsetDateTime) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(slug) = self.slug {
            category.slug = slug;
        }
        if let Some(description) = self.description {
            category.description = non_empty(description);
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(is_active) = self.is_active {
            category.is_active = is_active;
        }
        if let Some(source_urls) = self.source_urls {
            category.source_urls = source_urls;
        }
        category.updated_at = now;
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts matching `criteria`, in source order. Sources may return a superset.
    async fn list_posts(&self, criteria: &PostCriteria) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_category(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: &str) -> Result<(), RepoError>;
}
