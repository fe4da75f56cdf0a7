//! In-memory collection source.
//!
//! Posts are held newest-inserted first behind a tokio `RwLock`; each mutation
//! is a single write-lock critical section and the last write wins.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CategoryPatch, CreateCategoryParams, CreatePostParams,
    PostPatch, PostsRepo, PostsWriteRepo, RepoError,
};
use crate::application::error::AppError;
use crate::application::site::SiteArchive;
use crate::domain::categories::find_by_name;
use crate::domain::entities::{
    CategoryRecord, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, PostRecord,
};
use crate::domain::posts::PostCriteria;
use crate::domain::slug::derive_slug;

#[derive(Default)]
struct Store {
    posts: Vec<PostRecord>,
    categories: Vec<CategoryRecord>,
}

/// Shared in-memory source; clones share the same state.
#[derive(Clone, Default)]
pub struct InMemorySource {
    store: Arc<RwLock<Store>>,
}

impl InMemorySource {
    /// Empty source without categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source holding the default category vocabulary and no posts.
    pub fn with_default_categories() -> Self {
        Self::from_parts(default_categories(), Vec::new())
    }

    /// Source seeded from an archive; an archive without categories gets the
    /// default vocabulary.
    ///
    /// Post ids and slugs must be unique and every post must be filed under a
    /// known category. Category names are matched ignoring case and stored in
    /// their canonical spelling.
    pub fn from_archive(archive: SiteArchive) -> Result<Self, AppError> {
        let categories = if archive.categories.is_empty() {
            default_categories()
        } else {
            archive.categories
        };

        let mut names = HashSet::new();
        for category in &categories {
            if !names.insert(category.name.to_lowercase()) {
                return Err(AppError::validation(format!(
                    "archive lists category `{}` twice",
                    category.name
                )));
            }
        }

        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        let mut posts = Vec::with_capacity(archive.posts.len());
        for mut post in archive.posts {
            if !ids.insert(post.id.clone()) {
                return Err(AppError::validation(format!(
                    "archive repeats post id `{}`",
                    post.id
                )));
            }
            if !slugs.insert(post.slug.clone()) {
                return Err(AppError::validation(format!(
                    "archive repeats post slug `{}`",
                    post.slug
                )));
            }
            let category = find_by_name(&categories, &post.category).ok_or_else(|| {
                AppError::validation(format!(
                    "post `{}` is filed under unknown category `{}`",
                    post.slug, post.category
                ))
            })?;
            post.category = category.name.clone();
            posts.push(post);
        }

        info!(
            target = "newsdesk::infra::memory",
            posts = posts.len(),
            categories = categories.len(),
            "in-memory source seeded from archive"
        );
        Ok(Self::from_parts(categories, posts))
    }

    fn from_parts(categories: Vec<CategoryRecord>, posts: Vec<PostRecord>) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store { posts, categories })),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.posts.is_empty()
    }
}

fn default_categories() -> Vec<CategoryRecord> {
    let now = OffsetDateTime::now_utc();
    DEFAULT_CATEGORIES
        .iter()
        .map(|name| CategoryRecord {
            id: Uuid::new_v4().simple().to_string(),
            name: (*name).to_string(),
            slug: derive_slug(name).unwrap_or_else(|_| name.to_lowercase()),
            description: None,
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            is_active: true,
            source_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[async_trait]
impl PostsRepo for InMemorySource {
    async fn list_posts(&self, criteria: &PostCriteria) -> Result<Vec<PostRecord>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .filter(|post| criteria.matches(post))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PostRecord>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|post| post.slug == slug).cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemorySource {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut store = self.store.write().await;
        if store.posts.iter().any(|post| post.id == params.id) {
            return Err(RepoError::Duplicate {
                constraint: "posts_id_key".to_string(),
            });
        }
        if store.posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: params.id,
            slug: params.slug,
            title: params.title,
            excerpt: params.excerpt,
            body_html: params.body_html,
            source_url: params.source_url,
            category: params.category,
            tags: params.tags,
            image_url: params.image_url,
            author: params.author,
            status: params.status,
            publish_date: params.publish_date,
            featured: params.featured,
            created_at: now,
            updated_at: now,
        };
        store.posts.insert(0, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<PostRecord, RepoError> {
        let mut store = self.store.write().await;
        if let Some(slug) = patch.slug.as_deref()
            && store
                .posts
                .iter()
                .any(|post| post.slug == slug && post.id != id)
        {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        let post = store
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;
        patch.apply_to(post, OffsetDateTime::now_utc());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let index = store
            .posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(RepoError::NotFound)?;
        store.posts.remove(index);
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for InMemorySource {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.store.read().await.categories.clone())
    }

    async fn find_category(&self, id: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for InMemorySource {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut store = self.store.write().await;
        if store
            .categories
            .iter()
            .any(|category| category.name.eq_ignore_ascii_case(&params.name))
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_name_key".to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let category = CategoryRecord {
            id: params.id,
            name: params.name,
            slug: params.slug,
            description: params.description,
            color: params.color,
            is_active: params.is_active,
            source_urls: params.source_urls,
            created_at: now,
            updated_at: now,
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<CategoryRecord, RepoError> {
        let mut store = self.store.write().await;
        if let Some(name) = patch.name.as_deref()
            && store
                .categories
                .iter()
                .any(|category| category.name.eq_ignore_ascii_case(name) && category.id != id)
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_name_key".to_string(),
            });
        }

        let category = store
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(RepoError::NotFound)?;
        patch.apply_to(category, OffsetDateTime::now_utc());
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let index = store
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or(RepoError::NotFound)?;
        store.categories.remove(index);
        Ok(())
    }
}
