//! TOML archive of the post collection and category vocabulary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    application::{
        error::AppError,
        repos::{
            CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreatePostParams,
            PostsRepo, PostsWriteRepo,
        },
    },
    domain::{
        categories::find_by_name,
        entities::{CategoryRecord, PostRecord},
        posts::PostCriteria,
    },
    infra::error::InfraError,
};

/// Archive format version written by [`encode_archive`].
pub const ARCHIVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteArchive {
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
}

impl SiteArchive {
    pub fn new(categories: Vec<CategoryRecord>, posts: Vec<PostRecord>) -> Self {
        let mut archive = Self {
            version: ARCHIVE_VERSION,
            categories,
            posts,
        };
        archive.normalize();
        archive
    }

    /// Categories by name, posts newest first with slug as tie breaker.
    fn normalize(&mut self) {
        self.categories.sort_by(|a, b| a.name.cmp(&b.name));
        self.posts.sort_by(|a, b| {
            b.publish_date
                .cmp(&a.publish_date)
                .then_with(|| a.slug.cmp(&b.slug))
        });
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub categories_created: usize,
    pub categories_skipped: usize,
    pub posts_created: usize,
    pub posts_skipped: usize,
}

pub fn encode_archive(archive: &SiteArchive) -> Result<String, AppError> {
    toml::to_string_pretty(archive)
        .map_err(|err| AppError::unexpected(format!("failed to encode archive: {err}")))
}

pub fn decode_archive(data: &str) -> Result<SiteArchive, AppError> {
    let mut archive: SiteArchive = toml::from_str(data)
        .map_err(|err| AppError::validation(format!("invalid archive: {err}")))?;
    if archive.version != ARCHIVE_VERSION {
        return Err(AppError::validation(format!(
            "unsupported archive version {} (expected {ARCHIVE_VERSION})",
            archive.version
        )));
    }
    archive.normalize();
    Ok(archive)
}

pub async fn read_archive(path: &Path) -> Result<SiteArchive, AppError> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;
    decode_archive(&data)
}

/// Export every post and category visible through the source to `path`.
pub async fn export_site(
    posts: &dyn PostsRepo,
    categories: &dyn CategoriesRepo,
    path: &Path,
) -> Result<SiteArchive, AppError> {
    let archive = SiteArchive::new(
        categories.list_categories().await?,
        posts.list_posts(&PostCriteria::default()).await?,
    );
    let encoded = encode_archive(&archive)?;
    tokio::fs::write(path, encoded)
        .await
        .map_err(|err| AppError::from(InfraError::Io(err)))?;

    info!(
        target = "newsdesk::archive",
        path = %path.display(),
        posts = archive.posts.len(),
        categories = archive.categories.len(),
        "archive exported"
    );
    Ok(archive)
}

/// Write repositories consumed by [`import_site`].
pub struct ImportTarget<'a> {
    pub posts: &'a dyn PostsRepo,
    pub posts_writer: &'a dyn PostsWriteRepo,
    pub categories: &'a dyn CategoriesRepo,
    pub categories_writer: &'a dyn CategoriesWriteRepo,
}

/// Load `archive` into a source. Existing categories (by name) and posts (by
/// slug) are left untouched.
pub async fn import_archive(
    target: &ImportTarget<'_>,
    archive: &SiteArchive,
) -> Result<ImportSummary, AppError> {
    let mut summary = ImportSummary::default();

    let mut known = target.categories.list_categories().await?;
    for category in &archive.categories {
        if find_by_name(&known, &category.name).is_some() {
            summary.categories_skipped += 1;
            continue;
        }
        let created = target
            .categories_writer
            .create_category(CreateCategoryParams {
                id: category.id.clone(),
                name: category.name.clone(),
                slug: category.slug.clone(),
                description: category.description.clone(),
                color: category.color.clone(),
                is_active: category.is_active,
                source_urls: category.source_urls.clone(),
            })
            .await?;
        known.push(created);
        summary.categories_created += 1;
    }

    // Oldest first so head insertion leaves the newest post on top.
    for post in archive.posts.iter().rev() {
        if target.posts.find_by_slug(&post.slug).await?.is_some() {
            summary.posts_skipped += 1;
            continue;
        }
        target
            .posts_writer
            .create_post(CreatePostParams {
                id: post.id.clone(),
                slug: post.slug.clone(),
                title: post.title.clone(),
                excerpt: post.excerpt.clone(),
                body_html: post.body_html.clone(),
                source_url: post.source_url.clone(),
                category: post.category.clone(),
                tags: post.tags.clone(),
                image_url: post.image_url.clone(),
                author: post.author.clone(),
                status: post.status,
                publish_date: post.publish_date,
                featured: post.featured,
            })
            .await?;
        summary.posts_created += 1;
    }

    Ok(summary)
}

pub async fn import_site(target: &ImportTarget<'_>, path: &Path) -> Result<ImportSummary, AppError> {
    let archive = read_archive(path).await?;
    let summary = import_archive(target, &archive).await?;

    info!(
        target = "newsdesk::archive",
        path = %path.display(),
        posts_created = summary.posts_created,
        posts_skipped = summary.posts_skipped,
        categories_created = summary.categories_created,
        categories_skipped = summary.categories_skipped,
        "archive imported"
    );
    Ok(summary)
}
