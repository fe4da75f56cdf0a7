use metrics::counter;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostPatch, RepoError};
use crate::domain::categories::find_by_name;
use crate::domain::content::{derive_excerpt, normalize_tags, sanitize_body};
use crate::domain::entities::{Author, PostRecord};
use crate::domain::slug::{
    SlugAsyncError, SlugError, derive_slug_or_fallback, generate_unique_slug,
};
use crate::domain::types::PostStatus;

use super::service::AdminPostService;
use super::types::{
    AdminPostError, CreatePostCommand, UpdatePostCommand, ensure_non_empty, resolve_publish_date,
};

impl AdminPostService {
    pub async fn create_post(
        &self,
        actor: &str,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.body_html, "body")?;

        let category = self.resolve_category(&command.category).await?;
        let id = Uuid::new_v4().simple().to_string();

        let slug_source = non_blank(command.slug.as_deref()).unwrap_or(command.title.as_str());
        let base = derive_slug_or_fallback(slug_source, &id);
        let slug = self.unique_slug(&base, None).await?;

        let body_html = sanitize_body(&command.body_html);
        let excerpt = match non_blank(command.excerpt.as_deref()) {
            Some(excerpt) => excerpt.trim().to_string(),
            None => derive_excerpt(&body_html),
        };

        let params = CreatePostParams {
            id,
            slug,
            title: command.title.trim().to_string(),
            excerpt,
            body_html,
            source_url: command.source_url,
            category,
            tags: normalize_tags(command.tags),
            image_url: command.image_url,
            author: command.author.unwrap_or_else(Author::admin),
            status: command.status.unwrap_or(PostStatus::Draft),
            publish_date: command.publish_date.unwrap_or_else(OffsetDateTime::now_utc),
            featured: command.featured,
        };

        let post = self.writer.create_post(params).await?;

        counter!("newsdesk_posts_created_total").increment(1);
        info!(
            target = "newsdesk::admin::posts",
            actor,
            post_id = %post.id,
            slug = %post.slug,
            status = %post.status,
            "post created"
        );

        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &str,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let existing = self
            .reader
            .find_by_id(&command.id)
            .await?
            .ok_or(AdminPostError::NotFound)?;

        let mut patch = PostPatch::default();

        if let Some(title) = command.title {
            ensure_non_empty(&title, "title")?;
            patch.title = Some(title.trim().to_string());
        }

        if let Some(requested) = command.slug {
            let title = patch.title.as_deref().unwrap_or(existing.title.as_str());
            let source = non_blank(Some(requested.as_str())).unwrap_or(title);
            let base = derive_slug_or_fallback(source, &existing.id);
            if base != existing.slug {
                patch.slug = Some(self.unique_slug(&base, Some(&existing.id)).await?);
            }
        }

        if let Some(body) = command.body_html {
            ensure_non_empty(&body, "body")?;
            patch.body_html = Some(sanitize_body(&body));
        }

        if let Some(excerpt) = command.excerpt {
            patch.excerpt = Some(match non_blank(Some(excerpt.as_str())) {
                Some(excerpt) => excerpt.trim().to_string(),
                None => derive_excerpt(
                    patch
                        .body_html
                        .as_deref()
                        .unwrap_or(existing.body_html.as_str()),
                ),
            });
        }

        if let Some(category) = command.category {
            patch.category = Some(self.resolve_category(&category).await?);
        }

        if let Some(tags) = command.tags {
            patch.tags = Some(normalize_tags(tags));
        }

        let next_status = command.status.unwrap_or(existing.status);
        patch.status = command.status;
        patch.publish_date = resolve_publish_date(
            existing.status,
            next_status,
            command.publish_date,
            OffsetDateTime::now_utc(),
        );

        patch.source_url = command.source_url;
        patch.image_url = command.image_url;
        patch.author = command.author;
        patch.featured = command.featured;

        let post = self
            .writer
            .update_post(&existing.id, patch)
            .await
            .map_err(not_found_or_repo)?;

        info!(
            target = "newsdesk::admin::posts",
            actor,
            post_id = %post.id,
            slug = %post.slug,
            previous_status = %existing.status,
            status = %post.status,
            "post updated"
        );

        Ok(post)
    }

    pub async fn delete_post(&self, actor: &str, id: &str) -> Result<(), AdminPostError> {
        self.writer
            .delete_post(id)
            .await
            .map_err(not_found_or_repo)?;

        counter!("newsdesk_posts_deleted_total").increment(1);
        info!(
            target = "newsdesk::admin::posts",
            actor,
            post_id = id,
            "post deleted"
        );

        Ok(())
    }

    /// Canonical category name, matched case-insensitively against the vocabulary.
    async fn resolve_category(&self, name: &str) -> Result<String, AdminPostError> {
        ensure_non_empty(name, "category")?;
        let categories = self.categories.list_categories().await?;
        find_by_name(&categories, name)
            .map(|category| category.name.clone())
            .ok_or_else(|| AdminPostError::UnknownCategory(name.trim().to_string()))
    }

    async fn unique_slug(&self, base: &str, owner: Option<&str>) -> Result<String, AdminPostError> {
        let reader = self.reader.clone();
        let owner = owner.map(str::to_string);
        match generate_unique_slug(base, move |candidate| {
            let reader = reader.clone();
            let owner = owner.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_by_slug(&candidate)
                    .await
                    .map(|existing| match existing {
                        None => true,
                        Some(post) => owner.as_deref() == Some(post.id.as_str()),
                    })
            }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(SlugError::Exhausted { .. })) => {
                Err(AdminPostError::ConstraintViolation("slug"))
            }
            Err(SlugAsyncError::Slug(_)) => Err(AdminPostError::ConstraintViolation("title")),
            Err(SlugAsyncError::Predicate(err)) => Err(AdminPostError::Repo(err)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|candidate| !candidate.trim().is_empty())
}

fn not_found_or_repo(err: RepoError) -> AdminPostError {
    match err {
        RepoError::NotFound => AdminPostError::NotFound,
        other => AdminPostError::Repo(other),
    }
}
