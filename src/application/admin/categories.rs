use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CategoryPatch, CreateCategoryParams, PostsRepo,
    RepoError,
};
use crate::domain::categories::{find_by_name, normalize_color, normalize_source_urls};
use crate::domain::entities::{CategoryRecord, SourceUrl};
use crate::domain::error::DomainError;
use crate::domain::posts::PostCriteria;
use crate::domain::slug::derive_slug;

#[derive(Debug, Error)]
pub enum AdminCategoryError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("category `{0}` already exists")]
    DuplicateName(String),
    #[error("category in use by {count} posts")]
    InUse { count: u64 },
    #[error("category not found")]
    NotFound,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
    pub source_urls: Vec<SourceUrl>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryCommand {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
    pub source_urls: Option<Vec<SourceUrl>>,
}

#[derive(Clone)]
pub struct AdminCategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
    posts: Arc<dyn PostsRepo>,
}

impl AdminCategoryService {
    pub fn new(
        reader: Arc<dyn CategoriesRepo>,
        writer: Arc<dyn CategoriesWriteRepo>,
        posts: Arc<dyn PostsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            posts,
        }
    }

    pub async fn list(&self) -> Result<Vec<CategoryRecord>, AdminCategoryError> {
        self.reader
            .list_categories()
            .await
            .map_err(AdminCategoryError::from)
    }

    pub async fn get(&self, id: &str) -> Result<CategoryRecord, AdminCategoryError> {
        self.reader
            .find_category(id)
            .await?
            .ok_or(AdminCategoryError::NotFound)
    }

    pub async fn create_category(
        &self,
        actor: &str,
        command: CreateCategoryCommand,
    ) -> Result<CategoryRecord, AdminCategoryError> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(AdminCategoryError::ConstraintViolation("name"));
        }

        self.ensure_name_available(&name, None).await?;

        let params = CreateCategoryParams {
            id: Uuid::new_v4().simple().to_string(),
            slug: category_slug(&name)?,
            name,
            description: trimmed(command.description),
            color: normalize_color(command.color.as_deref())?,
            is_active: command.is_active.unwrap_or(true),
            source_urls: normalize_source_urls(command.source_urls)?,
        };

        let category = self.writer.create_category(params).await?;
        info!(
            target = "newsdesk::admin::categories",
            actor,
            category_id = %category.id,
            name = %category.name,
            "category created"
        );
        Ok(category)
    }

    pub async fn update_category(
        &self,
        actor: &str,
        command: UpdateCategoryCommand,
    ) -> Result<CategoryRecord, AdminCategoryError> {
        let existing = self.get(&command.id).await?;
        let mut patch = CategoryPatch::default();

        if let Some(name) = command.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AdminCategoryError::ConstraintViolation("name"));
            }
            if name != existing.name {
                self.ensure_name_available(&name, Some(&existing.id)).await?;
                self.ensure_unused(&existing.name).await?;
                patch.slug = Some(category_slug(&name)?);
                patch.name = Some(name);
            }
        }

        patch.description = command.description;
        if let Some(color) = command.color {
            patch.color = Some(normalize_color(Some(&color))?);
        }
        patch.is_active = command.is_active;
        if let Some(sources) = command.source_urls {
            patch.source_urls = Some(normalize_source_urls(sources)?);
        }

        let category = self
            .writer
            .update_category(&existing.id, patch)
            .await
            .map_err(not_found_or_repo)?;
        info!(
            target = "newsdesk::admin::categories",
            actor,
            category_id = %category.id,
            name = %category.name,
            "category updated"
        );
        Ok(category)
    }

    pub async fn delete_category(&self, actor: &str, id: &str) -> Result<(), AdminCategoryError> {
        let existing = self.get(id).await?;
        self.ensure_unused(&existing.name).await?;

        self.writer
            .delete_category(id)
            .await
            .map_err(not_found_or_repo)?;
        info!(
            target = "newsdesk::admin::categories",
            actor,
            category_id = id,
            name = %existing.name,
            "category deleted"
        );
        Ok(())
    }

    async fn ensure_name_available(
        &self,
        name: &str,
        owner: Option<&str>,
    ) -> Result<(), AdminCategoryError> {
        let categories = self.reader.list_categories().await?;
        match find_by_name(&categories, name) {
            Some(found) if Some(found.id.as_str()) != owner => {
                Err(AdminCategoryError::DuplicateName(found.name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Fails with `InUse` while any post is filed under `name`.
    async fn ensure_unused(&self, name: &str) -> Result<(), AdminCategoryError> {
        let criteria = PostCriteria::default().with_category(name);
        let posts = self.posts.list_posts(&criteria).await?;
        let count = posts.iter().filter(|post| criteria.matches(post)).count() as u64;
        if count > 0 {
            return Err(AdminCategoryError::InUse { count });
        }
        Ok(())
    }
}

fn category_slug(name: &str) -> Result<String, AdminCategoryError> {
    derive_slug(name).map_err(|_| AdminCategoryError::ConstraintViolation("name"))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn not_found_or_repo(err: RepoError) -> AdminCategoryError {
    match err {
        RepoError::NotFound => AdminCategoryError::NotFound,
        other => AdminCategoryError::Repo(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::{CreatePostParams, PostsWriteRepo};
    use crate::domain::entities::Author;
    use crate::domain::types::PostStatus;
    use crate::infra::memory::InMemorySource;
    use time::macros::datetime;

    fn service(source: &InMemorySource) -> AdminCategoryService {
        let shared = Arc::new(source.clone());
        AdminCategoryService::new(shared.clone(), shared.clone(), shared)
    }

    async fn file_post_under(source: &InMemorySource, category: &str) {
        source
            .create_post(CreatePostParams {
                id: "p1".to_string(),
                slug: "filed".to_string(),
                title: "Filed".to_string(),
                excerpt: String::new(),
                body_html: "<p>Body</p>".to_string(),
                source_url: None,
                category: category.to_string(),
                tags: Vec::new(),
                image_url: None,
                author: Author::admin(),
                status: PostStatus::Draft,
                publish_date: datetime!(2024-01-01 00:00 UTC),
                featured: false,
            })
            .await
            .expect("post");
    }

    #[tokio::test]
    async fn create_normalizes_fields() {
        let source = InMemorySource::new();
        let created = service(&source)
            .create_category(
                "test",
                CreateCategoryCommand {
                    name: "  Culture & Arts ".to_string(),
                    description: Some("   ".to_string()),
                    color: Some("#ff8800".to_string()),
                    ..CreateCategoryCommand::default()
                },
            )
            .await
            .expect("created");

        assert_eq!(created.name, "Culture & Arts");
        assert_eq!(created.color, "#FF8800");
        assert_eq!(created.description, None);
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn names_are_unique_ignoring_case() {
        let source = InMemorySource::with_default_categories();
        let err = service(&source)
            .create_category(
                "test",
                CreateCategoryCommand {
                    name: "science".to_string(),
                    ..CreateCategoryCommand::default()
                },
            )
            .await
            .expect_err("duplicate");
        assert!(matches!(err, AdminCategoryError::DuplicateName(name) if name == "Science"));
    }

    #[tokio::test]
    async fn invalid_color_is_a_domain_error() {
        let source = InMemorySource::new();
        let err = service(&source)
            .create_category(
                "test",
                CreateCategoryCommand {
                    name: "Sports".to_string(),
                    color: Some("red".to_string()),
                    ..CreateCategoryCommand::default()
                },
            )
            .await
            .expect_err("color");
        assert!(matches!(
            err,
            AdminCategoryError::Domain(DomainError::InvalidColor { .. })
        ));
    }

    #[tokio::test]
    async fn categories_in_use_cannot_be_renamed_or_deleted() {
        let source = InMemorySource::with_default_categories();
        file_post_under(&source, "Science").await;
        let service = service(&source);
        let science = service
            .list()
            .await
            .expect("list")
            .into_iter()
            .find(|category| category.name == "Science")
            .expect("science");

        let err = service
            .delete_category("test", &science.id)
            .await
            .expect_err("in use");
        assert!(matches!(err, AdminCategoryError::InUse { count: 1 }));

        let err = service
            .update_category(
                "test",
                UpdateCategoryCommand {
                    id: science.id.clone(),
                    name: Some("Research".to_string()),
                    ..UpdateCategoryCommand::default()
                },
            )
            .await
            .expect_err("in use");
        assert!(matches!(err, AdminCategoryError::InUse { .. }));

        let recoloured = service
            .update_category(
                "test",
                UpdateCategoryCommand {
                    id: science.id,
                    color: Some("#000000".to_string()),
                    ..UpdateCategoryCommand::default()
                },
            )
            .await
            .expect("colour change");
        assert_eq!(recoloured.color, "#000000");
    }

    #[tokio::test]
    async fn unused_categories_can_be_deleted() {
        let source = InMemorySource::with_default_categories();
        let service = service(&source);
        let first = service.list().await.expect("list").remove(0);

        service
            .delete_category("test", &first.id)
            .await
            .expect("deleted");
        assert_eq!(service.list().await.expect("list").len(), 5);
        assert!(matches!(
            service.get(&first.id).await,
            Err(AdminCategoryError::NotFound)
        ));
    }
}
