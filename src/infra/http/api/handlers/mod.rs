//! API handlers organized by resource type.
//!
//! Helper functions for error conversion are defined here and shared across modules.

mod admin;
mod auth;
mod categories;
mod generation;
mod posts;
mod public;

pub use admin::*;
pub use auth::*;
pub use categories::*;
pub use generation::*;
pub use posts::*;
pub use public::*;

use axum::extract::FromRequest;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::application::admin::categories::AdminCategoryError;
use crate::application::admin::posts::AdminPostError;
use crate::application::feed::FeedError;
use crate::application::generation::{GenerationError, GeneratorError};
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;
use crate::domain::types::StatusFilter;

use super::error::ApiError;

/// Largest page a client may request from `/blog/posts`.
pub const MAX_LIST_LIMIT: usize = 100;

/// JSON body whose rejections render the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// ----- Shared query structs -----

#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub category: Option<String>,
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<StatusFilter>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<usize>,
}

// ----- Shared error conversions -----

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => {
            ApiError::conflict("Duplicate record").with_detail(constraint)
        }
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::bad_request(message),
        RepoError::Transport { message } => {
            ApiError::new(StatusCode::BAD_GATEWAY, "Collection source unavailable")
                .with_detail(message)
        }
        RepoError::Unauthorized => {
            ApiError::new(StatusCode::BAD_GATEWAY, "Collection source rejected credentials")
        }
        RepoError::Persistence(message) => ApiError::internal(message),
    }
}

pub(crate) fn post_to_api(err: AdminPostError) -> ApiError {
    match err {
        AdminPostError::ConstraintViolation(field) => ApiError::bad_request("Invalid post")
            .with_field(field, format!("{field} is required")),
        AdminPostError::UnknownCategory(name) => ApiError::bad_request("Invalid post")
            .with_field("category", format!("unknown category `{name}`")),
        AdminPostError::NotFound => ApiError::not_found("Post not found"),
        AdminPostError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn category_to_api(err: AdminCategoryError) -> ApiError {
    match err {
        AdminCategoryError::ConstraintViolation(field) => ApiError::bad_request("Invalid category")
            .with_field(field, format!("{field} is required")),
        AdminCategoryError::DuplicateName(name) => {
            ApiError::conflict(format!("Category `{name}` already exists"))
        }
        AdminCategoryError::InUse { count } => {
            ApiError::conflict(format!("Category is used by {count} posts"))
        }
        AdminCategoryError::NotFound => ApiError::not_found("Category not found"),
        AdminCategoryError::Domain(domain) => domain_to_api(domain),
        AdminCategoryError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn domain_to_api(err: DomainError) -> ApiError {
    ApiError::bad_request("Invalid category").with_field(err.field(), err.to_string())
}

pub(crate) fn generation_to_api(err: GenerationError) -> ApiError {
    match err {
        GenerationError::Disabled => {
            ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Generation disabled")
        }
        GenerationError::InvalidInput(field) => ApiError::bad_request("Invalid generation request")
            .with_field(field, format!("{field} is required")),
        GenerationError::Timeout(after) => {
            ApiError::new(StatusCode::GATEWAY_TIMEOUT, "Generation timed out")
                .with_detail(format!("no answer after {after:?}"))
        }
        GenerationError::Backend(backend) => {
            let detail = backend.to_string();
            let message = match backend {
                GeneratorError::Malformed(_) => "Generation backend returned an unusable draft",
                GeneratorError::Transport(_) | GeneratorError::Backend { .. } => {
                    "Generation backend failed"
                }
            };
            ApiError::new(StatusCode::BAD_GATEWAY, message).with_detail(detail)
        }
        GenerationError::Repo(repo) => repo_to_api(repo),
    }
}

pub(crate) fn feed_to_api(err: FeedError) -> ApiError {
    match err {
        FeedError::NotFound(_) => ApiError::not_found("Post not found"),
        FeedError::Repo(repo) => repo_to_api(repo),
    }
}
