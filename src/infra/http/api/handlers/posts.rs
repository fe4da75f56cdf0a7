//! Posts handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use newsdesk_api_types::{Post, PostCreateRequest, PostListResponse, PostUpdateRequest};

use crate::application::admin::posts::{AdminPostQuery, CreatePostCommand, UpdatePostCommand};
use crate::application::pagination::PageRequest;
use crate::domain::types::StatusFilter;

use super::{ApiJson, MAX_LIST_LIMIT, PostListQuery, post_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::middleware::{MaybePrincipal, RequirePrincipal};
use crate::infra::http::api::state::ApiState;

/// Anonymous callers only ever see published posts.
pub async fn list_posts(
    State(state): State<ApiState>,
    MaybePrincipal(principal): MaybePrincipal,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match principal {
        Some(_) => query.status.unwrap_or_default(),
        None => StatusFilter::Published,
    };
    let limit = query
        .limit
        .unwrap_or_else(|| state.posts.page_size())
        .clamp(1, MAX_LIST_LIMIT);

    let filter = AdminPostQuery {
        search: query.search,
        status,
        category: query.category,
        tag: query.tag,
        featured: query.featured,
    };

    let page = state
        .posts
        .list(&filter, PageRequest::new(query.page.unwrap_or(1), limit))
        .await
        .map_err(post_to_api)?;

    Ok(Json(PostListResponse {
        posts: page.items.into_iter().map(Post::from).collect(),
        pagination: page.info.into(),
    }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.get_post(&id).await.map_err(post_to_api)?;
    if principal.is_none() && !post.is_published() {
        return Err(ApiError::not_found("Post not found"));
    }
    Ok(Json(Post::from(post)))
}

pub async fn create_post(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    ApiJson(payload): ApiJson<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    let command = CreatePostCommand {
        title: payload.title,
        slug: payload.slug,
        excerpt: payload.excerpt,
        body_html: payload.body,
        source_url: payload.source_url,
        category: payload.category,
        tags: payload.tags,
        image_url: payload.image_url,
        author: payload.author.map(Into::into),
        status: payload.status.map(Into::into),
        publish_date: payload.publish_date,
        featured: payload.featured,
    };

    let post = state
        .posts
        .create_post(&actor, command)
        .await
        .map_err(post_to_api)?;

    Ok((StatusCode::CREATED, Json(Post::from(post))))
}

pub async fn update_post(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    let command = UpdatePostCommand {
        id,
        title: payload.title,
        slug: payload.slug,
        excerpt: payload.excerpt,
        body_html: payload.body,
        source_url: payload.source_url,
        category: payload.category,
        tags: payload.tags,
        image_url: payload.image_url,
        author: payload.author.map(Into::into),
        status: payload.status.map(Into::into),
        publish_date: payload.publish_date,
        featured: payload.featured,
    };

    let post = state
        .posts
        .update_post(&actor, command)
        .await
        .map_err(post_to_api)?;

    Ok(Json(Post::from(post)))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    state
        .posts
        .delete_post(&actor, &id)
        .await
        .map_err(post_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
