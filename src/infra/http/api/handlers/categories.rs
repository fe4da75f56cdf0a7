//! Categories handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use newsdesk_api_types::{Category, CategoryCreateRequest, CategoryUpdateRequest};

use crate::application::admin::categories::{CreateCategoryCommand, UpdateCategoryCommand};

use super::{ApiJson, category_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::middleware::RequirePrincipal;
use crate::infra::http::api::state::ApiState;

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.categories.list().await.map_err(category_to_api)?;
    Ok(Json(
        categories
            .into_iter()
            .map(Category::from)
            .collect::<Vec<_>>(),
    ))
}

pub async fn create_category(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    ApiJson(payload): ApiJson<CategoryCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    let command = CreateCategoryCommand {
        name: payload.name,
        description: payload.description,
        color: payload.color,
        is_active: payload.is_active,
        source_urls: payload.source_urls.into_iter().map(Into::into).collect(),
    };

    let category = state
        .categories
        .create_category(&actor, command)
        .await
        .map_err(category_to_api)?;

    Ok((StatusCode::CREATED, Json(Category::from(category))))
}

pub async fn update_category(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CategoryUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    let command = UpdateCategoryCommand {
        id,
        name: payload.name,
        description: payload.description,
        color: payload.color,
        is_active: payload.is_active,
        source_urls: payload
            .source_urls
            .map(|urls| urls.into_iter().map(Into::into).collect()),
    };

    let category = state
        .categories
        .update_category(&actor, command)
        .await
        .map_err(category_to_api)?;

    Ok(Json(Category::from(category)))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = ApiState::actor_label(&principal);

    state
        .categories
        .delete_category(&actor, &id)
        .await
        .map_err(category_to_api)?;

    Ok(StatusCode::NO_CONTENT)
}
