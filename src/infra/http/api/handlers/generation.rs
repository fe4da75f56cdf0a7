//! Draft generation handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use newsdesk_api_types::{GeneratePostRequest, GeneratedDraft, SummarizeRequest};

use crate::application::generation::GeneratePostParams;

use super::{ApiJson, generation_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::middleware::RequirePrincipal;
use crate::infra::http::api::state::ApiState;

pub async fn generate_post(
    State(state): State<ApiState>,
    RequirePrincipal(_principal): RequirePrincipal,
    ApiJson(payload): ApiJson<GeneratePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = GeneratePostParams {
        keyword: payload.keyword,
        source_url: payload.source_url,
        instruction: payload.instruction,
        category: payload.category,
        provider: payload.provider,
        model: payload.model,
    };

    let draft = state
        .generation
        .generate_post(&params)
        .await
        .map_err(generation_to_api)?;

    Ok(Json(GeneratedDraft::from(draft)))
}

pub async fn summarize(
    State(state): State<ApiState>,
    RequirePrincipal(_principal): RequirePrincipal,
    ApiJson(payload): ApiJson<SummarizeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = state
        .generation
        .summarize(&payload.content)
        .await
        .map_err(generation_to_api)?;

    Ok(Json(GeneratedDraft::from(draft)))
}
