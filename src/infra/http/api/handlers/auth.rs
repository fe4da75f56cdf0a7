//! Token verification handler

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use newsdesk_api_types::{User, VerifyTokenRequest, VerifyTokenResponse};

use crate::domain::types::AuthorRole;

use super::ApiJson;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::middleware::auth_to_api;
use crate::infra::http::api::state::ApiState;

pub async fn verify_token(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<VerifyTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state
        .verifier
        .verify(&payload.id_token)
        .await
        .map_err(auth_to_api)?;

    let role = match principal.role {
        AuthorRole::Admin => "admin",
        AuthorRole::Ai => "ai",
    };

    Ok(Json(VerifyTokenResponse {
        user: User {
            id: principal.id,
            name: principal.name,
            email: principal.email,
            role: role.to_string(),
        },
    }))
}
