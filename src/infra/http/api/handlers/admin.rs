//! Admin dashboard handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use newsdesk_api_types::{AdminPostListResponse, AdminPostRow, DashboardStats};

use crate::application::admin::posts::AdminPostQuery;
use crate::presentation::views::AdminPostRowView;

use super::{AdminListQuery, post_to_api, repo_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::middleware::RequirePrincipal;
use crate::infra::http::api::state::ApiState;

pub async fn dashboard_stats(
    State(state): State<ApiState>,
    RequirePrincipal(_principal): RequirePrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.dashboard.stats().await.map_err(repo_to_api)?;

    Ok(Json(DashboardStats {
        total_posts: stats.total_posts,
        published_posts: stats.published_posts,
        draft_posts: stats.draft_posts,
        total_categories: stats.total_categories,
    }))
}

/// Rows of the admin post table plus per-status totals for its tabs.
pub async fn admin_posts(
    State(state): State<ApiState>,
    RequirePrincipal(_principal): RequirePrincipal,
    Query(query): Query<AdminListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = AdminPostQuery {
        search: query.search,
        status: query.status.unwrap_or_default(),
        category: query.category,
        tag: query.tag,
        featured: query.featured,
    };
    let request = state.posts.page_request(query.page.unwrap_or(1));

    let page = state.posts.list(&filter, request).await.map_err(post_to_api)?;
    let counts = state.posts.status_counts().await.map_err(post_to_api)?;

    Ok(Json(AdminPostListResponse {
        posts: page
            .items
            .iter()
            .map(|post| AdminPostRow::from(AdminPostRowView::from_record(post)))
            .collect(),
        pagination: page.info.into(),
        counts: counts.into(),
    }))
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
