//! Reader-facing handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use newsdesk_api_types::{PostCard, PostCardListResponse, PostDetail};

use crate::application::feed::FeedQuery;
use crate::application::pagination::page_links;

use super::{PublicListQuery, feed_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn public_posts(
    State(state): State<ApiState>,
    Query(query): Query<PublicListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let feed_query = FeedQuery {
        search: query.search,
        category: query.category,
        tag: query.tag,
    };

    let page = state
        .feed
        .list(&feed_query, query.page.unwrap_or(1))
        .await
        .map_err(feed_to_api)?;

    Ok(Json(PostCardListResponse {
        page_links: page_links(&page.info).into_iter().map(Into::into).collect(),
        posts: page.items.into_iter().map(PostCard::from).collect(),
        pagination: page.info.into(),
    }))
}

pub async fn public_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.feed.post_detail(&slug).await.map_err(feed_to_api)?;
    Ok(Json(PostDetail::from(detail)))
}

pub async fn featured_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let cards = state.feed.featured().await.map_err(feed_to_api)?;
    Ok(Json(cards.into_iter().map(PostCard::from).collect::<Vec<_>>()))
}

pub async fn recent_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let cards = state.feed.recent().await.map_err(feed_to_api)?;
    Ok(Json(cards.into_iter().map(PostCard::from).collect::<Vec<_>>()))
}
