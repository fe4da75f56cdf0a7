#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use newsdesk::application::admin::{
    AdminCategoryService, AdminDashboardService, AdminPostService,
};
use newsdesk::application::auth::{Principal, StaticTokenVerifier, TokenGrant};
use newsdesk::application::feed::FeedService;
use newsdesk::application::generation::{ContentGenerator, GenerationService};
use newsdesk::domain::types::AuthorRole;
use newsdesk::infra::http::{ApiState, build_router};
use newsdesk::infra::memory::InMemorySource;

pub const TOKEN: &str = "editor-token";

/// Full router over `source`, accepting [`TOKEN`] as an admin credential.
pub fn app(source: &InMemorySource, generator: Option<Arc<dyn ContentGenerator>>) -> Router {
    let source = Arc::new(source.clone());
    let verifier = StaticTokenVerifier::new([TokenGrant {
        token: TOKEN.to_string(),
        principal: Principal {
            id: "u-1".to_string(),
            name: "Editor".to_string(),
            email: Some("editor@example.com".to_string()),
            role: AuthorRole::Admin,
        },
        expires_at: None,
    }]);

    let state = ApiState {
        feed: Arc::new(FeedService::new(source.clone())),
        posts: Arc::new(AdminPostService::new(
            source.clone(),
            source.clone(),
            source.clone(),
        )),
        categories: Arc::new(AdminCategoryService::new(
            source.clone(),
            source.clone(),
            source.clone(),
        )),
        dashboard: Arc::new(AdminDashboardService::new(source.clone(), source.clone())),
        generation: Arc::new(GenerationService::new(
            generator,
            source,
            Duration::from_secs(5),
        )),
        verifier: Arc::new(verifier),
    };
    build_router(state)
}
