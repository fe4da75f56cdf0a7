use std::sync::Arc;

use crate::application::admin::{AdminCategoryService, AdminDashboardService, AdminPostService};
use crate::application::auth::{Principal, TokenVerifier};
use crate::application::feed::FeedService;
use crate::application::generation::GenerationService;

#[derive(Clone)]
pub struct ApiState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<AdminPostService>,
    pub categories: Arc<AdminCategoryService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub generation: Arc<GenerationService>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl ApiState {
    pub fn actor_label(principal: &Principal) -> String {
        format!("user:{}:{}", principal.id, principal.name)
    }
}
