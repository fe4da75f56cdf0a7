use std::sync::Arc;

use serde::Serialize;

use crate::application::repos::{CategoriesRepo, PostsRepo, RepoError};
use crate::domain::posts::PostCriteria;
use crate::domain::types::PostStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
    pub total_categories: u64,
}

#[derive(Clone)]
pub struct AdminDashboardService {
    posts: Arc<dyn PostsRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl AdminDashboardService {
    pub fn new(posts: Arc<dyn PostsRepo>, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self { posts, categories }
    }

    pub async fn stats(&self) -> Result<DashboardStats, RepoError> {
        let criteria = PostCriteria::default();
        let (posts, categories) = tokio::try_join!(
            self.posts.list_posts(&criteria),
            self.categories.list_categories()
        )?;

        let published_posts = posts
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .count() as u64;
        let total_posts = posts.len() as u64;

        Ok(DashboardStats {
            total_posts,
            published_posts,
            draft_posts: total_posts - published_posts,
            total_categories: categories.len() as u64,
        })
    }
}
