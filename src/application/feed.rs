use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::application::pagination::{PUBLIC_PAGE_SIZE, Page, PageRequest, paginate};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::{PostCriteria, select_posts};
use crate::presentation::views::{PostCardView, PostDetailView};

/// Number of posts shown in the featured and recent strips.
pub const HIGHLIGHT_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("post `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Reader-supplied filters of the public listing; status is always `published`.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl FeedQuery {
    fn criteria(&self) -> PostCriteria {
        PostCriteria {
            search: self.search.clone(),
            category: self.category.clone(),
            tag: self.tag.clone(),
            ..PostCriteria::published()
        }
    }
}

/// Public read side: filter, sort, paginate and present published posts.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    page_size: usize,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self {
            posts,
            page_size: PUBLIC_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn list(&self, query: &FeedQuery, page: usize) -> Result<Page<PostCardView>, FeedError> {
        let criteria = query.criteria();
        let records = self.posts.list_posts(&criteria).await?;
        let selected = select_posts(&records, &criteria);

        debug!(
            target = "newsdesk::application::feed",
            candidates = records.len(),
            matched = selected.len(),
            page,
            "public listing assembled"
        );

        let page = paginate(selected, PageRequest::new(page, self.page_size));
        Ok(page.map(PostCardView::from_record))
    }

    /// Newest published posts flagged as featured.
    pub async fn featured(&self) -> Result<Vec<PostCardView>, FeedError> {
        let criteria = PostCriteria::published();
        let records = self.posts.list_posts(&criteria).await?;
        Ok(select_posts(&records, &criteria)
            .into_iter()
            .filter(|post| post.featured)
            .take(HIGHLIGHT_LIMIT)
            .map(PostCardView::from_record)
            .collect())
    }

    pub async fn recent(&self) -> Result<Vec<PostCardView>, FeedError> {
        let criteria = PostCriteria::published();
        let records = self.posts.list_posts(&criteria).await?;
        Ok(select_posts(&records, &criteria)
            .into_iter()
            .take(HIGHLIGHT_LIMIT)
            .map(PostCardView::from_record)
            .collect())
    }

    /// Detail view by slug; drafts are invisible to readers.
    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailView, FeedError> {
        match self.posts.find_by_slug(slug).await? {
            Some(post) if post.is_published() => Ok(PostDetailView::from_record(&post)),
            _ => Err(FeedError::NotFound(slug.to_string())),
        }
    }
}
