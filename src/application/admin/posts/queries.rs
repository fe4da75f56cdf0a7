use crate::application::pagination::{Page, PageRequest, paginate};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{PostCriteria, select_posts};
use crate::domain::types::PostStatus;

use super::service::AdminPostService;
use super::types::{AdminPostError, AdminPostQuery, AdminPostStatusCounts};

impl AdminPostService {
    pub async fn get_post(&self, id: &str) -> Result<PostRecord, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound)
    }

    pub fn page_request(&self, page: usize) -> PageRequest {
        PageRequest::new(page, self.page_size)
    }

    /// Admin listing: drafts included unless the status filter says otherwise.
    pub async fn list(
        &self,
        query: &AdminPostQuery,
        request: PageRequest,
    ) -> Result<Page<PostRecord>, AdminPostError> {
        let criteria = PostCriteria {
            search: query.search.clone(),
            category: query.category.clone(),
            tag: query.tag.clone(),
            status: query.status.as_status(),
        };
        let records = self.reader.list_posts(&criteria).await?;
        let selected: Vec<&PostRecord> = select_posts(&records, &criteria)
            .into_iter()
            .filter(|post| query.featured.is_none_or(|featured| post.featured == featured))
            .collect();
        let page = paginate(selected, request);
        Ok(page.map(PostRecord::clone))
    }

    pub async fn status_counts(&self) -> Result<AdminPostStatusCounts, AdminPostError> {
        let records = self.reader.list_posts(&PostCriteria::default()).await?;
        let published = records
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .count() as u64;
        let total = records.len() as u64;

        Ok(AdminPostStatusCounts {
            total,
            draft: total - published,
            published,
        })
    }
}
