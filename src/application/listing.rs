//! Navigation state for a paginated listing.

use thiserror::Error;

use crate::application::pagination::{PageRequest, PaginationInfo};
use crate::domain::posts::PostCriteria;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("page {requested} is outside 1..={total_pages}")]
    PageOutOfRange { requested: usize, total_pages: usize },
}

/// Criteria plus current page; any criteria change returns to page one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    criteria: PostCriteria,
    page: usize,
    per_page: usize,
}

impl ListingState {
    pub fn new(criteria: PostCriteria, per_page: usize) -> Self {
        Self {
            criteria,
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn criteria(&self) -> &PostCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    /// Replace the criteria. The page resets to one whenever they differ.
    pub fn set_criteria(&mut self, criteria: PostCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, search: Option<String>) {
        let criteria = PostCriteria {
            search,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        let criteria = PostCriteria {
            category,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria);
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        let criteria = PostCriteria {
            tag,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria);
    }

    /// Move to `page` when it lies within `1..=total_pages` of the last result.
    pub fn go_to(&mut self, page: usize, info: &PaginationInfo) -> Result<(), ListingError> {
        if !info.contains(page) {
            return Err(ListingError::PageOutOfRange {
                requested: page,
                total_pages: info.total_pages,
            });
        }
        self.page = page;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(total_items: usize) -> PaginationInfo {
        PaginationInfo::new(PageRequest::first(9), total_items)
    }

    #[test]
    fn criteria_change_resets_page() {
        let mut state = ListingState::new(PostCriteria::published(), 9);
        state.go_to(3, &info(30)).expect("page 3 exists");
        assert_eq!(state.page(), 3);

        state.set_category(Some("Science".to_string()));
        assert_eq!(state.page(), 1);
        assert_eq!(state.criteria().category.as_deref(), Some("Science"));
    }

    #[test]
    fn identical_criteria_keep_page() {
        let mut state = ListingState::new(PostCriteria::published(), 9);
        state.go_to(2, &info(30)).expect("page 2 exists");
        state.set_criteria(PostCriteria::published());
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn out_of_range_navigation_is_rejected() {
        let mut state = ListingState::new(PostCriteria::published(), 9);
        let result = state.go_to(5, &info(30));
        assert_eq!(
            result,
            Err(ListingError::PageOutOfRange {
                requested: 5,
                total_pages: 4
            })
        );
        assert_eq!(state.page(), 1);
        assert!(state.go_to(0, &info(30)).is_err());
    }
}
