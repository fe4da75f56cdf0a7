//! Pure filter and ordering stages of the post listing pipeline.
//!
//! Both stages borrow the collection owned by a source and never mutate the
//! records they see; callers decide which subset to paginate and present.

use std::cmp::Ordering;

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::domain::entities::PostRecord;
use crate::domain::types::PostStatus;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Active filter dimensions; every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCriteria {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub status: Option<PostStatus>,
}

impl PostCriteria {
    /// Criteria for the public listing: published posts only.
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_status(mut self, status: Option<PostStatus>) -> Self {
        self.status = status;
        self
    }

    /// Lowercased search needle, or `None` when the search box is blank.
    fn search_needle(&self) -> Option<String> {
        non_blank(self.search.as_deref()).map(str::to_lowercase)
    }

    pub fn matches(&self, post: &PostRecord) -> bool {
        self.matches_with_needle(post, self.search_needle().as_deref())
    }

    fn matches_with_needle(&self, post: &PostRecord, needle: Option<&str>) -> bool {
        if let Some(status) = self.status
            && post.status != status
        {
            return false;
        }

        if let Some(needle) = needle
            && !post.title.to_lowercase().contains(needle)
            && !post.excerpt.to_lowercase().contains(needle)
        {
            return false;
        }

        if let Some(category) = non_blank(self.category.as_deref())
            && post.category != category
        {
            return false;
        }

        if let Some(tag) = non_blank(self.tag.as_deref())
            && !post.has_tag(tag)
        {
            return false;
        }

        true
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|candidate| !candidate.trim().is_empty())
}

/// Keep the posts satisfying every active criterion, preserving input order.
pub fn filter_posts<'a>(posts: &'a [PostRecord], criteria: &PostCriteria) -> Vec<&'a PostRecord> {
    let needle = criteria.search_needle();
    posts
        .iter()
        .filter(|post| criteria.matches_with_needle(post, needle.as_deref()))
        .collect()
}

/// Order posts newest first by publish date; ties keep their incoming order.
pub fn sort_by_publish_date(posts: &mut [&PostRecord]) {
    // `sort_by` is a stable merge sort.
    posts.sort_by(|a, b| compare_publish_date_desc(a, b));
}

fn compare_publish_date_desc(a: &PostRecord, b: &PostRecord) -> Ordering {
    b.publish_date.cmp(&a.publish_date)
}

/// Filter then order, the shared front half of every listing.
pub fn select_posts<'a>(posts: &'a [PostRecord], criteria: &PostCriteria) -> Vec<&'a PostRecord> {
    let mut selected = filter_posts(posts, criteria);
    sort_by_publish_date(&mut selected);
    selected
}

/// Render a publish date as `Month D, YYYY`.
pub fn format_human_date(date: OffsetDateTime) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Author;
    use time::macros::datetime;

    fn post(id: &str, title: &str, day: u8) -> PostRecord {
        let publish_date = datetime!(2024-03-01 09:00 UTC)
            .replace_day(day)
            .expect("valid day");
        PostRecord {
            id: id.to_string(),
            slug: format!("post-{id}"),
            title: title.to_string(),
            excerpt: format!("Excerpt for {title}"),
            body_html: "<p>Body</p>".to_string(),
            source_url: None,
            category: "Technology".to_string(),
            tags: vec!["AI".to_string()],
            image_url: None,
            author: Author::admin(),
            status: PostStatus::Published,
            publish_date,
            featured: false,
            created_at: publish_date,
            updated_at: publish_date,
        }
    }

    fn sample() -> Vec<PostRecord> {
        let mut travel = post("2", "Backpacking Patagonia", 3);
        travel.category = "Travel".to_string();
        travel.tags = vec!["Adventure".to_string()];

        let mut draft = post("3", "Draft about AI safety", 4);
        draft.status = PostStatus::Draft;

        let mut science = post("4", "Mapping the deep sea", 2);
        science.category = "Science".to_string();
        science.excerpt = "New research on ai-guided submarines".to_string();
        science.tags = vec!["Research".to_string(), "AI".to_string()];

        vec![post("1", "The Future of AI", 1), travel, draft, science]
    }

    fn ids(posts: &[&PostRecord]) -> Vec<String> {
        posts.iter().map(|post| post.id.clone()).collect()
    }

    #[test]
    fn search_matches_title_or_excerpt_case_insensitively() {
        let posts = sample();
        let criteria = PostCriteria::published().with_search("AI");
        assert_eq!(ids(&filter_posts(&posts, &criteria)), vec!["1", "4"]);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let posts = sample();
        let criteria = PostCriteria {
            search: Some("   ".to_string()),
            category: Some(String::new()),
            tag: Some(" ".to_string()),
            status: None,
        };
        assert_eq!(filter_posts(&posts, &criteria).len(), posts.len());
    }

    #[test]
    fn filters_compose_conjunctively() {
        let posts = sample();
        let criteria = PostCriteria::published()
            .with_search("ai")
            .with_category("Science")
            .with_tag("Research");
        let selected = filter_posts(&posts, &criteria);
        assert_eq!(ids(&selected), vec!["4"]);
        assert!(selected.iter().all(|post| criteria.matches(post)));
    }

    #[test]
    fn filtering_is_idempotent_and_a_subset() {
        let posts = sample();
        let criteria = PostCriteria::published().with_tag("AI");
        let once: Vec<PostRecord> = filter_posts(&posts, &criteria)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_posts(&once, &criteria);
        assert_eq!(ids(&twice), once.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
        assert!(once.iter().all(|post| posts.contains(post)));
    }

    #[test]
    fn search_with_no_matches_yields_empty() {
        let posts = sample();
        let criteria = PostCriteria::default().with_search("quantum");
        assert!(filter_posts(&posts, &criteria).is_empty());
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut posts = sample();
        posts.push(post("5", "Same day as one", 1));
        let mut selected: Vec<&PostRecord> = posts.iter().collect();
        sort_by_publish_date(&mut selected);

        assert_eq!(ids(&selected), vec!["3", "2", "4", "1", "5"]);
        assert!(
            selected
                .windows(2)
                .all(|pair| pair[0].publish_date >= pair[1].publish_date)
        );
    }

    #[test]
    fn human_date_has_no_padding() {
        assert_eq!(
            format_human_date(datetime!(2024-03-05 18:30 UTC)),
            "March 5, 2024"
        );
    }
}
