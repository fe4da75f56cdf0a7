use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    application::repos::RepoError,
    domain::{
        entities::Author,
        types::{PostStatus, StatusFilter},
    },
};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("{0}")]
    ConstraintViolation(&'static str),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct CreatePostCommand {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body_html: String,
    pub source_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub author: Option<Author>,
    pub status: Option<PostStatus>,
    pub publish_date: Option<OffsetDateTime>,
    pub featured: bool,
}

/// Partial edit of an existing post; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body_html: Option<String>,
    pub source_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub author: Option<Author>,
    pub status: Option<PostStatus>,
    pub publish_date: Option<OffsetDateTime>,
    pub featured: Option<bool>,
}

/// Filters of the admin post list.
#[derive(Debug, Clone, Default)]
pub struct AdminPostQuery {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminPostStatusCounts {
    pub total: u64,
    pub draft: u64,
    pub published: u64,
}

/// Publish date to store after a status change.
///
/// An explicit override always wins. Otherwise a `draft -> published`
/// transition stamps `now`, and every other transition keeps the stored date.
pub fn resolve_publish_date(
    previous: PostStatus,
    next: PostStatus,
    requested: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    if requested.is_some() {
        return requested;
    }
    match (previous, next) {
        (PostStatus::Draft, PostStatus::Published) => Some(now),
        _ => None,
    }
}

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminPostError> {
    if value.trim().is_empty() {
        return Err(AdminPostError::ConstraintViolation(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn publishing_a_draft_stamps_now() {
        let now = datetime!(2024-05-01 12:00 UTC);
        assert_eq!(
            resolve_publish_date(PostStatus::Draft, PostStatus::Published, None, now),
            Some(now)
        );
    }

    #[test]
    fn explicit_publish_date_wins() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let chosen = datetime!(2024-04-01 08:00 UTC);
        assert_eq!(
            resolve_publish_date(PostStatus::Draft, PostStatus::Published, Some(chosen), now),
            Some(chosen)
        );
    }

    #[test]
    fn other_transitions_keep_stored_date() {
        let now = datetime!(2024-05-01 12:00 UTC);
        assert_eq!(
            resolve_publish_date(PostStatus::Published, PostStatus::Published, None, now),
            None
        );
        assert_eq!(
            resolve_publish_date(PostStatus::Published, PostStatus::Draft, None, now),
            None
        );
    }

    #[test]
    fn blank_values_violate_constraints() {
        assert!(matches!(
            ensure_non_empty("  ", "title"),
            Err(AdminPostError::ConstraintViolation("title"))
        ));
        assert!(ensure_non_empty("Title", "title").is_ok());
    }
}
