//! Shared domain enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorRole {
    Admin,
    Ai,
}

impl AuthorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthorRole::Admin => "admin",
            AuthorRole::Ai => "ai",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AuthorRole::Admin => "Administrator",
            AuthorRole::Ai => "AI Writer",
        }
    }
}

/// Status selector used by the admin list (`all` keeps every status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    pub fn as_status(self) -> Option<PostStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Published => Some(PostStatus::Published),
            StatusFilter::Draft => Some(PostStatus::Draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_status_parses_case_insensitively() {
        assert_eq!("Published".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert_eq!(" draft ".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn status_filter_all_has_no_status() {
        assert_eq!(StatusFilter::All.as_status(), None);
        assert_eq!(StatusFilter::Draft.as_status(), Some(PostStatus::Draft));
    }
}
