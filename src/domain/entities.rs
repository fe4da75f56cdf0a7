//! Domain entities owned by the collection sources.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::types::{AuthorRole, PostStatus};

pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// Vocabulary installed in a fresh in-memory source.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Technology",
    "Science",
    "Lifestyle",
    "Travel",
    "Business",
    "News",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    Role {
        role: AuthorRole,
    },
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        avatar_url: Option<String>,
    },
}

impl Author {
    pub fn admin() -> Self {
        Author::Role {
            role: AuthorRole::Admin,
        }
    }

    pub fn ai() -> Self {
        Author::Role {
            role: AuthorRole::Ai,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Author::Role { role } => role.display_name(),
            Author::Named { name, .. } => name.as_str(),
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        match self {
            Author::Role { .. } => None,
            Author::Named { avatar_url, .. } => avatar_url.as_deref(),
        }
    }

    /// Uppercased first character of the display name, used when no avatar exists.
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|ch| ch.to_uppercase().collect())
            .unwrap_or_default()
    }
}

impl Default for Author {
    fn default() -> Self {
        Author::admin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Author,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub publish_date: OffsetDateTime,
    #[serde(default)]
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PostRecord {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    pub is_active: bool,
    #[serde(default)]
    pub source_urls: Vec<SourceUrl>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
