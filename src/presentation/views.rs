//! View models handed to whatever renders the site.

use serde::Serialize;

use crate::domain::entities::PostRecord;
use crate::domain::posts::format_human_date;
use crate::domain::types::PostStatus;

/// Tags shown on a listing card.
pub const CARD_TAG_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCardView {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub author_initial: String,
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

impl PostCardView {
    pub fn from_record(post: &PostRecord) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            author_name: post.author.display_name().to_string(),
            author_avatar: post.author.avatar_url().map(str::to_string),
            author_initial: post.author.initial(),
            date: format_human_date(post.publish_date),
            category: post.category.clone(),
            tags: post.tags.iter().take(CARD_TAG_LIMIT).cloned().collect(),
            featured: post.featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetailView {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body_html: String,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl PostDetailView {
    pub fn from_record(post: &PostRecord) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            body_html: post.body_html.clone(),
            source_url: post.source_url.clone(),
            image_url: post.image_url.clone(),
            author_name: post.author.display_name().to_string(),
            author_avatar: post.author.avatar_url().map(str::to_string),
            date: format_human_date(post.publish_date),
            category: post.category.clone(),
            tags: post.tags.clone(),
        }
    }
}

/// Row of the admin post table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPostRowView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub category: String,
    pub author_name: String,
    pub date: String,
    pub featured: bool,
}

impl AdminPostRowView {
    pub fn from_record(post: &PostRecord) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            status: post.status,
            category: post.category.clone(),
            author_name: post.author.display_name().to_string(),
            date: format_human_date(post.publish_date),
            featured: post.featured,
        }
    }
}
