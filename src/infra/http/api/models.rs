//! Conversions between domain records and the camelCase wire types.

use newsdesk_api_types as wire;

use crate::application::generation::GeneratedDraft;
use crate::application::admin::posts::AdminPostStatusCounts;
use crate::application::pagination::{PageLink, PaginationInfo};
use crate::domain::entities::{Author, CategoryRecord, PostRecord, SourceUrl};
use crate::domain::types::{AuthorRole, PostStatus};
use crate::presentation::views::{AdminPostRowView, PostCardView, PostDetailView};

impl From<PostStatus> for wire::PostStatus {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => wire::PostStatus::Draft,
            PostStatus::Published => wire::PostStatus::Published,
        }
    }
}

impl From<wire::PostStatus> for PostStatus {
    fn from(status: wire::PostStatus) -> Self {
        match status {
            wire::PostStatus::Draft => PostStatus::Draft,
            wire::PostStatus::Published => PostStatus::Published,
        }
    }
}

impl From<AuthorRole> for wire::AuthorRole {
    fn from(role: AuthorRole) -> Self {
        match role {
            AuthorRole::Admin => wire::AuthorRole::Admin,
            AuthorRole::Ai => wire::AuthorRole::Ai,
        }
    }
}

impl From<wire::AuthorRole> for AuthorRole {
    fn from(role: wire::AuthorRole) -> Self {
        match role {
            wire::AuthorRole::Admin => AuthorRole::Admin,
            wire::AuthorRole::Ai => AuthorRole::Ai,
        }
    }
}

impl From<Author> for wire::Author {
    fn from(author: Author) -> Self {
        match author {
            Author::Role { role } => wire::Author::Role { role: role.into() },
            Author::Named { name, avatar_url } => wire::Author::Named { name, avatar_url },
        }
    }
}

impl From<wire::Author> for Author {
    fn from(author: wire::Author) -> Self {
        match author {
            wire::Author::Role { role } => Author::Role { role: role.into() },
            wire::Author::Named { name, avatar_url } => Author::Named { name, avatar_url },
        }
    }
}

impl From<PostRecord> for wire::Post {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            body: post.body_html,
            source_url: post.source_url,
            category: post.category,
            tags: post.tags,
            image_url: post.image_url,
            author: post.author.into(),
            status: post.status.into(),
            publish_date: post.publish_date,
            featured: post.featured,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<wire::Post> for PostRecord {
    fn from(post: wire::Post) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            body_html: post.body,
            source_url: post.source_url,
            category: post.category,
            tags: post.tags,
            image_url: post.image_url,
            author: post.author.into(),
            status: post.status.into(),
            publish_date: post.publish_date,
            featured: post.featured,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<SourceUrl> for wire::SourceUrl {
    fn from(source: SourceUrl) -> Self {
        Self {
            url: source.url,
            description: source.description,
            priority: source.priority,
        }
    }
}

impl From<wire::SourceUrl> for SourceUrl {
    fn from(source: wire::SourceUrl) -> Self {
        Self {
            url: source.url,
            description: source.description,
            priority: source.priority,
        }
    }
}

impl From<CategoryRecord> for wire::Category {
    fn from(category: CategoryRecord) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            color: category.color,
            is_active: category.is_active,
            source_urls: category.source_urls.into_iter().map(Into::into).collect(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<wire::Category> for CategoryRecord {
    fn from(category: wire::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            color: category.color,
            is_active: category.is_active,
            source_urls: category.source_urls.into_iter().map(Into::into).collect(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<PaginationInfo> for wire::PaginationInfo {
    fn from(info: PaginationInfo) -> Self {
        Self {
            current_page: info.current_page as u64,
            total_pages: info.total_pages as u64,
            total_items: info.total_items as u64,
            items_per_page: info.items_per_page as u64,
        }
    }
}

impl From<PageLink> for wire::PageLink {
    fn from(link: PageLink) -> Self {
        match link {
            PageLink::Page(page) => wire::PageLink::Page(page as u64),
            PageLink::Gap => wire::PageLink::Gap,
        }
    }
}

impl From<AdminPostStatusCounts> for wire::PostStatusCounts {
    fn from(counts: AdminPostStatusCounts) -> Self {
        Self {
            total: counts.total,
            draft: counts.draft,
            published: counts.published,
        }
    }
}

impl From<AdminPostRowView> for wire::AdminPostRow {
    fn from(row: AdminPostRowView) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            status: row.status.into(),
            category: row.category,
            author_name: row.author_name,
            date: row.date,
            featured: row.featured,
        }
    }
}

impl From<PostCardView> for wire::PostCard {
    fn from(card: PostCardView) -> Self {
        Self {
            title: card.title,
            slug: card.slug,
            excerpt: card.excerpt,
            image_url: card.image_url,
            author_name: card.author_name,
            author_avatar: card.author_avatar,
            author_initial: card.author_initial,
            date: card.date,
            category: card.category,
            tags: card.tags,
            featured: card.featured,
        }
    }
}

impl From<PostDetailView> for wire::PostDetail {
    fn from(detail: PostDetailView) -> Self {
        Self {
            title: detail.title,
            slug: detail.slug,
            excerpt: detail.excerpt,
            body: detail.body_html,
            source_url: detail.source_url,
            image_url: detail.image_url,
            author_name: detail.author_name,
            author_avatar: detail.author_avatar,
            date: detail.date,
            category: detail.category,
            tags: detail.tags,
        }
    }
}

impl From<GeneratedDraft> for wire::GeneratedDraft {
    fn from(draft: GeneratedDraft) -> Self {
        Self {
            title: draft.title,
            body: draft.body_html,
            excerpt: draft.excerpt,
            tags: draft.tags,
            category: draft.category,
        }
    }
}
