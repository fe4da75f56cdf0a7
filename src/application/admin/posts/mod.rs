mod commands;
mod queries;
mod service;
pub mod types;

pub use service::AdminPostService;
pub use types::{
    AdminPostError, AdminPostQuery, AdminPostStatusCounts, CreatePostCommand, UpdatePostCommand,
    ensure_non_empty, resolve_publish_date,
};
