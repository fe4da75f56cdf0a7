//! Domain layer types and invariants.

pub mod categories;
pub mod content;
pub mod entities;
pub mod error;
pub mod posts;
pub mod slug;
pub mod types;
