//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feed;
pub mod generation;
pub mod listing;
pub mod live_search;
pub mod pagination;
pub mod repos;
pub mod site;
