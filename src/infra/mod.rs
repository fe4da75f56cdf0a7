//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod generator;
pub mod http;
pub mod memory;
pub mod remote;
pub mod telemetry;

use reqwest::Url;

/// Ensure `url` ends in `/` so relative joins stay under its path.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
