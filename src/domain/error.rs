use thiserror::Error;

/// Category vocabulary values that fail validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("color `{value}` must be a #RRGGBB hex value")]
    InvalidColor { value: String },
    #[error("source url `{url}` is invalid: {reason}")]
    InvalidSourceUrl { url: String, reason: String },
}

impl DomainError {
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    pub fn invalid_source_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSourceUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Request field the failure belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::InvalidColor { .. } => "color",
            DomainError::InvalidSourceUrl { .. } => "sourceUrls",
        }
    }
}
