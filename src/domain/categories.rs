//! Category vocabulary rules.

use url::Url;

use crate::domain::entities::{CategoryRecord, DEFAULT_CATEGORY_COLOR, SourceUrl};
use crate::domain::error::DomainError;

/// Accept `#RRGGBB` colours; blank input resolves to the default colour.
pub fn normalize_color(color: Option<&str>) -> Result<String, DomainError> {
    let value = match color.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_CATEGORY_COLOR.to_string()),
        Some(value) => value,
    };

    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()))
        .ok_or_else(|| DomainError::invalid_color(value))?;

    Ok(format!("#{}", hex.to_ascii_uppercase()))
}

/// Validate every source URL and order the list by ascending priority.
pub fn normalize_source_urls(mut sources: Vec<SourceUrl>) -> Result<Vec<SourceUrl>, DomainError> {
    for source in &mut sources {
        let trimmed = source.url.trim();
        let parsed = Url::parse(trimmed)
            .map_err(|err| DomainError::invalid_source_url(trimmed, err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::invalid_source_url(
                trimmed,
                "scheme must be http or https",
            ));
        }
        source.url = parsed.to_string();
        source.description = source
            .description
            .take()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }

    sources.sort_by_key(|source| source.priority);
    Ok(sources)
}

/// Case-insensitive lookup of a category name in the vocabulary.
pub fn find_by_name<'a>(categories: &'a [CategoryRecord], name: &str) -> Option<&'a CategoryRecord> {
    let needle = name.trim();
    categories
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_defaults_and_normalizes_case() {
        assert_eq!(normalize_color(None).expect("default"), "#3B82F6");
        assert_eq!(normalize_color(Some("  ")).expect("blank"), "#3B82F6");
        assert_eq!(normalize_color(Some("#10b981")).expect("hex"), "#10B981");
    }

    #[test]
    fn color_rejects_malformed_values() {
        assert!(normalize_color(Some("10b981")).is_err());
        assert!(normalize_color(Some("#12345")).is_err());
        assert_eq!(
            normalize_color(Some("#zzzzzz")),
            Err(DomainError::invalid_color("#zzzzzz"))
        );
    }

    #[test]
    fn source_urls_sorted_by_priority() {
        let sources = vec![
            SourceUrl {
                url: "https://example.com/feed".to_string(),
                description: Some("  secondary ".to_string()),
                priority: 2,
            },
            SourceUrl {
                url: "https://news.example.org".to_string(),
                description: Some(String::new()),
                priority: 1,
            },
        ];

        let normalized = normalize_source_urls(sources).expect("valid sources");
        assert_eq!(normalized[0].url, "https://news.example.org/");
        assert_eq!(normalized[0].description, None);
        assert_eq!(normalized[1].description.as_deref(), Some("secondary"));
    }

    #[test]
    fn source_urls_reject_non_http_schemes() {
        let sources = vec![SourceUrl {
            url: "ftp://example.com".to_string(),
            description: None,
            priority: 0,
        }];
        assert!(normalize_source_urls(sources).is_err());
    }
}
