//! Utilities for generating deterministic, human-friendly slugs.
//!
//! The helpers here bridge ASCII slugification (`slug` crate) with Chinese
//! transliteration (`pinyin` crate) so inputs like “基线对齐” become
//! `ji-xian-dui-qi`. Consumers provide their own uniqueness predicate so the
//! slug logic stays pure while the collection source decides what collides.

use std::future::Future;

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 32;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors that can occur while generating a slug via an async uniqueness check.
#[derive(Debug, Error)]
pub enum SlugAsyncError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Slug used when a title yields no representable characters.
pub fn fallback_slug(id: &str) -> String {
    format!("post-{id}")
}

/// Derive a slug from `input`, falling back to `post-<id>` when nothing survives.
pub fn derive_slug_or_fallback(input: &str, id: &str) -> String {
    derive_slug(input).unwrap_or_else(|_| fallback_slug(id))
}

/// Produce a slug that does not collide according to the awaited predicate.
///
/// `is_unique` answers `true` when the candidate is free; collisions are retried
/// with a counter suffix (`-2`, `-3`, …).
pub async fn generate_unique_slug<F, Fut, E>(
    base: &str,
    mut is_unique: F,
) -> Result<String, SlugAsyncError<E>>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    if base.is_empty() {
        return Err(SlugAsyncError::Slug(SlugError::EmptyInput));
    }

    if is_unique(base).await.map_err(SlugAsyncError::Predicate)? {
        return Ok(base.to_string());
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate)
            .await
            .map_err(SlugAsyncError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugAsyncError::Slug(SlugError::Exhausted {
        base: base.to_string(),
    }))
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        // Apostrophes join words ("don't" -> "dont") instead of splitting them.
        if matches!(ch, '\'' | '\u{2019}') {
            continue;
        }

        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_strips_punctuation() {
        assert_eq!(derive_slug("Hello, World!").expect("slug"), "hello-world");
        assert_eq!(
            derive_slug("  The Future of   AI ").expect("slug"),
            "the-future-of-ai"
        );
        assert_eq!(derive_slug("Don't Panic").expect("slug"), "dont-panic");
    }

    #[test]
    fn derive_slug_transliterates_chinese() {
        let slug = derive_slug("Rust 基础教程").expect("slug");
        assert_eq!(slug, "rust-ji-chu-jiao-cheng");
    }

    #[test]
    fn punctuation_only_titles_fall_back_to_id() {
        assert!(matches!(
            derive_slug("!!!"),
            Err(SlugError::Unrepresentable { .. })
        ));
        assert_eq!(derive_slug_or_fallback("!!!", "42"), "post-42");
        assert_eq!(derive_slug_or_fallback("   ", "7"), "post-7");
    }

    #[tokio::test]
    async fn generate_unique_slug_exhausted() {
        let result = generate_unique_slug("example", |_| async {
            Ok::<bool, std::convert::Infallible>(false)
        })
        .await
        .expect_err("should exhaust attempts");
        assert!(matches!(
            result,
            SlugAsyncError::Slug(SlugError::Exhausted { ref base }) if base == "example"
        ));
    }

    #[tokio::test]
    async fn generate_unique_slug_appends_counter() {
        use std::sync::Arc;
        use tokio::sync::Mutex;

        let existing = Arc::new(Mutex::new(vec!["pattern-library".to_string()]));

        let slug = generate_unique_slug("pattern-library", |candidate| {
            let existing = existing.clone();
            let candidate = candidate.to_string();
            async move {
                let mut guard = existing.lock().await;
                if guard.contains(&candidate) {
                    Ok::<bool, std::convert::Infallible>(false)
                } else {
                    guard.push(candidate);
                    Ok::<bool, std::convert::Infallible>(true)
                }
            }
        })
        .await
        .expect("unique slug");

        assert_eq!(slug, "pattern-library-2");
        let guard = existing.lock().await;
        assert!(guard.contains(&slug));
    }
}
