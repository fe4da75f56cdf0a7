use time::macros::datetime;

use newsdesk::application::repos::{CategoriesRepo, CreatePostParams, PostsRepo, PostsWriteRepo};
use newsdesk::application::error::AppError;
use newsdesk::application::site::{
    ImportSummary, ImportTarget, SiteArchive, export_site, import_site,
};
use newsdesk::domain::entities::{Author, PostRecord};
use newsdesk::domain::posts::PostCriteria;
use newsdesk::domain::types::PostStatus;
use newsdesk::infra::memory::InMemorySource;

fn post(slug: &str, status: PostStatus, day: u8) -> CreatePostParams {
    CreatePostParams {
        id: format!("id-{slug}"),
        slug: slug.to_string(),
        title: format!("Title {slug}"),
        excerpt: "Short".to_string(),
        body_html: "<p>Body</p>".to_string(),
        source_url: Some("https://example.com/source".to_string()),
        category: "Science".to_string(),
        tags: vec!["space".to_string(), "news".to_string()],
        image_url: None,
        author: Author::ai(),
        status,
        publish_date: datetime!(2024-06-01 12:00 UTC).replace_day(day).expect("day"),
        featured: day == 1,
    }
}

fn record(id: &str, slug: &str, category: &str) -> PostRecord {
    let stamp = datetime!(2024-06-01 12:00 UTC);
    PostRecord {
        id: id.to_string(),
        slug: slug.to_string(),
        title: format!("Title {slug}"),
        excerpt: "Short".to_string(),
        body_html: "<p>Body</p>".to_string(),
        source_url: None,
        category: category.to_string(),
        tags: Vec::new(),
        image_url: None,
        author: Author::admin(),
        status: PostStatus::Published,
        publish_date: stamp,
        featured: false,
        created_at: stamp,
        updated_at: stamp,
    }
}

fn target(source: &InMemorySource) -> ImportTarget<'_> {
    ImportTarget {
        posts: source,
        posts_writer: source,
        categories: source,
        categories_writer: source,
    }
}

#[tokio::test]
async fn export_then_import_reproduces_the_collection() {
    let original = InMemorySource::with_default_categories();
    original
        .create_post(post("older", PostStatus::Published, 1))
        .await
        .expect("older");
    original
        .create_post(post("newer", PostStatus::Draft, 2))
        .await
        .expect("newer");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.toml");

    let archive = export_site(&original, &original, &path).await.expect("export");
    assert_eq!(archive.posts.len(), 2);
    assert_eq!(archive.posts[0].slug, "newer");
    assert!(path.exists());

    let restored = InMemorySource::new();
    let summary = import_site(&target(&restored), &path).await.expect("import");
    assert_eq!(
        summary,
        ImportSummary {
            categories_created: 6,
            categories_skipped: 0,
            posts_created: 2,
            posts_skipped: 0,
        }
    );

    let posts = restored
        .list_posts(&PostCriteria::default())
        .await
        .expect("posts");
    let slugs: Vec<_> = posts.iter().map(|post| post.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
    assert_eq!(posts[0].status, PostStatus::Draft);
    assert_eq!(posts[1].author, Author::ai());
    assert_eq!(posts[1].tags, vec!["space", "news"]);

    let categories = restored.list_categories().await.expect("categories");
    assert_eq!(categories.len(), 6);
}

#[tokio::test]
async fn importing_twice_skips_existing_records() {
    let original = InMemorySource::with_default_categories();
    original
        .create_post(post("only", PostStatus::Published, 3))
        .await
        .expect("only");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.toml");
    export_site(&original, &original, &path).await.expect("export");

    let summary = import_site(&target(&original), &path).await.expect("import");
    assert_eq!(summary.posts_created, 0);
    assert_eq!(summary.posts_skipped, 1);
    assert_eq!(summary.categories_skipped, 6);
    assert_eq!(original.len().await, 1);
}

#[tokio::test]
async fn missing_archive_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = InMemorySource::new();
    let result = import_site(&target(&source), &dir.path().join("absent.toml")).await;
    assert!(result.is_err());
    assert!(source.is_empty().await);
}

#[tokio::test]
async fn seeding_files_posts_under_canonical_category_names() {
    let archive = SiteArchive::new(
        Vec::new(),
        vec![record("a", "first", "technology"), record("b", "second", "Science")],
    );
    let source = InMemorySource::from_archive(archive).expect("seed");

    let posts = source
        .list_posts(&PostCriteria::default())
        .await
        .expect("posts");
    assert_eq!(posts.len(), 2);
    let first = posts.iter().find(|post| post.slug == "first").expect("first");
    assert_eq!(first.category, "Technology");
    assert_eq!(source.list_categories().await.expect("categories").len(), 6);
}

#[test]
fn seeding_rejects_repeated_ids_and_slugs() {
    let repeated_id = SiteArchive::new(
        Vec::new(),
        vec![record("a", "one", "Technology"), record("a", "two", "Technology")],
    );
    assert!(matches!(
        InMemorySource::from_archive(repeated_id),
        Err(AppError::Validation(message)) if message.contains("post id `a`")
    ));

    let repeated_slug = SiteArchive::new(
        Vec::new(),
        vec![record("a", "same", "Technology"), record("b", "same", "Technology")],
    );
    assert!(matches!(
        InMemorySource::from_archive(repeated_slug),
        Err(AppError::Validation(message)) if message.contains("slug `same`")
    ));
}

#[test]
fn seeding_rejects_unknown_categories() {
    let archive = SiteArchive::new(
        Vec::new(),
        vec![record("a", "stray", "Nonexistent")],
    );
    assert!(matches!(
        InMemorySource::from_archive(archive),
        Err(AppError::Validation(message)) if message.contains("`Nonexistent`")
    ));
}
