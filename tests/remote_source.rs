mod common;

use std::sync::Arc;
use std::time::Duration;

use time::macros::datetime;
use tokio::net::TcpListener;
use url::Url;

use newsdesk::application::feed::{FeedQuery, FeedService};
use newsdesk::application::repos::{
    CategoriesRepo, CreatePostParams, PostPatch, PostsRepo, PostsWriteRepo, RepoError,
};
use newsdesk::application::site::{ImportTarget, export_site, import_site};
use newsdesk::domain::entities::Author;
use newsdesk::domain::posts::PostCriteria;
use newsdesk::domain::types::PostStatus;
use newsdesk::infra::memory::InMemorySource;
use newsdesk::infra::remote::RemoteSource;

use common::{TOKEN, app};

/// Serve the full router for `source` on an ephemeral port.
async fn serve(source: &InMemorySource) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let router = app(source, None);
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    Url::parse(&format!("http://{addr}/")).expect("url")
}

/// Serve the router under `/api`, the way a fronting proxy would mount it.
async fn serve_under_api(source: &InMemorySource) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let router = axum::Router::new().nest("/api", app(source, None));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    Url::parse(&format!("http://{addr}/api")).expect("url")
}

fn remote(base: Url, token: Option<&str>) -> RemoteSource {
    RemoteSource::new(base, token.map(str::to_string), Duration::from_secs(5)).expect("client")
}

fn params(slug: &str, status: PostStatus, day: u8) -> CreatePostParams {
    CreatePostParams {
        id: format!("id-{slug}"),
        slug: slug.to_string(),
        title: format!("Story {slug}"),
        excerpt: format!("About {slug}"),
        body_html: "<p>Body</p>".to_string(),
        source_url: None,
        category: "Technology".to_string(),
        tags: vec!["wire".to_string()],
        image_url: None,
        author: Author::admin(),
        status,
        publish_date: datetime!(2024-02-01 08:00 UTC).replace_day(day).expect("day"),
        featured: false,
    }
}

#[tokio::test]
async fn remote_reads_match_the_served_collection() {
    let backing = InMemorySource::with_default_categories();
    for day in 1..=3 {
        backing
            .create_post(params(&format!("story-{day}"), PostStatus::Published, day))
            .await
            .expect("seed");
    }
    backing
        .create_post(params("unfinished", PostStatus::Draft, 4))
        .await
        .expect("draft");

    let base = serve(&backing).await;

    let anonymous = remote(base.clone(), None);
    let visible = anonymous
        .list_posts(&PostCriteria::default())
        .await
        .expect("anonymous list");
    assert_eq!(visible.len(), 3);

    let editor = remote(base, Some(TOKEN));
    let everything = editor
        .list_posts(&PostCriteria::default())
        .await
        .expect("editor list");
    assert_eq!(everything.len(), 4);

    let found = editor
        .find_by_slug("story-2")
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found.title, "Story story-2");
    assert!(editor.find_by_id("missing").await.expect("lookup").is_none());

    let categories = editor.list_categories().await.expect("categories");
    assert_eq!(categories.len(), 6);
}

#[tokio::test]
async fn remote_base_may_carry_a_path_prefix() {
    let backing = InMemorySource::with_default_categories();
    backing
        .create_post(params("prefixed", PostStatus::Published, 1))
        .await
        .expect("seed");

    let editor = remote(serve_under_api(&backing).await, Some(TOKEN));
    assert_eq!(editor.list_categories().await.expect("categories").len(), 6);

    let posts = editor
        .list_posts(&PostCriteria::default())
        .await
        .expect("posts");
    assert_eq!(posts.len(), 1);

    editor.delete_post("id-prefixed").await.expect("delete");
    assert!(backing.is_empty().await);
}

#[tokio::test]
async fn feed_over_a_remote_source_filters_locally() {
    let backing = InMemorySource::with_default_categories();
    for day in 1..=4 {
        backing
            .create_post(params(&format!("story-{day}"), PostStatus::Published, day))
            .await
            .expect("seed");
    }
    let base = serve(&backing).await;

    let feed = FeedService::new(Arc::new(remote(base, None))).with_page_size(3);
    let page = feed
        .list(&FeedQuery::default(), 2)
        .await
        .expect("second page");
    assert_eq!(page.info.total_pages, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].slug, "story-1");

    let query = FeedQuery {
        search: Some("STORY-3".to_string()),
        ..FeedQuery::default()
    };
    let page = feed.list(&query, 1).await.expect("search");
    assert_eq!(page.info.total_items, 1);
}

#[tokio::test]
async fn remote_writes_require_credentials() {
    let backing = InMemorySource::with_default_categories();
    let base = serve(&backing).await;

    let anonymous = remote(base.clone(), None);
    let err = anonymous
        .create_post(params("rejected", PostStatus::Draft, 1))
        .await
        .expect_err("anonymous write");
    assert!(matches!(err, RepoError::Unauthorized));

    let editor = remote(base, Some(TOKEN));
    let created = editor
        .create_post(params("accepted", PostStatus::Draft, 1))
        .await
        .expect("create");
    assert_eq!(created.slug, "accepted");

    let updated = editor
        .update_post(
            &created.id,
            PostPatch {
                status: Some(PostStatus::Published),
                ..PostPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.status, PostStatus::Published);

    editor.delete_post(&created.id).await.expect("delete");
    let err = editor.delete_post(&created.id).await.expect_err("gone");
    assert!(matches!(err, RepoError::NotFound));
    assert!(backing.is_empty().await);
}

#[tokio::test]
async fn archives_move_between_local_and_remote_sources() {
    let local = InMemorySource::with_default_categories();
    local
        .create_post(params("first", PostStatus::Published, 1))
        .await
        .expect("first");
    local
        .create_post(params("second", PostStatus::Draft, 2))
        .await
        .expect("second");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("export.toml");
    export_site(&local, &local, &path).await.expect("export");

    let backing = InMemorySource::with_default_categories();
    let base = serve(&backing).await;
    let editor = remote(base, Some(TOKEN));

    let target = ImportTarget {
        posts: &editor,
        posts_writer: &editor,
        categories: &editor,
        categories_writer: &editor,
    };
    let summary = import_site(&target, &path).await.expect("import");
    assert_eq!(summary.posts_created, 2);
    assert_eq!(summary.categories_skipped, 6);
    assert_eq!(backing.len().await, 2);

    let second = backing
        .find_by_slug("second")
        .await
        .expect("lookup")
        .expect("imported");
    assert_eq!(second.status, PostStatus::Draft);
    assert_eq!(second.publish_date, datetime!(2024-02-02 08:00 UTC));
}
