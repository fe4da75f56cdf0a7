//! Search-as-you-type over a possibly remote post source.
//!
//! Input arrives on a `watch` channel and is debounced; a newer input drops
//! the in-flight query. Results are published on a second `watch` channel.
//! A failed query keeps the last good results and only flags the failure.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::feed::{FeedError, FeedQuery, FeedService};
use crate::application::listing::{ListingError, ListingState};
use crate::application::pagination::{Page, PaginationInfo};
use crate::domain::posts::PostCriteria;
use crate::presentation::views::PostCardView;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Loading,
    Ready,
    Failed { message: String, transient: bool },
}

/// `criteria` is the latest requested query; `page` and `page_criteria`
/// belong to the last query that succeeded, which may be an older one.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub criteria: PostCriteria,
    pub page: Option<Page<PostCardView>>,
    pub page_criteria: Option<PostCriteria>,
    pub state: SearchState,
}

impl SearchSnapshot {
    pub fn info(&self) -> Option<PaginationInfo> {
        self.page.as_ref().map(|page| page.info)
    }
}

pub struct LiveSearch {
    input: watch::Sender<ListingState>,
    output: watch::Receiver<SearchSnapshot>,
    task: JoinHandle<()>,
}

impl LiveSearch {
    /// Start the search task with an initial query for `criteria`.
    pub fn spawn(feed: FeedService, criteria: PostCriteria, debounce: Duration) -> Self {
        let listing = ListingState::new(criteria.clone(), feed.page_size());
        let (input, input_rx) = watch::channel(listing);
        let (output_tx, output) = watch::channel(SearchSnapshot {
            criteria,
            page: None,
            page_criteria: None,
            state: SearchState::Idle,
        });

        let task = tokio::spawn(run(feed, debounce, input_rx, output_tx));
        Self {
            input,
            output,
            task,
        }
    }

    /// Replace the criteria; the page returns to one when they change.
    pub fn submit(&self, criteria: PostCriteria) {
        self.input.send_if_modified(|listing| {
            let before = listing.clone();
            listing.set_criteria(criteria);
            *listing != before
        });
    }

    pub fn search(&self, text: impl Into<String>) {
        let mut criteria = self.input.borrow().criteria().clone();
        criteria.search = Some(text.into());
        self.submit(criteria);
    }

    /// Navigate within the last published result set.
    pub fn go_to(&self, page: usize) -> Result<(), ListingError> {
        let info = self.output.borrow().info().unwrap_or(PaginationInfo {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page: 1,
        });

        let mut outcome = Ok(());
        self.input.send_if_modified(|listing| {
            let before = listing.page();
            outcome = listing.go_to(page, &info);
            outcome.is_ok() && listing.page() != before
        });
        outcome
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.output.clone()
    }
}

impl Drop for LiveSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    feed: FeedService,
    debounce: Duration,
    mut input: watch::Receiver<ListingState>,
    output: watch::Sender<SearchSnapshot>,
) {
    // The initial criteria count as pending input.
    let mut pending = true;

    loop {
        if !pending && input.changed().await.is_err() {
            return;
        }
        pending = false;

        loop {
            match tokio::time::timeout(debounce, input.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        let listing = input.borrow_and_update().clone();
        output.send_modify(|snapshot| {
            snapshot.criteria = listing.criteria().clone();
            snapshot.state = SearchState::Loading;
        });

        let query = feed_query(listing.criteria());
        tokio::select! {
            result = feed.list(&query, listing.page()) => {
                publish(&output, listing.criteria(), result)
            }
            changed = input.changed() => {
                if changed.is_err() {
                    return;
                }
                debug!(
                    target = "newsdesk::application::live_search",
                    "in-flight search superseded"
                );
                pending = true;
            }
        }
    }
}

fn publish(
    output: &watch::Sender<SearchSnapshot>,
    criteria: &PostCriteria,
    result: Result<Page<PostCardView>, FeedError>,
) {
    match result {
        Ok(page) => output.send_modify(|snapshot| {
            snapshot.page = Some(page);
            snapshot.page_criteria = Some(criteria.clone());
            snapshot.state = SearchState::Ready;
        }),
        Err(err) => {
            let transient = matches!(&err, FeedError::Repo(repo) if repo.is_transient());
            warn!(
                target = "newsdesk::application::live_search",
                error = %err,
                transient,
                "search failed; keeping previous results"
            );
            output.send_modify(|snapshot| {
                snapshot.state = SearchState::Failed {
                    message: err.to_string(),
                    transient,
                };
            });
        }
    }
}

fn feed_query(criteria: &PostCriteria) -> FeedQuery {
    FeedQuery {
        search: criteria.search.clone(),
        category: criteria.category.clone(),
        tag: criteria.tag.clone(),
    }
}
