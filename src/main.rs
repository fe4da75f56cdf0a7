use std::{future::IntoFuture, process, sync::Arc};

use newsdesk::{
    application::{
        admin::{AdminCategoryService, AdminDashboardService, AdminPostService},
        auth::{StaticTokenVerifier, TokenVerifier},
        error::AppError,
        feed::FeedService,
        generation::{ContentGenerator, GenerationService},
        live_search::{LiveSearch, SearchSnapshot, SearchState},
        pagination::page_links,
        repos::{CategoriesRepo, CategoriesWriteRepo, PostsRepo, PostsWriteRepo},
        site::{self, ImportTarget},
    },
    config,
    domain::posts::PostCriteria,
    infra::{
        error::InfraError,
        generator::HttpContentGenerator,
        http::{self, ApiState},
        memory::InMemorySource,
        remote::RemoteSource,
        telemetry,
    },
};
use newsdesk_api_types::{PostCard, PostCardListResponse};
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::ExportSite(args) => run_export_site(settings, args).await,
        config::Command::ImportSite(args) => run_import_site(settings, args).await,
        config::Command::Search(args) => run_search(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let source = match settings.content.seed_file.as_deref() {
        Some(path) => {
            info!(
                target = "newsdesk::serve",
                path = %path.display(),
                "Seeding in-memory source"
            );
            InMemorySource::from_archive(site::read_archive(path).await?)?
        }
        None => InMemorySource::with_default_categories(),
    };

    let state = build_api_state(Arc::new(source), &settings)?;
    serve_http(&settings, state).await
}

fn build_api_state(
    source: Arc<InMemorySource>,
    settings: &config::Settings,
) -> Result<ApiState, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = source.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = source.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = source.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = source;

    let generator = match settings.generation.endpoint.clone() {
        Some(endpoint) => {
            let client = HttpContentGenerator::new(
                endpoint,
                settings.generation.api_key.clone(),
                settings.generation.timeout.saturating_mul(2),
            )
            .map_err(AppError::from)?;
            Some(Arc::new(client) as Arc<dyn ContentGenerator>)
        }
        None => {
            info!(
                target = "newsdesk::serve",
                "No generation endpoint configured; drafting endpoints answer 503"
            );
            None
        }
    };

    let verifier = StaticTokenVerifier::new(settings.auth.tokens.clone());
    if verifier.is_empty() {
        warn!(
            target = "newsdesk::serve",
            "No auth tokens configured; write and admin endpoints reject every request"
        );
    }
    let verifier: Arc<dyn TokenVerifier> = Arc::new(verifier);

    let feed = FeedService::new(posts_repo.clone())
        .with_page_size(settings.content.public_page_size.get() as usize);
    let posts = AdminPostService::new(
        posts_repo.clone(),
        posts_write_repo,
        categories_repo.clone(),
    )
    .with_page_size(settings.content.admin_page_size.get() as usize);
    let categories = AdminCategoryService::new(
        categories_repo.clone(),
        categories_write_repo,
        posts_repo.clone(),
    );
    let dashboard = AdminDashboardService::new(posts_repo, categories_repo.clone());
    let generation =
        GenerationService::new(generator, categories_repo, settings.generation.timeout);

    Ok(ApiState {
        feed: Arc::new(feed),
        posts: Arc::new(posts),
        categories: Arc::new(categories),
        dashboard: Arc::new(dashboard),
        generation: Arc::new(generation),
        verifier,
    })
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "newsdesk::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let (draining_tx, mut draining_rx) = watch::channel(false);
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = draining_tx.send(true);
        })
        .into_future();

    // In-flight requests get `graceful_shutdown` to finish once a signal arrives.
    let grace = settings.server.graceful_shutdown;
    let deadline = async move {
        if draining_rx.wait_for(|draining| *draining).await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = deadline => {
            warn!(
                target = "newsdesk::serve",
                grace_secs = grace.as_secs(),
                "Graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "newsdesk::serve", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "newsdesk::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "newsdesk::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!(target = "newsdesk::serve", "Shutdown signal received");
}

fn remote_source(settings: &config::Settings) -> Result<RemoteSource, AppError> {
    let base = settings.remote.base_url.clone().ok_or_else(|| {
        AppError::from(InfraError::configuration(
            "remote url is not configured (use --remote-url or NEWSDESK__REMOTE__BASE_URL)",
        ))
    })?;
    RemoteSource::new(base, settings.remote.token.clone(), settings.remote.timeout)
        .map_err(AppError::from)
}

async fn run_export_site(
    settings: config::Settings,
    args: config::ExportArgs,
) -> Result<(), AppError> {
    let remote = remote_source(&settings)?;
    let path = args.file;

    info!(
        target = "newsdesk::export",
        path = %path.display(),
        remote = %remote.base_url(),
        "Starting export"
    );

    site::export_site(&remote, &remote, &path).await?;
    info!(target = "newsdesk::export", "Export completed");
    Ok(())
}

async fn run_import_site(
    settings: config::Settings,
    args: config::ImportArgs,
) -> Result<(), AppError> {
    let remote = remote_source(&settings)?;
    let path = args.file;

    info!(
        target = "newsdesk::import",
        path = %path.display(),
        remote = %remote.base_url(),
        "Starting import"
    );

    let target = ImportTarget {
        posts: &remote,
        posts_writer: &remote,
        categories: &remote,
        categories_writer: &remote,
    };
    site::import_site(&target, &path).await?;
    info!(target = "newsdesk::import", "Import completed");
    Ok(())
}

async fn run_search(settings: config::Settings, args: config::SearchArgs) -> Result<(), AppError> {
    let remote: Arc<dyn PostsRepo> = Arc::new(remote_source(&settings)?);
    let feed =
        FeedService::new(remote).with_page_size(settings.content.public_page_size.get() as usize);

    let text = args.text.join(" ");
    let criteria = PostCriteria {
        search: (!text.trim().is_empty()).then_some(text),
        category: args.category,
        tag: args.tag,
        ..PostCriteria::published()
    };

    let search = LiveSearch::spawn(feed, criteria, settings.search.debounce);
    let mut updates = search.subscribe();
    let mut snapshot = settled(&mut updates, 1).await?;

    let target_page = args.page.max(1);
    if target_page > 1 {
        search
            .go_to(target_page)
            .map_err(|err| AppError::validation(err.to_string()))?;
        snapshot = settled(&mut updates, target_page).await?;
    }

    let Some(page) = snapshot.page else {
        return Err(AppError::unexpected("search finished without results"));
    };
    let response = PostCardListResponse {
        page_links: page_links(&page.info).into_iter().map(Into::into).collect(),
        posts: page.items.into_iter().map(PostCard::from).collect(),
        pagination: page.info.into(),
    };
    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|err| AppError::unexpected(format!("failed to render results: {err}")))?;
    println!("{rendered}");
    Ok(())
}

/// Wait until the search task has published `page` or reported a failure.
async fn settled(
    updates: &mut watch::Receiver<SearchSnapshot>,
    page: usize,
) -> Result<SearchSnapshot, AppError> {
    let snapshot = updates
        .wait_for(|snapshot| match &snapshot.state {
            SearchState::Ready => snapshot
                .info()
                .is_some_and(|info| info.current_page == page),
            SearchState::Failed { .. } => true,
            SearchState::Idle | SearchState::Loading => false,
        })
        .await
        .map_err(|_| AppError::unexpected("search task stopped"))?
        .clone();

    match snapshot.state {
        SearchState::Failed { message, .. } => {
            Err(AppError::unexpected(format!("search failed: {message}")))
        }
        _ => Ok(snapshot),
    }
}
