use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the newsdesk binary.
#[derive(Debug, Parser)]
#[command(name = "newsdesk", version, about = "Newsdesk blog and news server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "NEWSDESK_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service backed by the in-memory source.
    Serve(Box<ServeArgs>),
    /// Export posts and categories of a remote instance to a TOML archive.
    #[command(name = "export")]
    ExportSite(ExportArgs),
    /// Import a TOML archive into a remote instance.
    #[command(name = "import")]
    ImportSite(ImportArgs),
    /// Search the published posts of a remote instance.
    Search(SearchArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// TOML archive loaded into the in-memory source at start-up.
    #[arg(long = "seed", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,

    /// Override the public listing page size.
    #[arg(long = "public-page-size", value_name = "COUNT")]
    pub public_page_size: Option<u64>,

    /// Override the admin listing page size.
    #[arg(long = "admin-page-size", value_name = "COUNT")]
    pub admin_page_size: Option<u64>,

    /// Override the draft generation endpoint.
    #[arg(long = "generation-endpoint", value_name = "URL")]
    pub generation_endpoint: Option<String>,

    /// Override the draft generation timeout.
    #[arg(long = "generation-timeout-seconds", value_name = "SECONDS")]
    pub generation_timeout_seconds: Option<u64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RemoteOverride {
    /// Base URL of the remote newsdesk instance.
    #[arg(long = "remote-url", value_name = "URL")]
    pub remote_url: Option<String>,

    /// Bearer token sent to the remote instance.
    #[arg(long = "remote-token", env = "NEWSDESK_REMOTE_TOKEN", value_name = "TOKEN")]
    pub remote_token: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub remote: RemoteOverride,

    /// Path to the export file to write.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    #[command(flatten)]
    pub remote: RemoteOverride,

    /// Path to the archive to import.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub remote: RemoteOverride,

    /// Restrict results to one category.
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Restrict results to posts carrying this tag.
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Result page to show.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Override the search debounce interval.
    #[arg(long = "debounce-ms", value_name = "MILLISECONDS")]
    pub debounce_ms: Option<u64>,

    /// Search text matched against titles and excerpts.
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}
