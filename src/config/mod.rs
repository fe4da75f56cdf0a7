//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    net::SocketAddr,
    num::NonZeroU32,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::auth::{Principal, TokenGrant};
use crate::domain::types::AuthorRole;

mod cli;

pub use cli::*;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "newsdesk";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_PUBLIC_PAGE_SIZE: u64 = 9;
const DEFAULT_ADMIN_PAGE_SIZE: u64 = 20;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub content: ContentSettings,
    pub remote: RemoteSettings,
    pub generation: GenerationSettings,
    pub search: SearchSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub seed_file: Option<PathBuf>,
    pub public_page_size: NonZeroU32,
    pub admin_page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: Option<Url>,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub endpoint: Option<Url>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub tokens: Vec<TokenGrant>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("NEWSDESK").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::ExportSite(args)) => raw.apply_remote_override(&args.remote),
        Some(Command::ImportSite(args)) => raw.apply_remote_override(&args.remote),
        Some(Command::Search(args)) => {
            raw.apply_remote_override(&args.remote);
            if let Some(debounce) = args.debounce_ms {
                raw.search.debounce_ms = Some(debounce);
            }
        }
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    content: RawContentSettings,
    remote: RawRemoteSettings,
    generation: RawGenerationSettings,
    search: RawSearchSettings,
    auth: RawAuthSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(seed) = overrides.seed.as_ref() {
            self.content.seed_file = Some(seed.clone());
        }
        if let Some(size) = overrides.public_page_size {
            self.content.public_page_size = Some(size);
        }
        if let Some(size) = overrides.admin_page_size {
            self.content.admin_page_size = Some(size);
        }
        if let Some(endpoint) = overrides.generation_endpoint.as_ref() {
            self.generation.endpoint = Some(endpoint.clone());
        }
        if let Some(seconds) = overrides.generation_timeout_seconds {
            self.generation.timeout_seconds = Some(seconds);
        }
    }

    fn apply_remote_override(&mut self, overrides: &RemoteOverride) {
        if let Some(url) = overrides.remote_url.as_ref() {
            self.remote.base_url = Some(url.clone());
        }
        if let Some(token) = overrides.remote_token.as_ref() {
            self.remote.token = Some(token.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            content,
            remote,
            generation,
            search,
            auth,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let content = build_content_settings(content)?;
        let remote = build_remote_settings(remote)?;
        let generation = build_generation_settings(generation)?;
        let search = build_search_settings(search)?;
        let auth = build_auth_settings(auth)?;

        Ok(Self {
            server,
            logging,
            content,
            remote,
            generation,
            search,
            auth,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let public_page_size = non_zero_u32(
        content.public_page_size.unwrap_or(DEFAULT_PUBLIC_PAGE_SIZE),
        "content.public_page_size",
    )?;
    let admin_page_size = non_zero_u32(
        content.admin_page_size.unwrap_or(DEFAULT_ADMIN_PAGE_SIZE),
        "content.admin_page_size",
    )?;

    Ok(ContentSettings {
        seed_file: content.seed_file,
        public_page_size,
        admin_page_size,
    })
}

fn build_remote_settings(remote: RawRemoteSettings) -> Result<RemoteSettings, LoadError> {
    let base_url = remote
        .base_url
        .as_deref()
        .and_then(non_blank)
        .map(|value| parse_http_url(value, "remote.base_url"))
        .transpose()?;

    let timeout_secs = remote.timeout_seconds.unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "remote.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(RemoteSettings {
        base_url,
        token: remote.token.as_deref().and_then(non_blank).map(str::to_string),
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_generation_settings(
    generation: RawGenerationSettings,
) -> Result<GenerationSettings, LoadError> {
    let endpoint = generation
        .endpoint
        .as_deref()
        .and_then(non_blank)
        .map(|value| parse_http_url(value, "generation.endpoint"))
        .transpose()?;

    let timeout_secs = generation
        .timeout_seconds
        .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "generation.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(GenerationSettings {
        endpoint,
        api_key: generation
            .api_key
            .as_deref()
            .and_then(non_blank)
            .map(str::to_string),
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let debounce_ms = search.debounce_ms.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS);
    Ok(SearchSettings {
        debounce: Duration::from_millis(debounce_ms),
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let tokens = auth
        .tokens
        .into_iter()
        .map(build_token_grant)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AuthSettings { tokens })
}

fn build_token_grant(raw: RawTokenGrant) -> Result<TokenGrant, LoadError> {
    let token = raw.token.trim().to_string();
    if token.is_empty() {
        return Err(LoadError::invalid("auth.tokens.token", "must not be empty"));
    }
    if raw.user_id.trim().is_empty() {
        return Err(LoadError::invalid("auth.tokens.user_id", "must not be empty"));
    }

    let role = match raw.role.as_deref().map(str::trim) {
        None | Some("") | Some("admin") => AuthorRole::Admin,
        Some("ai") => AuthorRole::Ai,
        Some(other) => {
            return Err(LoadError::invalid(
                "auth.tokens.role",
                format!("unknown role `{other}`"),
            ));
        }
    };

    let expires_at = raw
        .expires_at
        .as_deref()
        .map(|value| {
            OffsetDateTime::parse(value, &Rfc3339).map_err(|err| {
                LoadError::invalid("auth.tokens.expires_at", format!("failed to parse: {err}"))
            })
        })
        .transpose()?;

    let name = raw
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| raw.user_id.clone());

    Ok(TokenGrant {
        token,
        principal: Principal {
            id: raw.user_id,
            name,
            email: raw.email,
            role,
        },
        expires_at,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    seed_file: Option<PathBuf>,
    public_page_size: Option<u64>,
    admin_page_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRemoteSettings {
    base_url: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawGenerationSettings {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    tokens: Vec<RawTokenGrant>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTokenGrant {
    token: String,
    user_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn parse_http_url(value: &str, key: &'static str) -> Result<Url, LoadError> {
    let url = Url::parse(value)
        .map_err(|err| LoadError::invalid(key, format!("invalid url `{value}`: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(key, "url must use http or https"));
    }
    Ok(url)
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[cfg(test)]
mod tests;
