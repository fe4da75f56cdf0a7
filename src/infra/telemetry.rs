use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "newsdesk_posts_created_total",
            Unit::Count,
            "Total number of posts created."
        );
        describe_counter!(
            "newsdesk_posts_deleted_total",
            Unit::Count,
            "Total number of posts deleted."
        );
        describe_counter!(
            "newsdesk_generation_failures_total",
            Unit::Count,
            "Total number of failed or timed-out draft generations."
        );
        describe_counter!(
            "newsdesk_http_responses_total",
            Unit::Count,
            "Responses served by the REST surface, by method, status class and caller role."
        );
        describe_counter!(
            "newsdesk_remote_requests_total",
            Unit::Count,
            "Total number of requests sent to a remote post source."
        );
        describe_histogram!(
            "newsdesk_remote_request_ms",
            Unit::Milliseconds,
            "Remote post source request latency in milliseconds."
        );
    });
}
