use std::time::Instant;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::{auth::Principal, error::ErrorReport};

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Who made a request, as far as the auth layer could tell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Caller {
    id: String,
    role: &'static str,
}

impl Caller {
    fn of(response: &Response) -> Self {
        match response.extensions().get::<Principal>() {
            Some(principal) => Self {
                id: principal.id.clone(),
                role: principal.role.as_str(),
            },
            None => Self {
                id: "anonymous".to_string(),
                role: "none",
            },
        }
    }
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Count every response per method and caller role; record who changed the
/// collection; log failures with the [`ErrorReport`] the handler attached.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();
    let caller = Caller::of(&response);
    let elapsed_ms = start.elapsed().as_millis() as u64;

    counter!(
        "newsdesk_http_responses_total",
        "method" => method.to_string(),
        "class" => status_class(status),
        "role" => caller.role
    )
    .increment(1);

    if status.is_success() {
        if method != Method::GET && method != Method::HEAD {
            debug!(
                target = "newsdesk::http::audit",
                method = %method,
                path = %uri.path(),
                status = status.as_u16(),
                caller = %caller.id,
                role = caller.role,
                request_id = %request_id,
                "collection changed"
            );
        }
        return response;
    }

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = messages
        .first()
        .cloned()
        .unwrap_or_else(|| "no diagnostic available".to_string());

    if status.is_server_error() {
        error!(
            target = "newsdesk::http::response",
            status = status.as_u16(),
            method = %method,
            path = %uri.path(),
            elapsed_ms,
            source,
            detail = %detail,
            chain = ?messages,
            request_id = %request_id,
            caller = %caller.id,
            role = caller.role,
            "request failed",
        );
    } else {
        warn!(
            target = "newsdesk::http::response",
            status = status.as_u16(),
            method = %method,
            path = %uri.path(),
            elapsed_ms,
            source,
            detail = %detail,
            request_id = %request_id,
            caller = %caller.id,
            role = caller.role,
            "request rejected",
        );
    }

    response
}
