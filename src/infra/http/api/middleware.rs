use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::auth::{AuthError, Principal};

use super::error::ApiError;
use super::state::ApiState;

/// Resolve an optional bearer token into a [`Principal`] request extension.
///
/// Requests without a token continue anonymously; a token that fails
/// verification ends the request with 401.
pub async fn authenticate(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers().get(header::AUTHORIZATION)) else {
        return next.run(request).await;
    };

    match state.verifier.verify(&token).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal.clone());
            let mut response = next.run(request).await;
            response.extensions_mut().insert(principal);
            response
        }
        Err(err) => auth_to_api(err).into_response(),
    }
}

pub(crate) fn auth_to_api(err: AuthError) -> ApiError {
    let message = match err {
        AuthError::Missing => "Authentication required",
        AuthError::Invalid => "Invalid token",
        AuthError::Expired => "Token expired",
    };
    ApiError::unauthorized(message).with_detail(err.to_string())
}

fn extract_token(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?.trim();
    (!bearer.is_empty()).then(|| bearer.to_string())
}

/// Authenticated caller; rejects anonymous requests with 401.
pub struct RequirePrincipal(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for RequirePrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(RequirePrincipal)
            .ok_or_else(|| auth_to_api(AuthError::Missing))
    }
}

/// Caller identity when a valid token was presented.
pub struct MaybePrincipal(pub Option<Principal>);

impl<S: Send + Sync> FromRequestParts<S> for MaybePrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybePrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_extracted() {
        let value = HeaderValue::from_static("Bearer abc123");
        assert_eq!(extract_token(Some(&value)).as_deref(), Some("abc123"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let value = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert_eq!(extract_token(Some(&value)), None);
        assert_eq!(extract_token(None), None);
    }

    #[test]
    fn blank_bearer_is_ignored() {
        let value = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_token(Some(&value)), None);
    }
}
