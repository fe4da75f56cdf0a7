use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newsdesk_api_types::{ErrorEnvelope, ErrorStatus, FieldError};

use crate::application::error::ErrorReport;

/// Error rendered as the JSON envelope `{status, message, errors?}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    errors: Option<Vec<FieldError>>,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
            detail: None,
        }
    }

    /// Diagnostic kept for the response log and never sent to the client.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(FieldError {
            field: Some(field.into()),
            message: message.into(),
        });
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").with_detail(detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.status.is_client_error() {
            ErrorStatus::Fail
        } else {
            ErrorStatus::Error
        };
        let report_message = match self.detail.as_deref() {
            Some(detail) => format!("{}: {detail}", self.message),
            None => self.message.clone(),
        };

        let body = ErrorEnvelope {
            status,
            message: self.message,
            errors: self.errors,
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message("infra::http::api", self.status, report_message)
            .attach(&mut response);
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "Invalid request body").with_detail(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn client_errors_render_fail_envelope() {
        let response = ApiError::bad_request("Invalid post")
            .with_field("title", "title is required")
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorReport>().is_some());

        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let envelope: ErrorEnvelope = serde_json::from_slice(&bytes).expect("envelope");
        assert_eq!(envelope.status, ErrorStatus::Fail);
        assert_eq!(envelope.message, "Invalid post");
        assert_eq!(
            envelope.errors,
            Some(vec![FieldError {
                field: Some("title".to_string()),
                message: "title is required".to_string(),
            }])
        );
    }

    #[test]
    fn server_errors_hide_detail() {
        let error = ApiError::internal("disk on fire");
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "Internal server error");
    }
}
