//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn failures into consistent `{"success": false, ...}` JSON bodies and
//! status codes. Internal errors are logged in full and redacted before they
//! reach the client.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire shape of a failure response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always false for this type.
    pub success: bool,
    /// Stable machine-readable failure category.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Supplementary structured details, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation identifier for server-side logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for(err: &Error) -> ErrorBody {
    if matches!(err.code(), ErrorCode::InternalError) {
        error!(message = err.message(), "internal error redacted");
        ErrorBody {
            success: false,
            code: ErrorCode::InternalError,
            message: "Internal server error".to_owned(),
            details: None,
            trace_id: err.trace_id().map(str::to_owned),
        }
    } else {
        ErrorBody {
            success: false,
            code: err.code(),
            message: err.message().to_owned(),
            details: err.details().cloned(),
            trace_id: err.trace_id().map(str::to_owned),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header(("trace-id", id.to_owned()));
        }
        builder.json(body_for(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak framework details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no session"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("role denied"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("duplicate"), StatusCode::CONFLICT)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn client_errors_are_passed_through() {
        let error = Error::invalid_request("End date cannot be before start date")
            .with_details(serde_json::json!({ "field": "endDate" }));
        let body = serde_json::to_value(body_for(&error)).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "code": "invalid_request",
                "message": "End date cannot be before start date",
                "details": { "field": "endDate" },
            })
        );
    }

    #[test]
    fn internal_detail_is_redacted() {
        let error = Error::internal("connection refused to db:5432");
        let body = body_for(&error);
        assert_eq!(body.message, "Internal server error");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn response_echoes_trace_id_header() {
        let error = Error::not_found("Trip not found").with_trace_id("abc-123");
        let response = error.error_response();
        assert_eq!(
            response
                .headers()
                .get("trace-id")
                .and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }
}
