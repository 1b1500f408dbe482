use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response format for all API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Trait for errors that can be converted to HTTP responses
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Message returned to the caller. Never carries upstream detail.
    fn public_message(&self) -> String;

    /// Label used when the error is logged
    fn log_context(&self) -> &'static str {
        "API error"
    }
}

/// Convert any HttpError into an Axum response
///
/// Server-side failures are logged with their full source chain; the caller
/// only ever sees `public_message`.
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let context = err.log_context();

    if status.is_server_error() {
        tracing::error!(
            error = %error_chain(&err),
            status = %status,
            "{context}"
        );
    } else {
        tracing::warn!(error = %err, status = %status, "{context}");
    }

    (status, Json(ErrorResponse::new(err.public_message()))).into_response()
}

/// Render an error and all of its sources as `a: b: c`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Macro to implement IntoResponse for HttpError types
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("inner")]
    struct Inner;

    #[test]
    fn test_error_chain_joins_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "outer: inner");
    }

    #[test]
    fn test_error_response_serializes_error_only() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }
}
