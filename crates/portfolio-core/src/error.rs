use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the JSON failure body shared by all services:
/// `{ "success": false, "kind": ..., "message": ... }`.
///
/// The admin UI shows `message` verbatim; `kind` is the stable
/// machine-readable tag.
pub fn error_response(status: StatusCode, kind: &'static str, message: String) -> Response {
    let body = serde_json::json!({
        "success": false,
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Log a server-side failure with its full cause chain.
///
/// 4xx are expected client errors and are left to the trace layer.
pub fn log_server_error(kind: &'static str, error: &dyn std::fmt::Display) {
    tracing::error!(error = %error, kind, "request failed");
}
