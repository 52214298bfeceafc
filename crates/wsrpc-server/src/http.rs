//! HTTP error helper for failures before the websocket upgrade.
//!
//! The body has the same shape as a websocket error response, with empty
//! `id`/`command`:
//! `{"id":"","command":"","ok":false,"error":"..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use wsrpc_core::protocol::{self, CommandMeta};

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = protocol::Response::<()>::err(CommandMeta::default(), self.message);
        (self.status, Json(body)).into_response()
    }
}

/// Build an error response with the given status.
pub fn write_http_error(status: StatusCode, message: impl Into<String>) -> Response {
    HttpError::new(status, message).into_response()
}
