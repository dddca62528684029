//! Response helpers shared by every controller.
//!
//! Errors go out as plain text `"<code> - <message>"`, mutation successes as a
//! plain message with 200, and data as JSON.

use std::fmt::Display;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error, warn};

/// An error already logged and ready to be sent to the client.
#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = format!("{} - {}", self.status.as_u16(), self.message);
        (self.status, body).into_response()
    }
}

/// Log a failure that is not shown to the client verbatim.
pub fn handle_internal_error(message: &str, err: &dyn Display) {
    error!(error = %err, "Error occurred: {}", message);
}

/// Log and build the error response the client receives.
pub fn handle_web_error(status: StatusCode, message: impl Into<String>) -> WebError {
    let message = message.into();
    warn!(status = status.as_u16(), %message, "sent error message to the client");
    WebError { status, message }
}

pub fn send_success(message: &str) -> Response {
    (StatusCode::OK, message.to_string()).into_response()
}

pub fn send_data<T: Serialize + ?Sized>(data: &T) -> Result<Response, WebError> {
    let body = serde_json::to_vec(data).map_err(|e| {
        handle_internal_error("Couldn't marshal data to JSON", &e);
        handle_web_error(StatusCode::INTERNAL_SERVER_ERROR, "Couldn't marshal data to JSON")
    })?;
    debug!(bytes = body.len(), "sending data to the client");
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
