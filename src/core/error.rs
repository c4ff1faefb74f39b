// Centralized error handling for the sweeper

use crate::utils::html;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Errors from the Deluge Web UI JSON client
#[derive(Error, Debug)]
pub enum DelugeError {
    #[error("request to Deluge Web UI failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deluge Web UI rejected the password")]
    AuthRejected,

    #[error("Deluge daemon error: {0}")]
    Daemon(String),

    #[error("unexpected response from Deluge Web UI: {0}")]
    UnexpectedResponse(String),
}

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = format!(
            "<!DOCTYPE html><html><body><p>{}</p><p><a href=\"/\">Back</a></p></body></html>",
            html::escape(&self.to_string())
        );

        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let response = ApiError::InvalidParameter("min_age_secs".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::InternalError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_deluge_error_display() {
        let err = DelugeError::Daemon("Unknown method".to_string());
        assert_eq!(err.to_string(), "Deluge daemon error: Unknown method");
    }
}
