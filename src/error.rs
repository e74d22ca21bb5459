//! Error types and their HTTP response mapping.
//!
//! [`ApiError`] is what every route handler fails with. It renders the
//! `{"error": "..."}` envelope the dashboard expects and picks the status code:
//! 401 for a missing `Authorization` header, 400 for missing fields, the
//! upstream status for Discord failures, and 500 for everything unexpected.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::{models::ErrorResponse, services::DiscordClientError};

/// Client-facing message for unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable `Authorization` header on a proxied route.
    #[error("Authorization required")]
    Unauthorized,

    /// A required field is missing or the body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// Discord answered with a non-success status, which is forwarded as-is.
    #[error("{message} (upstream status {status})")]
    Upstream { status: u16, message: &'static str },

    /// The bot token submitted for validation was rejected by Discord.
    #[error("Invalid bot token")]
    InvalidToken,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Anything else. `detail` is logged; only `public_message` reaches the client.
    #[error("{public_message}: {detail}")]
    Internal {
        public_message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(detail: impl ToString) -> Self {
        ApiError::Internal {
            public_message: INTERNAL_ERROR_MESSAGE,
            detail: detail.to_string(),
        }
    }

    /// The message placed in the response envelope
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Upstream { message, .. } => (*message).to_string(),
            ApiError::Internal { public_message, .. } => (*public_message).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DiscordClientError> for ApiError {
    fn from(err: DiscordClientError) -> Self {
        match err {
            DiscordClientError::InvalidPathSegment(_) => ApiError::bad_request("Invalid identifier"),
            other => ApiError::internal(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal { detail, .. } = self {
            tracing::error!(error = %crate::telemetry::redact_sensitive_data(detail), "Request failed");
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}

/// Failures while assembling the application at startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to build Discord client: {0}")]
    DiscordClient(#[from] DiscordClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_forwarded() {
        let err = ApiError::Upstream {
            status: 403,
            message: "Failed to fetch channels",
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "Failed to fetch channels");
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::internal("connection reset by peer");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn fixed_statuses() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::bad_request("Guild ID required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::Unauthorized.public_message(), "Authorization required");
    }

    #[test]
    fn dot_segments_become_bad_requests() {
        let err: ApiError = DiscordClientError::InvalidPathSegment("..".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
