use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure an operator can see. `Display` is the human-readable message
/// that ends up in the console log.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Deletion(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("attempt to do non-function {0}")]
    UnknownOperation(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ConsoleError {
    /// Short machine-readable kind, used in JSON error bodies and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleError::Authentication(_) => "authentication_error",
            ConsoleError::Server(_) => "server_error",
            ConsoleError::Network(_) | ConsoleError::Transport(_) => "network_error",
            ConsoleError::Parse(_) => "parse_error",
            ConsoleError::Deletion(_) => "deletion_error",
            ConsoleError::InvalidInput(_) => "invalid_request_error",
            ConsoleError::UnknownOperation(_) => "unknown_operation",
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConsoleError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ConsoleError::Server(_) | ConsoleError::Deletion(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Network(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Transport(e) => {
                tracing::error!("Backend transport error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            ConsoleError::Parse(_) | ConsoleError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ConsoleError::UnknownOperation(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.kind(),
                "code": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}
