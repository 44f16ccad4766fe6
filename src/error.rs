use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Session expired or not signed in")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Message suitable for showing next to a form.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Backend { message, .. } => message.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Unauthorized => "Your session has expired, please sign in again".to_string(),
            AppError::NotFound => "Course not found".to_string(),
            AppError::Http(_) => "Could not reach the server".to_string(),
            _ => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Backend { status, message } => {
                error!("backend error {}: {}", status, message);
                (StatusCode::BAD_GATEWAY, "Backend error occurred".to_string())
            }
            AppError::Http(e) => {
                error!("http error: {}", e);
                (StatusCode::BAD_GATEWAY, "Backend unreachable".to_string())
            }
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Template(e) => {
                error!("template error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            e @ (AppError::Migration(_) | AppError::Config(_)) => {
                error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
