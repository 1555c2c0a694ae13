use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::Storage(StorageError::NotFound),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Storage(StorageError::Duplicate)
            }
            _ => AppError::Storage(StorageError::Query(err.to_string())),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Client-facing messages stay human-readable for the 4xx taxonomy;
        // everything else is logged server-side and reported generically.
        let message = match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Storage(StorageError::NotFound) => "Record not found".to_string(),
            AppError::Storage(StorageError::Duplicate) => "Duplicate record".to_string(),
            _ => {
                error!("request failed: {}", self);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(status).json(json!({ "message": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::Duplicate) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid mailbox address: {0}")]
    InvalidMailbox(String),

    #[error("Message build error: {0}")]
    Message(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        AppError::Email(EmailError::InvalidMailbox(err.to_string()))
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Email(EmailError::Message(err.to_string()))
    }
}
