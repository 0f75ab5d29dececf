use serde::Serialize;
use thiserror::Error;

/// Failures of the aggregate's backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    Read(#[source] water_db::DbError),
    #[error("storage write failed: {0}")]
    Write(#[source] water_db::DbError),
    #[error("stored aggregate is unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("aggregate could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Storage(#[from] StoreError),
    #[error("db error: {0}")]
    Db(#[from] water_db::DbError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err {
            AppError::InvalidInput(_) => (400, Some("invalid_input".to_string())),
            AppError::Storage(_) => (503, Some("storage_unavailable".to_string())),
            AppError::Db(_)
            | AppError::Io(_)
            | AppError::Serde(_)
            | AppError::Config(_)
            | AppError::Message(_) => (500, None),
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}
