use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;
use water_app::{ApiError, AppError};

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ApiError,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>, code: Option<String>) -> Self {
        let body = ApiError {
            status: status.as_u16(),
            message: message.into(),
            code,
        };
        Self { status, body }
    }

    fn rejected(status: StatusCode, message: &str, code: &str) -> Self {
        Self::new(status, message, Some(code.to_string()))
    }

    pub fn invalid_origin(status: StatusCode, message: &str) -> Self {
        Self::rejected(status, message, "invalid_origin")
    }

    pub fn invalid_token() -> Self {
        Self::rejected(
            StatusCode::UNAUTHORIZED,
            "missing or invalid token",
            "token_invalid",
        )
    }

    pub fn not_found() -> Self {
        Self::rejected(StatusCode::NOT_FOUND, "not found", "not_found")
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        let api_error = ApiError::from(err);
        let status =
            StatusCode::from_u16(api_error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(status = status.as_u16(), message = %api_error.message, "request failed");
        }
        Self {
            status,
            body: api_error,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use water_app::StoreError;
    use water_db::DbError;

    #[test]
    fn storage_errors_keep_their_code() {
        let err = HttpError::from(AppError::from(StoreError::Read(DbError::LockPoisoned)));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body.code.as_deref(), Some("storage_unavailable"));
    }

    #[test]
    fn invalid_input_is_bad_request() {
        let err = HttpError::from(AppError::InvalidInput("nope".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, "nope");
    }
}
