use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to HTTP clients. Each variant maps to one status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_not_found(id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("The user with ID: {} was not found.", id))
    }

    /// Logs the underlying cause and hides it from the client.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "{}", context);
        AppError::Internal(context.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_expected_status() {
        let cases = [
            (AppError::Validation("x".into()), 400),
            (AppError::Unauthorized("x".into()), 401),
            (AppError::Forbidden("x".into()), 403),
            (AppError::NotFound("x".into()), 404),
            (AppError::Conflict("x".into()), 409),
            (AppError::Internal("x".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status().as_u16(), code);
        }
    }

    #[tokio::test]
    async fn response_body_carries_message_and_status() {
        let res = AppError::user_not_found("abc").into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"]["status"], 404);
        assert_eq!(v["error"]["message"], "The user with ID: abc was not found.");
    }

    #[test]
    fn internal_hides_cause() {
        let err = AppError::internal("Error deleting user", "connection reset by peer");
        assert_eq!(err.to_string(), "Error deleting user");
    }
}
