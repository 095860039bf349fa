use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::db::RepoError;

/// Every failure a handler can return. Status codes are chosen here and
/// nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid username or password")]
    BadCredentials,

    /// No bearer token was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// A token was presented but did not verify.
    #[error("invalid or expired token")]
    Forbidden,

    #[error("no such endpoint")]
    NoRoute,

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Request could not be decoded by an extractor.
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{e:#}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Rejected(status, _) => *status,
            ApiError::Repo(repo) => match repo {
                RepoError::DuplicateUsername => StatusCode::CONFLICT,
                RepoError::UserNotFound | RepoError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
                RepoError::CategoryMissing => StatusCode::BAD_REQUEST,
                RepoError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Details stay in the log; clients get a generic message.
            error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn repo_errors_map_to_their_status_codes() {
        let cases = [
            (RepoError::DuplicateUsername, StatusCode::CONFLICT),
            (RepoError::UserNotFound, StatusCode::NOT_FOUND),
            (RepoError::NotFoundOrForbidden, StatusCode::NOT_FOUND),
            (RepoError::CategoryMissing, StatusCode::BAD_REQUEST),
            (RepoError::Storage(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, body) = body_of(ApiError::from(err)).await;
            assert_eq!(status, expected);
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn server_errors_do_not_leak_details() {
        let (status, body) =
            body_of(ApiError::Internal("connection refused to 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal server error");

        let (_, body) = body_of(RepoError::Storage(sqlx::Error::PoolTimedOut).into()).await;
        assert_eq!(body["message"], "internal server error");
    }

    #[tokio::test]
    async fn auth_failures_are_distinct() {
        assert_eq!(body_of(ApiError::Unauthenticated).await.0, StatusCode::UNAUTHORIZED);
        let (status, body) = body_of(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "invalid or expired token");
    }
}
