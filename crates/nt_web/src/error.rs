use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use nt_auth::AuthError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Endpoint not found")]
    NotFound,

    #[error("Something went wrong!")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                match err {
                    AuthError::RateLimited {
                        retry_after_minutes,
                        retry_after_seconds,
                    } => {
                        let body = json!({
                            "error": err.message(),
                            "retryAfter": retry_after_minutes,
                        });
                        let mut response = (status, Json(body)).into_response();
                        response
                            .headers_mut()
                            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_seconds));
                        response
                    }
                    _ => (status, Json(json!({ "error": err.message() }))).into_response(),
                }
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" }))).into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                internal_error_response()
            }
        }
    }
}

pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Something went wrong!" })),
    )
        .into_response()
}
