/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - user payload の validation error / auth error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::ValidationError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub field: &'static str,
    pub rule: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error(transparent)]
    InvalidUserPayload(#[from] ValidationError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code, message, Vec::new())
            }
            AppError::InvalidUserPayload(err) => {
                let details = err
                    .violations()
                    .iter()
                    .map(|v| ErrorDetail {
                        field: v.field,
                        rule: v.rule.as_str(),
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_USER_PAYLOAD",
                    err.to_string(),
                    details,
                )
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
                Vec::new(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
                Vec::new(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    use crate::api::v1::extractors::{RawUserPayload, validate};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
        assert!(json["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn validation_error_lists_every_field() {
        let err = validate(RawUserPayload {
            uid: String::new(),
            email: None,
            id: None,
        })
        .unwrap_err();

        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_USER_PAYLOAD");
        assert_eq!(
            json["error"]["details"],
            serde_json::json!([
                {"field": "uid", "rule": "not_empty"},
                {"field": "email", "rule": "required"},
            ])
        );
    }

    #[tokio::test]
    async fn bad_request_keeps_code_and_message() {
        let response = AppError::bad_request("INVALID_FIELD", "bad field").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_FIELD");
        assert_eq!(json["error"]["message"], "bad field");
    }
}
