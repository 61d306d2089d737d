//! Uniform response envelope.
//!
//! Every business endpoint answers with the same JSON shape:
//! `{"status": "success" | "error", "message": ..., "data": ...}`,
//! with the HTTP status code carrying the error class.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use coffeetech_shared::AppError;

/// Builds a success envelope with payload data.
pub fn success_response<T: Serialize>(message: &str, data: &T) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}

/// Builds a success envelope without payload data.
pub fn success_message(message: &str) -> Response {
    success_response(message, &json!({}))
}

/// Builds an error envelope with the given HTTP status.
pub fn error_response(message: &str, status: StatusCode) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message,
            "data": {},
        })),
    )
        .into_response()
}

/// The canonical 401 answer for a rejected session token.
pub fn invalid_token_response() -> Response {
    error_response("Invalid session token", StatusCode::UNAUTHORIZED)
}

/// Renders an `AppError` through the envelope.
pub fn app_error_response(error: &AppError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(&error.to_string(), status)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    use coffeetech_shared::AppError;

    use super::{app_error_response, error_response, invalid_token_response, success_response};

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[tokio::test]
    async fn test_success_envelope_shape() {
        let response = success_response("Transaction created successfully", &json!({"id": 1}));
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Transaction created successfully");
        assert_eq!(body["data"]["id"], 1);
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = error_response("The specified plot does not exist", StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "The specified plot does not exist");
        assert_eq!(body["data"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_token_is_401() {
        let response = invalid_token_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid session token");
    }

    #[tokio::test]
    async fn test_app_error_maps_status() {
        let response =
            app_error_response(&AppError::Forbidden("No permission".to_string()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "No permission");
    }
}
