use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Standard success envelope: `{"success": true, "message"?, ...body}`.
///
/// The body's fields are flattened next to `success`, so a body
/// `{ lead }` renders as `{"success": true, "lead": {...}}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = NoBody> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

/// Body of a message-only response
#[derive(Debug, Default, Serialize)]
pub struct NoBody {}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(body: T) -> Self {
        Self {
            success: true,
            message: None,
            body,
        }
    }

    pub fn with_message(body: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            body,
        }
    }
}

impl ApiResponse<NoBody> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(NoBody::default(), message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Created response helper for POST endpoints
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Body {
        lead: &'static str,
    }

    #[test]
    fn test_body_is_flattened() {
        let json = serde_json::to_value(ApiResponse::success(Body { lead: "acme" })).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "lead": "acme"}));
    }

    #[test]
    fn test_message_only() {
        let json = serde_json::to_value(ApiResponse::message("Lead deleted successfully")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Lead deleted successfully"})
        );
    }

    #[test]
    fn test_created_status() {
        let response = Created(ApiResponse::success(Body { lead: "acme" })).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
