use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

use super::RequestId;

/// The response contract every dispatch path resolves to: a status code and
/// a structured body that always carries `message` and `request_id`.
/// Success paths add domain fields; failure paths add `error`.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<usize>,
    pub request_id: String,
}

impl ResponseBody {
    pub fn new(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self {
            message: message.into(),
            error: None,
            player: None,
            parent: None,
            team: None,
            status: None,
            message_sid: None,
            processed: None,
            errors: None,
            request_id: request_id.to_string(),
        }
    }
}

impl DispatchResult {
    pub fn ok(message: impl Into<String>, request_id: &RequestId) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::new(message, request_id),
        }
    }

    pub fn forbidden(request_id: &RequestId) -> Self {
        Self::from_error(
            "Forbidden: Invalid or missing API key",
            &DispatchError::Forbidden,
            request_id,
        )
    }

    pub fn not_found(request_id: &RequestId) -> Self {
        Self::from_error("Route not found", &DispatchError::RouteNotFound, request_id)
    }

    /// Convert a pipeline error into its response. `message` is the
    /// path-specific summary; the error text itself is only attached when
    /// the variant exposes detail.
    pub fn from_error(
        message: impl Into<String>,
        error: &DispatchError,
        request_id: &RequestId,
    ) -> Self {
        let mut body = ResponseBody::new(message, request_id);
        if error.exposes_detail() {
            body.error = Some(error.to_string());
        }
        Self {
            status_code: error.status_code(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

impl IntoResponse for DispatchResult {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_omits_error_field() {
        let request_id = RequestId::generate();
        let result = DispatchResult::ok("Webhook processed successfully", &request_id);

        let json = serde_json::to_string(&result.body).unwrap();
        assert!(result.is_success());
        assert!(!json.contains("\"error\""));
        assert!(json.contains(request_id.as_str()));
    }

    #[test]
    fn test_error_detail_attached_for_internal_failures() {
        let request_id = RequestId::generate();
        let parse_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let result = DispatchResult::from_error(
            "Error processing webhook",
            &DispatchError::PayloadParse(parse_err),
            &request_id,
        );

        assert_eq!(result.status_code, 500);
        assert!(result.body.error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[test]
    fn test_forbidden_is_generic() {
        let request_id = RequestId::generate();
        let result = DispatchResult::from_error(
            "Forbidden",
            &DispatchError::Forbidden,
            &request_id,
        );

        assert_eq!(result.status_code, 403);
        assert!(result.body.error.is_none());
    }
}
