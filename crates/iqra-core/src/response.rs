//! The uniform success envelope for listing and admin resource endpoints.
//!
//! ```json
//! {
//!   "status": "success",
//!   "message": "Operation successful",
//!   "data": { ... },
//!   "errors": [],
//!   "meta": { "total": 42, "page": 1, ... }
//! }
//! ```
//!
//! `status` is derived from the HTTP code: anything at or above 400 is
//! `"error"`. Absent `data` and `meta` render as `{}`, absent `errors` as `[]`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::AppError;

pub const DEFAULT_MESSAGE: &str = "Operation successful";

#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status_code: StatusCode,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<Value>,
    pub meta: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    pub fn with_status(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code,
            message: DEFAULT_MESSAGE.to_string(),
            data: Some(data),
            errors: None,
            meta: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn meta<M: Serialize>(mut self, meta: M) -> Self {
        self.meta = serde_json::to_value(meta).ok();
        self
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let status = if self.status_code.as_u16() < 400 {
            "success"
        } else {
            "error"
        };

        let data = match &self.data {
            Some(data) => serde_json::to_value(data)?,
            None => json!({}),
        };

        Ok(json!({
            "status": status,
            "message": self.message,
            "data": data,
            "errors": self.errors.clone().unwrap_or_else(|| json!([])),
            "meta": self.meta.clone().unwrap_or_else(|| json!({})),
        }))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.to_json() {
            Ok(body) => (self.status_code, Json(body)).into_response(),
            Err(e) => AppError::internal(e).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let body = ApiResponse::ok(json!({"id": 1})).to_json().unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], DEFAULT_MESSAGE);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["errors"], json!([]));
        assert_eq!(body["meta"], json!({}));
    }

    #[test]
    fn test_status_follows_http_code() {
        let body = ApiResponse::with_status(StatusCode::CONFLICT, json!(null))
            .to_json()
            .unwrap();
        assert_eq!(body["status"], "error");
    }

    #[test]
    fn test_meta_and_message() {
        let body = ApiResponse::created(vec![1, 2])
            .message("Created")
            .meta(json!({"total": 2}))
            .to_json()
            .unwrap();
        assert_eq!(body["message"], "Created");
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"], json!([1, 2]));
    }
}
