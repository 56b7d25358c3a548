//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. The error renders as the
//! failure half of the response envelope:
//!
//! ```json
//! { "success": false, "message": "Registration failed", "errors": { "username": ["..."] } }
//! ```
//!
//! Server errors never leak their cause to the client; it is logged instead.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    /// Field-level details, rendered under `errors`.
    pub errors: Option<Value>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            errors: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    /// A 400 carrying a field-keyed `errors` object.
    pub fn validation(message: impl Into<String>, errors: Value) -> Self {
        Self::bad_request(anyhow!(message.into())).with_errors(errors)
    }

    /// A 400 whose single detail is not tied to any field.
    pub fn non_field(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::validation(message, field_error(NON_FIELD_ERRORS, detail))
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// The top-level message a request body reports when it fails validation.
pub trait FailureMessage {
    const FAILURE_MESSAGE: &'static str = "Invalid data provided";
}

/// Builds `{ field: [message] }`.
pub fn field_error(field: &str, message: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert(field.to_string(), json!([message.into()]));
    Value::Object(map)
}

/// Merges two `{ field: [messages] }` objects, concatenating per-field lists.
pub fn merge_field_errors(mut base: Value, other: Value) -> Value {
    if let (Value::Object(base_map), Value::Object(other_map)) = (&mut base, other) {
        for (field, messages) in other_map {
            match (base_map.get_mut(&field), messages) {
                (Some(Value::Array(existing)), Value::Array(extra)) => existing.extend(extra),
                (_, messages) => {
                    base_map.insert(field, messages);
                }
            }
        }
    }
    base
}

/// Flattens `validator` output into `{ field: [messages] }`.
///
/// Nested struct and list errors are reported under their parent field.
pub fn validation_errors_to_json(errors: &ValidationErrors) -> Value {
    let mut map = Map::new();

    for (field, kind) in errors.errors() {
        let messages: Vec<Value> = match kind {
            ValidationErrorsKind::Field(field_errors) => field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .map(Value::String)
                .collect(),
            ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                vec![Value::String(format!("{} is invalid", field))]
            }
        };
        map.insert(field.to_string(), Value::Array(messages));
    }

    Value::Object(map)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "errors": self.errors.unwrap_or_else(|| json!({})),
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
        password: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validation_errors_use_message_or_fallback() {
        let sample = Sample {
            password: "short".to_string(),
            email: "nope".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let json = validation_errors_to_json(&errors);

        assert_eq!(
            json["password"][0],
            "Ensure this field has at least 8 characters."
        );
        assert_eq!(json["email"][0], "email is invalid");
    }

    #[test]
    fn test_non_field_error_shape() {
        let err = AppError::non_field("Login failed", "Invalid credentials");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Login failed");
        assert_eq!(
            err.errors.unwrap()[NON_FIELD_ERRORS][0],
            "Invalid credentials"
        );
    }

    #[test]
    fn test_merge_field_errors_concatenates() {
        let merged = merge_field_errors(
            field_error("username", "taken"),
            merge_field_errors(field_error("username", "too long"), field_error("email", "bad")),
        );
        assert_eq!(merged["username"], json!(["taken", "too long"]));
        assert_eq!(merged["email"], json!(["bad"]));
    }

    #[test]
    fn test_forbidden_status() {
        let err = AppError::forbidden("nope");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "nope");
    }

    #[test]
    fn test_server_error_hides_cause() {
        let response = AppError::internal_error("connection reset").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
