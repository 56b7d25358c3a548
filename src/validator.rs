use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, RawPathParams, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
};
use iqra_core::errors::{
    AppError, FailureMessage, NON_FIELD_ERRORS, field_error, validation_errors_to_json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

const REQUIRED: &str = "This field is required.";
const INVALID_DATA: &str = "Invalid data provided";

/// JSON body extractor that runs `validator` checks.
///
/// Both malformed bodies and failed checks become a 400 carrying
/// `T::FAILURE_MESSAGE` and a field-keyed `errors` object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FailureMessage,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(T::FAILURE_MESSAGE, rejection_errors(&rejection))
            })?;

        value.validate().map_err(|errors| {
            AppError::validation(T::FAILURE_MESSAGE, validation_errors_to_json(&errors))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Path extractor whose rejections use the standard failure envelope.
///
/// A segment that does not parse is reported against its route parameter
/// name, e.g. `{"id": ["\"x\" is not a valid value."]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidatedPath(value)),
            Err(rejection) => {
                let raw = RawPathParams::from_request_parts(parts, state)
                    .await
                    .ok()
                    .and_then(|params| {
                        params
                            .iter()
                            .next()
                            .map(|(key, value)| (key.to_string(), value.to_string()))
                    });
                Err(AppError::validation(
                    INVALID_DATA,
                    path_rejection_errors(&rejection, raw),
                ))
            }
        }
    }
}

fn path_rejection_errors(rejection: &PathRejection, raw: Option<(String, String)>) -> Value {
    let PathRejection::FailedToDeserializePathParams(error) = rejection else {
        return field_error(NON_FIELD_ERRORS, rejection.body_text());
    };

    match error.kind() {
        ErrorKind::ParseErrorAtKey { key, value, .. }
        | ErrorKind::DeserializeError { key, value, .. } => field_error(key, invalid_value(value)),
        ErrorKind::InvalidUtf8InPathParam { key } => field_error(key, "Invalid UTF-8."),
        _ => match raw {
            Some((key, value)) => field_error(&key, invalid_value(&value)),
            None => field_error(NON_FIELD_ERRORS, error.body_text()),
        },
    }
}

fn invalid_value(value: &str) -> String {
    format!("\"{}\" is not a valid value.", value)
}

/// Query-string extractor whose rejections use the standard failure envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(INVALID_DATA, deserialize_errors(&rejection.body_text()))
            })?;

        Ok(ValidatedQuery(value))
    }
}

fn rejection_errors(rejection: &JsonRejection) -> Value {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => field_error(
            NON_FIELD_ERRORS,
            "Missing 'Content-Type: application/json' header",
        ),
        JsonRejection::JsonDataError(_) => deserialize_errors(&rejection.body_text()),
        _ => field_error(NON_FIELD_ERRORS, "Invalid request body"),
    }
}

/// Maps a serde failure message onto the field it names.
///
/// axum reports data errors as
/// `Failed to deserialize the JSON body into the target type: <path>: <msg> at line L column C`,
/// with `<path>: ` omitted for errors raised at the root (such as a missing field).
/// Query strings use the prefix `Failed to deserialize query string: ` and carry no position.
fn deserialize_errors(text: &str) -> Value {
    if let Some(field) = text
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return field_error(field, REQUIRED);
    }

    let detail = text
        .split_once("target type: ")
        .or_else(|| text.split_once("query string: "))
        .map_or(text, |(_, rest)| rest);
    let detail = detail
        .rsplit_once(" at line ")
        .map_or(detail, |(head, _)| head);

    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(' ') => {
            field_error(path, message)
        }
        _ => field_error(NON_FIELD_ERRORS, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_required() {
        let errors = deserialize_errors(
            "Failed to deserialize the JSON body into the target type: missing field `email` at line 1 column 21",
        );
        assert_eq!(errors["email"][0], REQUIRED);
    }

    #[test]
    fn test_error_attached_to_path() {
        let errors = deserialize_errors(
            "Failed to deserialize the JSON body into the target type: user_type: unknown variant `principal`, expected one of `student`, `teacher`, `admin` at line 1 column 42",
        );
        let message = errors["user_type"][0].as_str().unwrap();
        assert!(message.starts_with("unknown variant `principal`"));
    }

    #[test]
    fn test_root_error_is_non_field() {
        let errors = deserialize_errors(
            "Failed to deserialize the JSON body into the target type: invalid type: string \"x\", expected struct LoginRequest at line 1 column 3",
        );
        assert!(errors.get(NON_FIELD_ERRORS).is_some());
    }

    #[test]
    fn test_query_error_attached_to_key() {
        let errors = deserialize_errors(
            "Failed to deserialize query string: user_type: unknown variant `principal`, expected one of `student`, `teacher`, `admin`",
        );
        let message = errors["user_type"][0].as_str().unwrap();
        assert!(message.starts_with("unknown variant `principal`"));
        assert!(errors.get(NON_FIELD_ERRORS).is_none());
    }

    #[test]
    fn test_invalid_value_message() {
        assert_eq!(invalid_value("abc"), "\"abc\" is not a valid value.");
    }
}
