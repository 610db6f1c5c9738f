//! Tagged outcome of an API call, as list views consume it.

use serde_json::Value;

use backoffice_core::FieldErrors;

use crate::error::ApiError;

/// `Ok(data) | ValidationError(fields) | NotFound | TransportError(code)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok(T),
    /// 422 with the server's per-field messages.
    ValidationError(FieldErrors),
    /// 404.
    NotFound,
    /// Anything else, reduced to its machine-readable code.
    TransportError(String),
}

impl<T> From<Result<T, ApiError>> for ApiOutcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => ApiOutcome::Ok(value),
            Err(err) => match err.status() {
                Some(422) => {
                    ApiOutcome::ValidationError(err.body().map(field_errors_from_body).unwrap_or_default())
                }
                Some(404) => ApiOutcome::NotFound,
                _ => ApiOutcome::TransportError(err.code()),
            },
        }
    }
}

/// Extract the field error map from a 422 body.
///
/// Accepts `{ "errors": { field: [..] } }` or a bare `{ field: [..] }`; a
/// single string message counts as a one-element list. Anything else is dropped.
/// A top-level `message` in the bare form is the summary, not a field.
pub fn field_errors_from_body(body: &Value) -> FieldErrors {
    let (map, bare) = match body.get("errors").and_then(Value::as_object) {
        Some(errors) => (errors, false),
        None => match body.as_object() {
            Some(bare) => (bare, true),
            None => return FieldErrors::new(),
        },
    };

    map.iter()
        // a bare map may still carry the summary line
        .filter(|(field, _)| !(bare && field.as_str() == "message"))
        .filter_map(|(field, messages)| {
            let messages: Vec<String> = match messages {
                Value::String(single) => vec![single.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect(),
                _ => return None,
            };
            Some((field.clone(), messages))
        })
        .collect()
}
