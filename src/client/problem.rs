//! `ProblemDetail` (RFC 7807) error bodies mapped onto the `{ message, error,
//! fieldErrors }` shape the admin pages read. Mapping never fails: unparsable
//! bodies become an empty object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

pub const MESSAGE: &str = "message";
pub const ERROR: &str = "error";
pub const FIELD_ERRORS: &str = "fieldErrors";

const DETAIL: &str = "detail";
const TITLE: &str = "title";
const VIOLATIONS: &str = "violations";
const ERRORS: &str = "errors";
const PROPERTIES: &str = "properties";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Reads `{field|property, message|defaultMessage}`; `None` when the
    /// entry names no field.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = first_text(object, &["field", "property"])?;
        let message = first_text(object, &[MESSAGE, "defaultMessage"]).unwrap_or_default();
        Some(Self { field, message })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl NormalizedError {
    /// Typed view over an already normalized body.
    #[must_use]
    pub fn from_value(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::default();
        };

        Self {
            message: object.get(MESSAGE).map(text).unwrap_or_default(),
            error: object.get(ERROR).map(text).unwrap_or_default(),
            field_errors: object
                .get(FIELD_ERRORS)
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(FieldError::from_value).collect())
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.message.as_str())
    }
}

/// Parses an error body and normalizes it; invalid JSON yields `{}`.
#[must_use]
pub fn parse_error_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(body) => normalize(body),
        Err(err) => {
            warn!("error body is not valid JSON: {}", err);
            Value::Object(Map::new())
        }
    }
}

/// Adds `message`, `error` and `fieldErrors` to a `ProblemDetail` body, never
/// replacing a value the server already sent under those names.
#[must_use]
pub fn normalize(body: Value) -> Value {
    let mut object = match body {
        Value::Object(object) => object,
        Value::Null => return Value::Object(Map::new()),
        other => return other,
    };

    if is_blank(object.get(MESSAGE)) && !is_blank(object.get(DETAIL)) {
        if let Some(detail) = object.get(DETAIL).cloned() {
            object.insert(MESSAGE.to_string(), detail);
        }
    }

    if is_blank(object.get(ERROR)) && !is_blank(object.get(TITLE)) {
        if let Some(title) = object.get(TITLE).cloned() {
            object.insert(ERROR.to_string(), title);
        }
    }

    if is_blank(object.get(FIELD_ERRORS)) {
        if let Some(field_errors) = raw_field_errors(&object).and_then(field_error_list) {
            object.insert(FIELD_ERRORS.to_string(), field_errors);
        }
    }

    Value::Object(object)
}

/// First non-blank of `violations`, `properties.violations`,
/// `properties.errors`, `errors`.
fn raw_field_errors(object: &Map<String, Value>) -> Option<&Value> {
    let properties = object.get(PROPERTIES).and_then(Value::as_object);

    [
        object.get(VIOLATIONS),
        properties.and_then(|p| p.get(VIOLATIONS)),
        properties.and_then(|p| p.get(ERRORS)),
        object.get(ERRORS),
    ]
    .into_iter()
    .find(|candidate| !is_blank(*candidate))
    .flatten()
}

/// Maps become `[{field, message}]` in key order, arrays pass through.
fn field_error_list(raw: &Value) -> Option<Value> {
    match raw {
        Value::Object(map) => Some(Value::Array(
            map.iter()
                .map(|(field, message)| {
                    let mut entry = Map::new();
                    entry.insert("field".to_string(), Value::String(field.clone()));
                    entry.insert(MESSAGE.to_string(), message.clone());
                    Value::Object(entry)
                })
                .collect(),
        )),
        Value::Array(_) => Some(raw.clone()),
        _ => None,
    }
}

/// Missing, null, false, zero and empty strings count as absent.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::Array(_) | Value::Object(_)) => false,
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !is_blank(Some(value)))
        .map(text)
}

/// Display text for a JSON value; arrays of messages are joined.
fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn violations_map_becomes_field_errors() {
        let body = normalize(json!({ "violations": { "name": "required" } }));
        assert_eq!(
            body[FIELD_ERRORS],
            json!([{ "field": "name", "message": "required" }])
        );

        let typed = NormalizedError::from_value(&body);
        assert_eq!(typed.field_errors, vec![FieldError::new("name", "required")]);
        assert_eq!(typed.field_message("name"), Some("required"));
    }

    #[test]
    fn existing_message_is_not_overwritten() {
        let body = normalize(json!({
            "message": "keep me",
            "detail": "replacement",
            "title": "Bad Request"
        }));
        assert_eq!(body[MESSAGE], "keep me");
        assert_eq!(body[ERROR], "Bad Request");
        assert_eq!(body[DETAIL], "replacement");
    }

    #[test]
    fn detail_and_title_fill_missing_fields() {
        let body = normalize(json!({
            "type": "about:blank",
            "title": "Conflict",
            "status": 409,
            "detail": "Username already taken",
            "message": ""
        }));
        let typed = NormalizedError::from_value(&body);
        assert_eq!(typed.message, "Username already taken");
        assert_eq!(typed.error, "Conflict");
        assert!(typed.field_errors.is_empty());
        assert!(body.get(FIELD_ERRORS).is_none());
    }

    #[test]
    fn nested_properties_are_searched_in_order() {
        let body = normalize(json!({
            "properties": {
                "violations": [{ "field": "email", "message": "invalid" }],
                "errors": { "ignored": "because violations came first" }
            },
            "errors": { "also": "ignored" }
        }));
        assert_eq!(
            body[FIELD_ERRORS],
            json!([{ "field": "email", "message": "invalid" }])
        );

        let body = normalize(json!({
            "properties": { "errors": { "password": "too short" } }
        }));
        assert_eq!(
            NormalizedError::from_value(&body).field_errors,
            vec![FieldError::new("password", "too short")]
        );

        let body = normalize(json!({ "errors": { "code": "expired" } }));
        assert_eq!(
            NormalizedError::from_value(&body).field_message("code"),
            Some("expired")
        );
    }

    #[test]
    fn empty_violations_fall_through_to_errors() {
        let body = normalize(json!({ "violations": null, "errors": { "a": "b" } }));
        assert_eq!(body[FIELD_ERRORS], json!([{ "field": "a", "message": "b" }]));
    }

    #[test]
    fn existing_field_errors_are_kept() {
        let body = normalize(json!({
            "fieldErrors": [{ "field": "kept", "message": "yes" }],
            "violations": { "other": "no" }
        }));
        assert_eq!(body[FIELD_ERRORS], json!([{ "field": "kept", "message": "yes" }]));
    }

    #[test]
    fn spring_style_entries_use_aliases() {
        let body = normalize(json!({
            "errors": [
                { "property": "username", "defaultMessage": "must not be blank" },
                { "message": "no field, dropped" }
            ]
        }));
        let typed = NormalizedError::from_value(&body);
        assert_eq!(
            typed.field_errors,
            vec![FieldError::new("username", "must not be blank")]
        );
    }

    #[test]
    fn message_lists_are_joined() {
        let body = normalize(json!({ "violations": { "age": ["too low", "not a number"] } }));
        assert_eq!(
            NormalizedError::from_value(&body).field_message("age"),
            Some("too low; not a number")
        );
    }

    #[test]
    fn malformed_body_yields_empty_object() {
        assert_eq!(parse_error_body(b"<html>502 Bad Gateway</html>"), json!({}));
        assert_eq!(parse_error_body(b""), json!({}));
        assert_eq!(parse_error_body(b"null"), json!({}));
    }

    #[test]
    fn non_object_json_passes_through() {
        assert_eq!(parse_error_body(b"\"plain\""), json!("plain"));
        assert_eq!(NormalizedError::from_value(&json!("plain")), NormalizedError::default());
    }
}
