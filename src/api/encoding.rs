//
//  build-center-cli
//  api/encoding.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Wire Encoding
//!
//! Structural conversion between typed values and the JSON mappings sent to
//! and received from the Build Center API.
//!
//! The wire uses camelCase field names while every Rust type in this crate
//! uses snake_case, so conversion happens here once rather than per resource:
//!
//! - **Encode**: serialize with serde (enums collapse to their primitive value,
//!   sequences keep their order), drop fields starting with
//!   [`PRIVATE_FIELD_PREFIX`], then camelize every key.
//! - **Decode**: keys arrive already snake_cased by the transport; serde
//!   builds the typed value and coerces strings into enums.
//!
//! ```rust
//! use build_center_cli::api::encoding::{to_camel_case, to_snake_case};
//!
//! assert_eq!(to_camel_case("content_hash_algorithm"), "contentHashAlgorithm");
//! assert_eq!(to_snake_case("createdAt"), "created_at");
//! ```

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::common::ApiError;

/// Field names starting with this marker never reach the wire.
pub const PRIVATE_FIELD_PREFIX: char = '_';

/// Converts an internal snake_case name to the wire's camelCase.
pub fn to_camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Converts a wire camelCase name to the internal snake_case.
pub fn to_snake_case(name: &str) -> String {
    name.to_snake_case()
}

/// Recursively rewrites every object key from snake_case to camelCase.
pub fn camelize_keys(value: Value) -> Value {
    map_keys(value, &to_camel_case)
}

/// Recursively rewrites every object key from camelCase to snake_case.
pub fn decamelize_keys(value: Value) -> Value {
    map_keys(value, &to_snake_case)
}

fn map_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (convert(&key), map_keys(value, convert)))
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| map_keys(v, convert)).collect())
        }
        other => other,
    }
}

/// Recursively removes object members whose name starts with [`PRIVATE_FIELD_PREFIX`].
pub fn strip_private_fields(value: Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter(|(key, _)| !key.starts_with(PRIVATE_FIELD_PREFIX))
                .map(|(key, value)| (key, strip_private_fields(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_private_fields).collect()),
        other => other,
    }
}

/// Encodes a typed value into a wire-ready mapping.
///
/// # Errors
///
/// Returns [`ApiError::MalformedResponse`] if serde cannot represent the value
/// as JSON (for instance a map with non-string keys).
pub fn to_wire<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    let value = serde_json::to_value(value)
        .map_err(|e| ApiError::MalformedResponse(format!("cannot encode value: {e}")))?;
    Ok(camelize_keys(strip_private_fields(value)))
}

/// Encodes a typed value for display: wire conventions, 2-space indented JSON.
///
/// Slices and vectors render as JSON arrays with their order preserved.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    let wire = to_wire(value)?;
    serde_json::to_string_pretty(&wire)
        .map_err(|e| ApiError::MalformedResponse(format!("cannot format value: {e}")))
}

/// Decodes a snake_case mapping into a typed value.
///
/// Unknown fields are ignored and missing optional fields default to `None`.
///
/// # Errors
///
/// Returns [`ApiError::MalformedResponse`] when a required field is missing or
/// a field has the wrong type.
pub fn from_wire<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::MalformedResponse(format!(
            "cannot decode {}: {e}",
            std::any::type_name::<T>()
        ))
    })
}

/// Re-indents raw JSON text the way [`encode`] formats output.
pub fn reformat(raw: &str) -> Result<String, ApiError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ApiError::MalformedResponse(format!("invalid JSON: {e}")))?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| ApiError::MalformedResponse(format!("cannot format value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum Color {
        DeepRed,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        display_name: String,
        created_at: Option<i64>,
        colors: Vec<Color>,
        #[serde(rename = "_cache", default)]
        cache: Option<String>,
    }

    #[test]
    fn test_case_round_trip() {
        for name in ["created_at", "content_hash_algorithm", "app_id", "validity_duration"] {
            assert_eq!(to_snake_case(&to_camel_case(name)), name);
        }
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_snake_case("name"), "name");
    }

    #[test]
    fn test_to_wire_camelizes_and_projects_enums() {
        let sample = Sample {
            display_name: "App".into(),
            created_at: Some(42),
            colors: vec![Color::DeepRed, Color::DeepRed],
            cache: Some("secret".into()),
        };

        let wire = to_wire(&sample).unwrap();
        assert_eq!(
            wire,
            json!({
                "displayName": "App",
                "createdAt": 42,
                "colors": ["deep_red", "deep_red"],
            })
        );
    }

    #[test]
    fn test_decamelize_nested() {
        let value = json!({"outerKey": [{"innerKey": 1}], "plain": {"deepKey": true}});
        assert_eq!(
            decamelize_keys(value),
            json!({"outer_key": [{"inner_key": 1}], "plain": {"deep_key": true}})
        );
    }

    #[test]
    fn test_from_wire_missing_required_field() {
        let result: Result<Sample, _> = from_wire(json!({"created_at": 1, "colors": []}));
        assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_decode_encoded_value_preserves_public_fields() {
        let sample = Sample {
            display_name: "App".into(),
            created_at: None,
            colors: vec![Color::DeepRed],
            cache: Some("dropped".into()),
        };
        let decoded: Sample = from_wire(decamelize_keys(to_wire(&sample).unwrap())).unwrap();
        assert_eq!(decoded.display_name, sample.display_name);
        assert_eq!(decoded.created_at, sample.created_at);
        assert_eq!(decoded.colors, sample.colors);
        assert_eq!(decoded.cache, None);
    }

    #[test]
    fn test_encode_list_is_indented_array() {
        let text = encode(&vec![json!({"app_id": "a"}), json!({"app_id": "b"})]).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"appId\": \"a\"\n  },\n  {\n    \"appId\": \"b\"\n  }\n]"
        );
    }

    #[test]
    fn test_reformat() {
        assert_eq!(reformat(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
        assert!(reformat("<html>").is_err());
    }
}
