/*
 * Responsibility
 * - request/response DTOs (the wire shapes)
 * - lenient body fields: a wrongly-typed value becomes a field error, not a parse error
 */
use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use validator::ValidationError;

use crate::error::{BLANK, NULL, REQUIRED};

pub mod comments;
pub mod groups;
pub mod posts;
pub mod token;

pub const NOT_A_STRING: &str = "Not a valid string.";

/// One body field as the client sent it.
///
/// Use with `#[serde(default, deserialize_with = "...")]`; a missing key stays `Missing`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Missing,
    Null,
    Value(T),
    /// wrong JSON type; carries the message reported under the field's key
    Invalid(String),
}

impl<T> Field<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Tri-state update: None keeps, Some(None) clears, Some(Some(v)) sets.
    pub fn into_update(self) -> Option<Option<T>> {
        match self {
            Field::Null => Some(None),
            Field::Value(v) => Some(Some(v)),
            Field::Missing | Field::Invalid(_) => None,
        }
    }
}

// validator attaches the offending value to its errors
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

impl Field<String> {
    pub fn trimmed(self) -> Self {
        match self {
            Field::Value(s) => Field::Value(s.trim().to_string()),
            other => other,
        }
    }
}

/// Strings as-is, numbers coerced to their decimal text.
pub fn text_field<'de, D>(deserializer: D) -> Result<Field<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Field::Null,
        Value::String(s) => Field::Value(s),
        Value::Number(n) => Field::Value(n.to_string()),
        _ => Field::Invalid(NOT_A_STRING.to_string()),
    })
}

/// Primary key reference: an integer, or a string holding one.
pub fn pk_field<'de, D>(deserializer: D) -> Result<Field<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let pk = match &value {
        Value::Null => return Ok(Field::Null),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(match pk {
        Some(id) => Field::Value(id),
        None => Field::Invalid(format!(
            "Incorrect type. Expected pk value, received {}.",
            json_type_name(&value)
        )),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn error(code: &'static str, message: &str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message.to_string()));
    err
}

fn check_present_text(field: &Field<String>) -> Result<(), ValidationError> {
    match field {
        Field::Missing => Ok(()),
        Field::Null => Err(error("null", NULL)),
        Field::Value(s) if s.is_empty() => Err(error("blank", BLANK)),
        Field::Value(_) => Ok(()),
        Field::Invalid(message) => Err(error("invalid", message)),
    }
}

pub(crate) fn required_text(field: &Field<String>) -> Result<(), ValidationError> {
    if *field == Field::Missing {
        return Err(error("required", REQUIRED));
    }
    check_present_text(field)
}

pub(crate) fn optional_text(field: &Field<String>) -> Result<(), ValidationError> {
    check_present_text(field)
}

pub(crate) fn pk_reference(field: &Field<i64>) -> Result<(), ValidationError> {
    match field {
        Field::Invalid(message) => Err(error("incorrect_type", message)),
        _ => Ok(()),
    }
}
