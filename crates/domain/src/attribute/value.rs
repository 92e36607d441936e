//! Typed attribute values and their coercion from raw hub strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoercionError;

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// The type tag of an [`AttributeValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Bool,
    Int,
    Float,
    String,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("boolean"),
            Self::Int => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
        }
    }
}

impl AttributeValue {
    /// The type tag of this value.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Bool(_) => AttributeKind::Bool,
            Self::Int(_) => AttributeKind::Int,
            Self::Float(_) => AttributeKind::Float,
            Self::String(_) => AttributeKind::String,
        }
    }

    /// Convert a raw hub string into a value of the given type.
    ///
    /// Numbers tolerate surrounding whitespace and a leading sign. Booleans
    /// accept `1`/`0` and `true`/`false` in any case.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when `raw` is not a valid literal for `kind`.
    pub fn coerce(raw: &str, kind: AttributeKind) -> Result<Self, CoercionError> {
        let fail = || CoercionError {
            raw: raw.to_string(),
            expected: kind,
        };
        let trimmed = raw.trim();
        match kind {
            AttributeKind::Int => trimmed.parse().map(Self::Int).map_err(|_| fail()),
            AttributeKind::Float => trimmed.parse().map(Self::Float).map_err(|_| fail()),
            AttributeKind::Bool => parse_bool(trimmed).map(Self::Bool).ok_or_else(fail),
            AttributeKind::String => Ok(Self::String(raw.to_string())),
        }
    }

    /// Convert a raw hub string into a value of the same type as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when `raw` does not fit this value's type.
    pub fn coerce_like(&self, raw: &str) -> Result<Self, CoercionError> {
        Self::coerce(raw, self.kind())
    }

    /// Type a value read from a device snapshot.
    ///
    /// JSON integers and strings holding an integer become [`Int`](Self::Int),
    /// other numbers become [`Float`](Self::Float), booleans stay booleans and
    /// everything else is kept as text.
    #[must_use]
    pub fn from_snapshot(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => s
                .trim()
                .parse()
                .map_or_else(|_| Self::String(s.clone()), Self::Int),
            serde_json::Value::Null => Self::String(String::new()),
            other => Self::String(other.to_string()),
        }
    }

    /// Interpret the value as an integer, parsing text if needed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) => None,
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as a float, parsing text if needed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as a boolean (non-zero integers are `true`).
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => parse_bool(s.trim()),
            other => other.to_i64().map(|i| i != 0),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => b.fmt(f),
            Self::Int(i) => i.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text == "1" || text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text == "0" || text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_int_variant_as_number() {
        let json = serde_json::to_string(&AttributeValue::Int(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn should_serialize_string_variant_as_plain_string() {
        let json = serde_json::to_string(&AttributeValue::String("hello".into())).unwrap();
        assert_eq!(json, "\"hello\"");
    }

    #[test]
    fn should_coerce_integer_string_when_cached_value_is_int() {
        let cached = AttributeValue::Int(0);
        assert_eq!(cached.coerce_like("42"), Ok(AttributeValue::Int(42)));
    }

    #[test]
    fn should_coerce_signed_integer_with_whitespace() {
        let value = AttributeValue::coerce(" -7 ", AttributeKind::Int).unwrap();
        assert_eq!(value, AttributeValue::Int(-7));
    }

    #[test]
    fn should_fail_to_coerce_non_numeric_string_to_int() {
        let err = AttributeValue::coerce("abc", AttributeKind::Int).unwrap_err();
        assert_eq!(err.raw, "abc");
        assert_eq!(err.expected, AttributeKind::Int);
    }

    #[test]
    fn should_fail_to_coerce_decimal_string_to_int() {
        assert!(AttributeValue::coerce("4.2", AttributeKind::Int).is_err());
    }

    #[test]
    fn should_coerce_decimal_string_to_float() {
        let value = AttributeValue::coerce("21.5", AttributeKind::Float).unwrap();
        assert_eq!(value, AttributeValue::Float(21.5));
    }

    #[test]
    fn should_coerce_boolean_like_strings() {
        assert_eq!(
            AttributeValue::coerce("1", AttributeKind::Bool),
            Ok(AttributeValue::Bool(true))
        );
        assert_eq!(
            AttributeValue::coerce("FALSE", AttributeKind::Bool),
            Ok(AttributeValue::Bool(false))
        );
        assert!(AttributeValue::coerce("maybe", AttributeKind::Bool).is_err());
    }

    #[test]
    fn should_keep_string_verbatim_when_target_is_string() {
        let value = AttributeValue::coerce(" 12 ", AttributeKind::String).unwrap();
        assert_eq!(value, AttributeValue::String(" 12 ".into()));
    }

    #[test]
    fn should_type_snapshot_integer_strings_as_int() {
        let value = AttributeValue::from_snapshot(&serde_json::json!("0"));
        assert_eq!(value, AttributeValue::Int(0));
    }

    #[test]
    fn should_keep_snapshot_text_as_string() {
        let value = AttributeValue::from_snapshot(&serde_json::json!("Armed"));
        assert_eq!(value, AttributeValue::String("Armed".into()));
    }

    #[test]
    fn should_type_snapshot_numbers_and_booleans() {
        assert_eq!(
            AttributeValue::from_snapshot(&serde_json::json!(3)),
            AttributeValue::Int(3)
        );
        assert_eq!(
            AttributeValue::from_snapshot(&serde_json::json!(1.5)),
            AttributeValue::Float(1.5)
        );
        assert_eq!(
            AttributeValue::from_snapshot(&serde_json::json!(true)),
            AttributeValue::Bool(true)
        );
    }

    #[test]
    fn should_read_numbers_out_of_text_values() {
        let value = AttributeValue::String("12.25".into());
        assert_eq!(value.to_f64(), Some(12.25));
        assert_eq!(value.to_i64(), None);
        assert_eq!(AttributeValue::String("3".into()).to_i64(), Some(3));
    }

    #[test]
    fn should_interpret_non_zero_integers_as_true() {
        assert_eq!(AttributeValue::Int(2).to_bool(), Some(true));
        assert_eq!(AttributeValue::Int(0).to_bool(), Some(false));
        assert_eq!(AttributeValue::Float(0.5).to_bool(), None);
    }

    #[test]
    fn should_compare_equal_values() {
        assert_eq!(AttributeValue::Int(10), AttributeValue::Int(10));
        assert_ne!(AttributeValue::Int(10), AttributeValue::Int(20));
        assert_ne!(AttributeValue::Int(1), AttributeValue::String("1".into()));
    }
}
