//! # SHAPECHECK TYPE DEFINITIONS
//!
//! **CRITICAL**: `FieldValue` is what every getter produces and every rule consumes.
//! **MANDATE**: Unparseable input is represented by a sentinel variant, never by a panic.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value as JsonValue};

/// **NORMALIZED FIELD VALUE**
///
/// **PURPOSE**: Output of a [`Getter`](crate::getters::Getter), input of every rule.
/// **SENTINELS**: `Number(NAN)` and `InvalidDate` flag input that could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or `null`
    Null,
    Text(String),
    /// May be `NaN` when the raw value was not numeric
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    InvalidDate,
    /// Untouched raw value (identity getter)
    Json(JsonValue),
}

impl FieldValue {
    /// **EMPTINESS CHECK** - `null`, absent and `""` are empty; nothing else is.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            Self::Json(value) => is_empty_json(Some(value)),
            _ => false,
        }
    }

    /// **NUMERIC VIEW** - `None` when the value carries no number at all.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Json(JsonValue::Number(number)) => number.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(JsonValue::String(text)) => Some(text),
            _ => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Number(number) if number.is_nan())
    }

    /// **JSON PROJECTION**
    ///
    /// Sentinels (`NaN`, invalid dates) project to `null`. Integral numbers are
    /// emitted as JSON integers so `"4587"` transforms to `4587`, not `4587.0`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null | Self::InvalidDate => JsonValue::Null,
            Self::Text(text) => JsonValue::String(text.clone()),
            Self::Number(number) => number_to_json(*number),
            Self::Bool(flag) => JsonValue::Bool(*flag),
            Self::Date(date) => {
                JsonValue::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Self::Json(value) => value.clone(),
        }
    }
}

/// `undefined`/`null`/`""` on the raw side.
pub fn is_empty_json(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// Loose truthiness used by the conditional `required` rules.
pub fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(flag)) => *flag,
        Some(JsonValue::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(JsonValue::String(text)) => !text.is_empty(),
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => true,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_json(number: f64) -> JsonValue {
    if !number.is_finite() {
        return JsonValue::Null;
    }
    if number.fract() == 0.0 && number.abs() < 9.007_199_254_740_992e15 {
        return JsonValue::from(number as i64);
    }
    Number::from_f64(number).map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::Json(json!("")).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Json(json!([])).is_empty());
    }

    #[test]
    fn test_integral_numbers_project_to_integers() {
        assert_eq!(FieldValue::Number(4587.0).to_json(), json!(4587));
        assert_eq!(FieldValue::Number(34.55).to_json(), json!(34.55));
        assert_eq!(FieldValue::Number(-2.0).to_json(), json!(-2));
    }

    #[test]
    fn test_sentinels_project_to_null() {
        assert_eq!(FieldValue::Number(f64::NAN).to_json(), JsonValue::Null);
        assert_eq!(FieldValue::InvalidDate.to_json(), JsonValue::Null);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(None));
    }
}
