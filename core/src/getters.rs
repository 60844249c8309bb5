//! # VALUE GETTERS
//!
//! **CRITICAL**: A getter maps a raw JSON field to a [`FieldValue`].
//! **GUARANTEE**: Every getter is total. Bad input yields a sentinel, never a panic.
//! **GUARANTEE**: Applying a getter to the JSON projection of its own output is a fixed point.

use crate::types::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

type GetterFn = dyn Fn(Option<&JsonValue>) -> FieldValue + Send + Sync;

/// **GETTER SELECTION**
///
/// Built-in getters are plain variants so a definition can be inspected;
/// `Custom` wraps any caller-supplied normalization function.
#[derive(Clone)]
pub enum Getter {
    Identity,
    String,
    TrimmedString,
    Number,
    /// Accepts a decimal comma (`"34,55"` reads as `34.55`)
    FriendlyNumber,
    Date,
    Bool,
    Custom(Arc<GetterFn>),
}

impl Getter {
    pub fn custom<F>(getter: F) -> Self
    where
        F: Fn(Option<&JsonValue>) -> FieldValue + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(getter))
    }

    /// **APPLY** - Normalize a raw value (`None` = field absent).
    pub fn apply(&self, raw: Option<&JsonValue>) -> FieldValue {
        match self {
            Self::Identity => identity(raw),
            Self::String => get_string(raw),
            Self::TrimmedString => get_trimmed_string(raw),
            Self::Number => get_number(raw),
            Self::FriendlyNumber => get_friendly_number(raw),
            Self::Date => get_date(raw),
            Self::Bool => get_bool(raw),
            Self::Custom(getter) => getter(raw),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::String => "string",
            Self::TrimmedString => "trimmedString",
            Self::Number => "number",
            Self::FriendlyNumber => "friendlyNumber",
            Self::Date => "date",
            Self::Bool => "bool",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Getter({})", self.name())
    }
}

pub fn identity(raw: Option<&JsonValue>) -> FieldValue {
    match raw {
        None | Some(JsonValue::Null) => FieldValue::Null,
        Some(value) => FieldValue::Json(value.clone()),
    }
}

pub fn get_string(raw: Option<&JsonValue>) -> FieldValue {
    match raw {
        None | Some(JsonValue::Null) => FieldValue::Null,
        Some(JsonValue::String(text)) => FieldValue::Text(text.clone()),
        Some(JsonValue::Number(number)) => FieldValue::Text(number.to_string()),
        Some(JsonValue::Bool(flag)) => FieldValue::Text(flag.to_string()),
        Some(other) => FieldValue::Text(other.to_string()),
    }
}

pub fn get_trimmed_string(raw: Option<&JsonValue>) -> FieldValue {
    match get_string(raw) {
        FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
        other => other,
    }
}

pub fn get_number(raw: Option<&JsonValue>) -> FieldValue {
    to_number(raw, false)
}

pub fn get_friendly_number(raw: Option<&JsonValue>) -> FieldValue {
    to_number(raw, true)
}

pub fn get_date(raw: Option<&JsonValue>) -> FieldValue {
    match raw {
        None | Some(JsonValue::Null | JsonValue::Bool(false)) => FieldValue::Null,
        Some(JsonValue::String(text)) if text.is_empty() => FieldValue::Null,
        Some(JsonValue::String(text)) => {
            parse_date(text).map_or(FieldValue::InvalidDate, FieldValue::Date)
        }
        Some(JsonValue::Number(number)) => match number.as_f64() {
            Some(millis) if millis == 0.0 => FieldValue::Null,
            #[allow(clippy::cast_possible_truncation)]
            Some(millis) if millis.is_finite() => DateTime::from_timestamp_millis(millis as i64)
                .map_or(FieldValue::InvalidDate, FieldValue::Date),
            _ => FieldValue::InvalidDate,
        },
        Some(_) => FieldValue::InvalidDate,
    }
}

/// Three-state: `true`, `false`, or `Null` for anything that is not a boolean.
pub fn get_bool(raw: Option<&JsonValue>) -> FieldValue {
    match raw {
        Some(JsonValue::Bool(flag)) => FieldValue::Bool(*flag),
        Some(JsonValue::String(text)) if text == "true" => FieldValue::Bool(true),
        Some(JsonValue::String(text)) if text == "false" => FieldValue::Bool(false),
        _ => FieldValue::Null,
    }
}

fn to_number(raw: Option<&JsonValue>, replace_comma: bool) -> FieldValue {
    match raw {
        None | Some(JsonValue::Null) => FieldValue::Null,
        Some(JsonValue::Number(number)) => FieldValue::Number(number.as_f64().unwrap_or(f64::NAN)),
        Some(JsonValue::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return FieldValue::Null;
            }
            // only the first comma, so "1,000,5" stays invalid
            let text = if replace_comma {
                text.replacen(',', ".", 1)
            } else {
                text.to_string()
            };
            FieldValue::Number(parse_decimal(&text))
        }
        Some(_) => FieldValue::Number(f64::NAN),
    }
}

/// Plain decimal notation only; `inf`/`nan` spellings are rejected.
pub(crate) fn parse_decimal(text: &str) -> f64 {
    let plain = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !plain || !text.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// RFC 3339, ISO date-times without offset (read as UTC) and bare `YYYY-MM-DD`.
pub(crate) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    mod string_getters {
        use super::*;

        #[test]
        fn test_get_string_null_when_absent() {
            assert_eq!(get_string(None), FieldValue::Null);
            assert_eq!(get_string(Some(&JsonValue::Null)), FieldValue::Null);
        }

        #[test]
        fn test_get_string_from_number() {
            assert_eq!(get_string(Some(&json!(6))), FieldValue::Text("6".into()));
        }

        #[test]
        fn test_get_trimmed_string() {
            assert_eq!(
                get_trimmed_string(Some(&json!("  test  "))),
                FieldValue::Text("test".into())
            );
            assert_eq!(get_trimmed_string(None), FieldValue::Null);
        }
    }

    mod number_getters {
        use super::*;

        #[test]
        fn test_get_number_invalid_is_nan() {
            assert!(get_number(Some(&json!("fsdfs"))).is_nan());
            assert!(get_number(Some(&json!("1.5.9"))).is_nan());
            assert!(get_number(Some(&json!("inf"))).is_nan());
        }

        #[test]
        fn test_get_number_valid() {
            assert_eq!(get_number(Some(&json!("60"))), FieldValue::Number(60.0));
            assert_eq!(get_number(Some(&json!(60))), FieldValue::Number(60.0));
            assert_eq!(get_number(None), FieldValue::Null);
        }

        #[test]
        fn test_get_number_rejects_comma() {
            assert!(get_number(Some(&json!("60,6"))).is_nan());
        }

        #[test]
        fn test_get_friendly_number_accepts_comma() {
            assert_eq!(
                get_friendly_number(Some(&json!("60,6"))),
                FieldValue::Number(60.6)
            );
            assert!(get_friendly_number(Some(&json!("1,000,5"))).is_nan());
        }

        #[test]
        fn test_blank_text_is_null() {
            assert_eq!(get_friendly_number(Some(&json!("  "))), FieldValue::Null);
        }
    }

    mod date_getter {
        use super::*;

        #[test]
        fn test_get_date_null_when_absent() {
            assert_eq!(get_date(None), FieldValue::Null);
            assert_eq!(get_date(Some(&json!(""))), FieldValue::Null);
        }

        #[test]
        fn test_get_date_parses_plain_date() {
            let expected = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap();
            assert_eq!(get_date(Some(&json!("2017-01-01"))), FieldValue::Date(expected));
        }

        #[test]
        fn test_get_date_is_fixed_point_on_its_output() {
            let first = get_date(Some(&json!("2017-01-15")));
            assert_eq!(get_date(Some(&first.to_json())), first);
        }

        #[test]
        fn test_get_date_invalid_sentinel() {
            assert_eq!(get_date(Some(&json!("sdfsadf"))), FieldValue::InvalidDate);
            assert_eq!(get_date(Some(&json!([1]))), FieldValue::InvalidDate);
        }
    }

    mod bool_getter {
        use super::*;

        #[test]
        fn test_get_bool_three_states() {
            assert_eq!(get_bool(Some(&json!("true"))), FieldValue::Bool(true));
            assert_eq!(get_bool(Some(&json!(true))), FieldValue::Bool(true));
            assert_eq!(get_bool(Some(&json!("false"))), FieldValue::Bool(false));
            assert_eq!(get_bool(Some(&json!(false))), FieldValue::Bool(false));
            assert_eq!(get_bool(Some(&json!("yes"))), FieldValue::Null);
            assert_eq!(get_bool(None), FieldValue::Null);
        }
    }

    #[test]
    fn test_custom_getter() {
        let upper = Getter::custom(|raw| match get_string(raw) {
            FieldValue::Text(text) => FieldValue::Text(text.to_uppercase()),
            other => other,
        });
        assert_eq!(upper.apply(Some(&json!("ab"))), FieldValue::Text("AB".into()));
        assert_eq!(upper.name(), "custom");
    }
}
