//! # TYPE GUARDS
//!
//! **CRITICAL**: Guards assert the primitive shape of a field and are always the
//! first rule of a chain built by the typed builders.
//! **POLICY**: Empty values (`null`, absent, `""`) never fail a guard. Required-ness
//! is a separate rule.

use crate::types::{is_empty_json, FieldValue};
use crate::validation::error_codes;
use crate::validation::{Check, ValidationContext, ValidationError};
use serde_json::Value as JsonValue;

fn guard_error(code: &str, ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    Some(ValidationError::new(code).with_param("value", ctx.raw_or_null()))
}

pub fn is_number(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    if ctx.normalized().is_nan() {
        return guard_error(error_codes::INVALID_NUMBER, ctx);
    }
    None
}

pub fn is_of_type_string(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    match ctx.raw {
        raw if is_empty_json(raw) => None,
        Some(JsonValue::String(_)) => None,
        _ => guard_error(error_codes::INVALID_STRING, ctx),
    }
}

pub fn is_of_type_bool(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    if is_empty_json(ctx.raw) || matches!(ctx.normalized(), FieldValue::Bool(_)) {
        return None;
    }
    guard_error(error_codes::INVALID_BOOLEAN, ctx)
}

pub fn is_of_type_date(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    if !is_empty_json(ctx.raw) && ctx.normalized() == FieldValue::InvalidDate {
        return guard_error(error_codes::INVALID_DATE, ctx);
    }
    None
}

pub fn is_of_type_array(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    match ctx.raw {
        raw if is_empty_json(raw) => None,
        Some(JsonValue::Array(_)) => None,
        _ => guard_error(error_codes::INVALID_ARRAY, ctx),
    }
}

pub fn is_of_type_object(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    match ctx.raw {
        raw if is_empty_json(raw) => None,
        Some(JsonValue::Object(_)) => None,
        _ => guard_error(error_codes::INVALID_OBJECT, ctx),
    }
}

// Named checks, as prepended by the builders.

pub fn number_guard() -> Check {
    Check::new("isNumber", is_number)
}

pub fn string_guard() -> Check {
    Check::new("isOfTypeString", is_of_type_string)
}

pub fn bool_guard() -> Check {
    Check::new("isOfTypeBool", is_of_type_bool)
}

pub fn date_guard() -> Check {
    Check::new("isOfTypeDate", is_of_type_date)
}

pub fn array_guard() -> Check {
    Check::new("isOfTypeArray", is_of_type_array)
}

pub fn object_guard() -> Check {
    Check::new("isOfTypeObject", is_of_type_object)
}
