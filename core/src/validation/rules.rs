//! # BUILT-IN RULES
//!
//! **PURPOSE**: The stock validator functions: required-ness, numeric
//! comparisons and string constraints.
//! **POLICY**: Every rule passes on empty values, and comparison rules pass
//! when the counterpart cannot be read as a number.

use super::context::{Check, ValidationContext, ValidationError};
use super::error_codes;
use crate::errors::ShapeError;
use crate::types::{is_empty_json, is_truthy, FieldValue};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$").expect("email pattern is valid")
});

// ================================================================================================
// REQUIRED RULES
// ================================================================================================

fn check_required(ctx: &ValidationContext<'_>) -> Option<ValidationError> {
    if is_empty_json(ctx.raw) || ctx.value.is_empty() {
        Some(ValidationError::new(error_codes::REQUIRED))
    } else {
        None
    }
}

pub fn required() -> Check {
    Check::new("required", check_required)
}

pub fn required_if_other_field_is_true(other_field: impl Into<String>) -> Check {
    let other_field = other_field.into();
    Check::new("requiredIfOtherFieldIsTrue", move |ctx| {
        if is_truthy(ctx.sibling(&other_field)) {
            check_required(ctx)
        } else {
            None
        }
    })
}

/// Absent counterpart counts as "not false".
pub fn required_if_other_field_is_false(other_field: impl Into<String>) -> Check {
    let other_field = other_field.into();
    Check::new("requiredIfOtherFieldIsFalse", move |ctx| match ctx.sibling(&other_field) {
        Some(other) if !is_truthy(Some(other)) => check_required(ctx),
        _ => None,
    })
}

/// Required when the counterpart equals one of `expected`. An absent
/// counterpart reads as `false`.
pub fn required_if_other_field_equals(
    other_field: impl Into<String>,
    expected: impl IntoIterator<Item = JsonValue>,
) -> Check {
    let other_field = other_field.into();
    let expected: Vec<JsonValue> = expected.into_iter().collect();
    Check::new("requiredIfOtherFieldEquals", move |ctx| {
        let other = ctx.sibling(&other_field).cloned().unwrap_or(JsonValue::Bool(false));
        if expected.contains(&other) {
            check_required(ctx)
        } else {
            None
        }
    })
}

pub fn required_if_other_field_is_empty(other_field: impl Into<String>) -> Check {
    let other_field = other_field.into();
    Check::new("requiredIfOtherFieldIsEmpty", move |ctx| {
        if is_empty_json(ctx.sibling(&other_field)) {
            check_required(ctx)
        } else {
            None
        }
    })
}

pub fn required_if_other_field_is_given(other_field: impl Into<String>) -> Check {
    let other_field = other_field.into();
    Check::new("requiredIfOtherFieldIsGiven", move |ctx| {
        if is_empty_json(ctx.sibling(&other_field)) {
            None
        } else {
            check_required(ctx)
        }
    })
}

// ================================================================================================
// NUMERIC RULES
// ================================================================================================

fn value_error(code: &str, ctx: &ValidationContext<'_>) -> ValidationError {
    ValidationError::new(code).with_param("value", ctx.raw_or_null())
}

pub fn is_integer() -> Check {
    Check::new("isInteger", |ctx| {
        let number = ctx.number()?;
        (number.fract() != 0.0).then(|| value_error(error_codes::INVALID_INTEGER, ctx))
    })
}

pub fn is_positive() -> Check {
    Check::new("isPositive", |ctx| {
        let number = ctx.number()?;
        (number < 0.0).then(|| value_error(error_codes::SHOULD_BE_POSITIVE, ctx))
    })
}

pub fn is_negative() -> Check {
    Check::new("isNegative", |ctx| {
        let number = ctx.number()?;
        (number >= 0.0).then(|| value_error(error_codes::SHOULD_BE_NEGATIVE, ctx))
    })
}

fn threshold_rule(
    name: &'static str,
    code: &'static str,
    threshold: f64,
    accept: fn(f64, f64) -> bool,
) -> Check {
    Check::new(name, move |ctx| {
        let number = ctx.number()?;
        (!accept(number, threshold)).then(|| {
            value_error(code, ctx).with_param("threshold", threshold)
        })
    })
}

pub fn number_gt(threshold: f64) -> Check {
    threshold_rule("numberGt", error_codes::SHOULD_BE_GT, threshold, |a, b| a > b)
}

pub fn number_gte(threshold: f64) -> Check {
    threshold_rule("numberGte", error_codes::SHOULD_BE_GTE, threshold, |a, b| a >= b)
}

pub fn number_lt(threshold: f64) -> Check {
    threshold_rule("numberLt", error_codes::SHOULD_BE_LT, threshold, |a, b| a < b)
}

pub fn number_lte(threshold: f64) -> Check {
    threshold_rule("numberLte", error_codes::SHOULD_BE_LTE, threshold, |a, b| a <= b)
}

fn field_rule(
    name: &'static str,
    code: &'static str,
    other_field: String,
    other_label: Option<&str>,
    accept: fn(f64, f64) -> bool,
) -> Check {
    let other_label = other_label.map_or_else(|| other_field.clone(), str::to_string);
    Check::new(name, move |ctx| {
        let number = ctx.number()?;
        let other = ctx.sibling_number(&other_field)?;
        (!accept(number, other)).then(|| {
            value_error(code, ctx)
                .with_param("otherFieldValue", other)
                .with_param("otherFieldLabel", other_label.clone())
        })
    })
}

pub fn number_gt_field(other_field: impl Into<String>, other_label: Option<&str>) -> Check {
    let code = error_codes::SHOULD_BE_GT_FIELD;
    field_rule("numberGtField", code, other_field.into(), other_label, |a, b| a > b)
}

pub fn number_gte_to_field(other_field: impl Into<String>, other_label: Option<&str>) -> Check {
    let code = error_codes::SHOULD_BE_GTE_FIELD;
    field_rule("numberGteToField", code, other_field.into(), other_label, |a, b| a >= b)
}

pub fn number_lt_field(other_field: impl Into<String>, other_label: Option<&str>) -> Check {
    let code = error_codes::SHOULD_BE_LT_FIELD;
    field_rule("numberLtField", code, other_field.into(), other_label, |a, b| a < b)
}

pub fn number_lte_to_field(other_field: impl Into<String>, other_label: Option<&str>) -> Check {
    let code = error_codes::SHOULD_BE_LTE_FIELD;
    field_rule("numberLteToField", code, other_field.into(), other_label, |a, b| a <= b)
}

#[allow(clippy::float_cmp)]
pub fn number_equal_to_field(other_field: impl Into<String>, other_label: Option<&str>) -> Check {
    let code = error_codes::SHOULD_BE_EQUAL_TO_FIELD;
    field_rule("numberEqualToField", code, other_field.into(), other_label, |a, b| a == b)
}

/// **RANGE RULE** - Rejects `min > max` (or non-finite bounds) at definition time.
pub fn number_within_range(min: f64, max: f64) -> Result<Check, ShapeError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ShapeError::definition("", "range bounds must be finite numbers"));
    }
    if min > max {
        return Err(ShapeError::definition(
            "",
            format!("range minimum {min} exceeds maximum {max}"),
        ));
    }
    Ok(Check::new("numberWithinRange", move |ctx| {
        let number = ctx.number()?;
        (number < min || number > max).then(|| {
            value_error(error_codes::NOT_IN_RANGE, ctx)
                .with_param("minValue", min)
                .with_param("maxValue", max)
        })
    }))
}

// ================================================================================================
// STRING RULES
// ================================================================================================

/// Character count of text, item count of an array (collection rules).
fn value_length(ctx: &ValidationContext<'_>) -> Option<usize> {
    if ctx.value.is_empty() {
        return None;
    }
    match &ctx.value {
        FieldValue::Json(JsonValue::Array(items)) => Some(items.len()),
        other => other.as_str().map(|text| text.chars().count()),
    }
}

pub fn min_length(min: usize) -> Check {
    Check::new("minLength", move |ctx| {
        let length = value_length(ctx)?;
        (length < min).then(|| {
            value_error(error_codes::NOT_LONG_ENOUGH, ctx).with_param("minLength", min)
        })
    })
}

pub fn max_length(max: usize) -> Check {
    Check::new("maxLength", move |ctx| {
        let length = value_length(ctx)?;
        (length > max).then(|| {
            value_error(error_codes::TOO_LONG, ctx).with_param("maxLength", max)
        })
    })
}

pub fn is_email() -> Check {
    Check::new("isEmail", |ctx| {
        if ctx.value.is_empty() {
            return None;
        }
        let text = ctx.value.as_str()?;
        (!EMAIL_REGEX.is_match(text)).then(|| value_error(error_codes::INVALID_EMAIL, ctx))
    })
}
