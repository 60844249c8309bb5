//! # SHAPECHECK VALIDATION MODULE
//!
//! **CORE VALIDATION SYSTEM WITH TRAIT-BASED ARCHITECTURE**
//!
//! This module provides the schema-driven validation engine, the built-in rule
//! collaborator and the `Validator` trait used by strict, pipeline-style callers.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **RAW INPUT VALIDATION** - Size limit, UTF-8 and JSON object root
//! 2. **SCHEMA VALIDATION** - Every field's rule chain, collecting an `ErrorTree`
//! 3. **TRANSFORM** - Normalized entity handed back on success
//!
//! ## USAGE
//!
//! ```rust
//! use shapecheck::api::*;
//! use serde_json::json;
//!
//! let schema = Schema::new(SchemaTree::new().field("name", string([required()])))?;
//! let errors = validate(&json!({"name": ""}), &schema, None)?;
//! assert_eq!(errors.error_at("name").map(ValidationError::code), Some("required"));
//! # Ok::<(), ShapeError>(())
//! ```

use crate::errors::ShapeError;

pub mod context;
pub mod error_tree;
pub mod rules;
mod runner;
pub mod validators;

pub use context::{Check, ValidationContext, ValidationError};
pub use error_tree::{ErrorNode, ErrorTree, COLLECTION_ERROR_KEY};
pub use runner::{validate, validate_with_config};
pub use validators::{RawInputValidator, SchemaValidator};

/// **CORE VALIDATOR TRAIT**
///
/// **MANDATE**: Strict validation surfaces implement this trait.
/// **GUARANTEE**: MUST NOT panic. ALL error conditions MUST return `ShapeError`.
pub trait Validator {
    /// **INPUT TYPE** - Data type accepted by this validator
    type Input;

    /// **OUTPUT TYPE** - Validated data type returned on success
    type Output;

    /// **VALIDATION EXECUTION**
    ///
    /// **RETURNS**:
    /// - `Ok(Self::Output)` - Successfully validated data
    /// - `Err(ShapeError)` - Rejected input, with a structured error
    fn validate(&self, input: Self::Input) -> ValidationResult<Self::Output>;
}

/// **VALIDATION RESULT TYPE ALIAS**
pub type ValidationResult<T> = Result<T, ShapeError>;

/// **VALIDATION ERROR CODES**
///
/// **MANDATE**: Use these standardized codes for consistent error reporting.
pub mod error_codes {
    // Field-level codes, reported inside an `ErrorTree`
    pub const REQUIRED: &str = "required";
    pub const INVALID_NUMBER: &str = "invalidNumber";
    pub const INVALID_INTEGER: &str = "invalidInteger";
    pub const SHOULD_BE_POSITIVE: &str = "valueShouldBePositive";
    pub const SHOULD_BE_NEGATIVE: &str = "valueShouldBeNegative";
    pub const SHOULD_BE_GT: &str = "valueShouldBeGt";
    pub const SHOULD_BE_GTE: &str = "valueShouldBeGte";
    pub const SHOULD_BE_LT: &str = "valueShouldBeLt";
    pub const SHOULD_BE_LTE: &str = "valueShouldBeLte";
    pub const SHOULD_BE_GT_FIELD: &str = "valueShouldBeGtField";
    pub const SHOULD_BE_GTE_FIELD: &str = "valueShouldBeGteField";
    pub const SHOULD_BE_LT_FIELD: &str = "valueShouldBeLtField";
    pub const SHOULD_BE_LTE_FIELD: &str = "valueShouldBeLteField";
    pub const SHOULD_BE_EQUAL_TO_FIELD: &str = "valueShouldBeEqualToField";
    pub const NOT_IN_RANGE: &str = "valueNotInRange";
    pub const NOT_LONG_ENOUGH: &str = "valueNotLongEnough";
    pub const TOO_LONG: &str = "valueTooLong";
    pub const INVALID_EMAIL: &str = "invalidEmail";
    pub const INVALID_STRING: &str = "invalidString";
    pub const INVALID_BOOLEAN: &str = "invalidBoolean";
    pub const INVALID_DATE: &str = "invalidDate";
    pub const INVALID_ARRAY: &str = "invalidArray";
    pub const INVALID_OBJECT: &str = "invalidObject";
    pub const UNKNOWN_PROPERTY: &str = "unknownProperty";

    // Input-level codes, carried by `ShapeError::Input`
    pub const INPUT_TOO_LARGE: &str = "SHAPECHECK_INPUT_TOO_LARGE";
    pub const INVALID_UTF8: &str = "SHAPECHECK_INVALID_UTF8";
    pub const INVALID_JSON: &str = "SHAPECHECK_INVALID_JSON";
    pub const NOT_AN_OBJECT: &str = "SHAPECHECK_NOT_AN_OBJECT";
    pub const RESERVED_KEY: &str = "SHAPECHECK_RESERVED_KEY";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_codes_are_camel_case() {
        for code in [
            error_codes::REQUIRED,
            error_codes::SHOULD_BE_GTE_FIELD,
            error_codes::UNKNOWN_PROPERTY,
        ] {
            assert!(code.chars().next().is_some_and(char::is_lowercase));
            assert!(!code.contains('_'));
        }
    }

    #[test]
    fn test_input_codes_are_prefixed() {
        for code in [
            error_codes::INPUT_TOO_LARGE,
            error_codes::INVALID_UTF8,
            error_codes::INVALID_JSON,
            error_codes::NOT_AN_OBJECT,
            error_codes::RESERVED_KEY,
        ] {
            assert!(code.starts_with("SHAPECHECK_"));
        }
    }
}
