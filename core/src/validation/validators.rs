//! # CONCRETE VALIDATOR IMPLEMENTATIONS
//!
//! **CRITICAL**: Strict, pipeline-style validators implementing the core `Validator` trait.
//! **MANDATE**: Rejections are `ShapeError` values, never panics.

use super::{error_codes, runner, ValidationResult, Validator};
use crate::config::EngineConfig;
use crate::errors::ShapeError;
use crate::schema::Schema;
use crate::transform::transform;
use serde_json::Value as JsonValue;

// ================================================================================================
// RAW INPUT VALIDATOR - Bytes to JSON object
// ================================================================================================

/// **RAW INPUT VALIDATOR**
///
/// **PURPOSE**: Turns a request body into a JSON entity.
/// **GUARANTEE**: Oversized, non-UTF-8, malformed or non-object input is rejected
/// before any schema work.
#[derive(Debug, Clone)]
pub struct RawInputValidator {
    /// **MAXIMUM ALLOWED SIZE** - Input size limit in bytes
    max_bytes: usize,
}

impl RawInputValidator {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_input_bytes)
    }
}

impl Default for RawInputValidator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Validator for RawInputValidator {
    type Input = Vec<u8>;
    type Output = JsonValue;

    fn validate(&self, input: Self::Input) -> ValidationResult<Self::Output> {
        // **STEP 1**: Size limit
        if input.len() > self.max_bytes {
            return Err(ShapeError::Input {
                code: error_codes::INPUT_TOO_LARGE.to_string(),
                message: format!(
                    "Input size {} exceeds maximum allowed size {}",
                    input.len(),
                    self.max_bytes
                ),
            });
        }

        // **STEP 2**: UTF-8 encoding
        let text = std::str::from_utf8(&input).map_err(|e| ShapeError::Input {
            code: error_codes::INVALID_UTF8.to_string(),
            message: format!("Invalid UTF-8 sequence: {e}"),
        })?;

        // **STEP 3**: JSON syntax
        let value: JsonValue = serde_json::from_str(text).map_err(|e| ShapeError::Input {
            code: error_codes::INVALID_JSON.to_string(),
            message: format!("Malformed JSON: {e}"),
        })?;

        // **STEP 4**: Object root
        if !value.is_object() {
            return Err(ShapeError::Input {
                code: error_codes::NOT_AN_OBJECT.to_string(),
                message: "Entity must be a JSON object".to_string(),
            });
        }

        Ok(value)
    }
}

// ================================================================================================
// SCHEMA VALIDATOR - Entity against a compiled Schema
// ================================================================================================

/// **SCHEMA VALIDATOR**
///
/// **PURPOSE**: Validates an entity and hands back its transformed form.
/// **RETURNS**: `ShapeError::Invalid` carrying the full error tree when any field fails.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Schema,
    config: EngineConfig,
    params: Option<JsonValue>,
}

impl SchemaValidator {
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, EngineConfig::default())
    }

    pub fn with_config(schema: Schema, config: EngineConfig) -> Self {
        Self {
            schema,
            config,
            params: None,
        }
    }

    /// Caller data forwarded to every rule as `ValidationContext::params`.
    #[must_use]
    pub fn with_params(mut self, params: JsonValue) -> Self {
        self.params = Some(params);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Raw bytes through `RawInputValidator`, then this validator.
    pub fn validate_bytes(&self, input: Vec<u8>) -> ValidationResult<JsonValue> {
        let entity = RawInputValidator::from_config(&self.config).validate(input)?;
        self.validate(entity)
    }
}

impl Validator for SchemaValidator {
    type Input = JsonValue;
    type Output = JsonValue;

    fn validate(&self, input: Self::Input) -> ValidationResult<Self::Output> {
        let errors =
            runner::validate_with_config(&input, &self.schema, self.params.as_ref(), &self.config)?;
        if errors.is_empty() {
            Ok(transform(&input, &self.schema))
        } else {
            Err(ShapeError::Invalid(errors))
        }
    }
}
