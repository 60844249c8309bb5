//! # ENGINE CONFIGURATION
//!
//! **MANDATE**: Configuration is a value passed to the calls that need it.
//! There is no process-wide default to mutate.

use crate::definition::{NumberOptions, StringOptions};
use crate::errors::ShapeError;
use serde::{Deserialize, Serialize};

/// **ENGINE CONFIGURATION**
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Default trimming for `"string"` leaves of declarative schemas
    pub use_trim: bool,

    /// Default decimal-comma handling for `"number"` leaves
    pub replace_comma: bool,

    /// Report keys missing from the schema as `unknownProperty` errors
    pub report_unknown_properties: bool,

    /// Byte limit for raw input handed to `RawInputValidator`
    pub max_input_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_trim: true,
            replace_comma: true,
            report_unknown_properties: false,
            max_input_bytes: 10_485_760, // 10MB
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ShapeError> {
        serde_json::from_str(text).map_err(|e| ShapeError::Config {
            message: format!("invalid engine configuration: {e}"),
        })
    }

    pub fn string_options(&self) -> StringOptions {
        StringOptions {
            use_trim: self.use_trim,
        }
    }

    pub fn number_options(&self) -> NumberOptions {
        NumberOptions {
            replace_comma: self.replace_comma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.use_trim);
        assert!(config.replace_comma);
        assert!(!config.report_unknown_properties);
        assert_eq!(config.max_input_bytes, 10_485_760);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"useTrim": false}"#).unwrap();
        assert!(!config.use_trim);
        assert!(config.replace_comma);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EngineConfig::from_json_str(r#"{"formatError": true}"#);
        match result {
            Err(ShapeError::Config { message }) => assert!(message.contains("formatError")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
