use crate::validation::ErrorTree;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("DEFINITION ERROR: {message} at property {path}")]
    Definition { path: String, message: String },

    #[error("DESCRIPTOR ERROR: {message} at property {path}")]
    Descriptor { path: String, message: String },

    #[error("INPUT ERROR: {code} - {message}")]
    Input { code: String, message: String },

    #[error("VALIDATION FAILED: {} error(s)", .0.leaf_count())]
    Invalid(ErrorTree),

    #[error("CONFIG ERROR: {message}")]
    Config { message: String },
}

impl ShapeError {
    pub(crate) fn definition(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Definition {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn descriptor(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            path: path.into(),
            message: message.into(),
        }
    }
}
