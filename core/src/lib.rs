//! # SHAPECHECK CORE LIBRARY
//!
//! **DECLARATIVE VALIDATION AND COERCION FOR NESTED JSON RECORDS**
//!
//! **ARCHITECTURE**: A schema is declared once, compiled into an immutable
//! `Schema`, then shared by the validation and transform engines.
//! **GUARANTEE**: Field failures are data (`ErrorTree`); only structural
//! mistakes surface as `ShapeError`.

pub mod api;
pub mod config;
pub mod definition;
pub mod errors;
pub mod getters;
pub mod guards;
pub mod schema;
pub mod transform;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;
