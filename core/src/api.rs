pub use crate::config::EngineConfig;
pub use crate::definition::{
    array_of, boolean, date, dictionary, number, number_with, object, string, string_with,
    Container, ItemSchema, LazyItem, NumberOptions, PropertyDefinition, Shape, StringOptions,
    ValueKind,
};
pub use crate::errors::ShapeError;
pub use crate::getters::Getter;
pub use crate::schema::{RawEntry, Schema, SchemaEntry, SchemaNode, SchemaTree};
pub use crate::transform::transform;
pub use crate::types::FieldValue;
pub use crate::validation::rules::{
    is_email, is_integer, is_negative, is_positive, max_length, min_length, number_equal_to_field,
    number_gt, number_gt_field, number_gte, number_gte_to_field, number_lt, number_lt_field,
    number_lte, number_lte_to_field, number_within_range, required,
    required_if_other_field_equals, required_if_other_field_is_empty,
    required_if_other_field_is_false, required_if_other_field_is_given,
    required_if_other_field_is_true,
};
pub use crate::validation::{
    validate, validate_with_config, Check, ErrorNode, ErrorTree, RawInputValidator,
    SchemaValidator, ValidationContext, ValidationError, ValidationResult, Validator,
};
