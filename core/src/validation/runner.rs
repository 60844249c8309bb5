//! # VALIDATION ENGINE
//!
//! **CRITICAL**: Depth-first walk of the schema in declaration order.
//! **GUARANTEE**: Every field is evaluated; only the rule chain of a single
//! field short-circuits.

use super::context::{run_chain, Check, ValidationContext, ValidationError};
use super::error_codes;
use super::error_tree::{ErrorNode, ErrorTree, COLLECTION_ERROR_KEY};
use crate::config::EngineConfig;
use crate::definition::{PropertyDefinition, Shape};
use crate::errors::ShapeError;
use crate::schema::{join_path, Schema, SchemaEntry, SchemaNode};
use serde_json::Value as JsonValue;

/// **VALIDATE** - Error tree for `entity`; empty when every field passes.
///
/// **ERRORS**: Only structural problems (`ShapeError::Definition`,
/// `ShapeError::Descriptor`) and a collection member keyed `_error` that has
/// errors (`ShapeError::Input` with `SHAPECHECK_RESERVED_KEY`). Field failures
/// are data in the returned tree.
pub fn validate(
    entity: &JsonValue,
    schema: &Schema,
    params: Option<&JsonValue>,
) -> Result<ErrorTree, ShapeError> {
    validate_with_config(entity, schema, params, &EngineConfig::default())
}

pub fn validate_with_config(
    entity: &JsonValue,
    schema: &Schema,
    params: Option<&JsonValue>,
    config: &EngineConfig,
) -> Result<ErrorTree, ShapeError> {
    let runner = Runner {
        entity,
        params,
        report_unknown_properties: config.report_unknown_properties,
    };
    let errors = runner.validate_object("", Some(entity), schema.root(), Some(entity))?;
    log::debug!("validation finished with {} error(s)", errors.leaf_count());
    Ok(errors)
}

/// A member keyed `_error` would be hidden by the collection-level error.
fn insert_member(
    errors: &mut ErrorTree,
    path: &str,
    key: &str,
    error: ErrorNode,
) -> Result<(), ShapeError> {
    if matches!(&error, ErrorNode::Tree(tree) if tree.is_empty()) {
        return Ok(());
    }
    if key == COLLECTION_ERROR_KEY {
        return Err(ShapeError::Input {
            code: error_codes::RESERVED_KEY.to_string(),
            message: format!("member '{COLLECTION_ERROR_KEY}' of {path} cannot be reported"),
        });
    }
    errors.insert(key, error);
    Ok(())
}

fn members(collection: &JsonValue) -> Vec<(String, &JsonValue)> {
    match collection {
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        JsonValue::Object(map) => map.iter().map(|(key, item)| (key.clone(), item)).collect(),
        _ => Vec::new(),
    }
}

struct Runner<'a> {
    entity: &'a JsonValue,
    params: Option<&'a JsonValue>,
    report_unknown_properties: bool,
}

impl<'a> Runner<'a> {
    fn validate_object(
        &self,
        path: &str,
        object: Option<&'a JsonValue>,
        node: &SchemaNode,
        siblings: Option<&'a JsonValue>,
    ) -> Result<ErrorTree, ShapeError> {
        let fields = object.and_then(JsonValue::as_object);
        let mut errors = ErrorTree::new();

        for (name, entry) in node.iter() {
            let raw = fields.and_then(|map| map.get(name));
            let field_path = join_path(path, name);
            match entry {
                SchemaEntry::Property(definition) => {
                    if let Some(error) =
                        self.validate_property(&field_path, raw, definition, siblings)?
                    {
                        errors.insert_non_empty(name, error);
                    }
                }
                SchemaEntry::Group(child) => {
                    let group_errors = self.validate_object(&field_path, raw, child, raw)?;
                    errors.insert_non_empty(name, ErrorNode::Tree(group_errors));
                }
            }
        }

        if self.report_unknown_properties {
            for key in fields.into_iter().flat_map(|map| map.keys()) {
                if !node.contains(key) {
                    log::trace!("unknown property {}", join_path(path, key));
                    errors.insert(
                        key.clone(),
                        ErrorNode::Leaf(ValidationError::new(error_codes::UNKNOWN_PROPERTY)),
                    );
                }
            }
        }

        Ok(errors)
    }

    fn validate_property(
        &self,
        path: &str,
        raw: Option<&'a JsonValue>,
        definition: &PropertyDefinition,
        siblings: Option<&'a JsonValue>,
    ) -> Result<Option<ErrorNode>, ShapeError> {
        match definition.shape() {
            Shape::Scalar { validators } => {
                let error = self.run_checks(path, raw, definition, validators, siblings)?;
                log::trace!(
                    "field {path}: {}",
                    error.as_ref().map_or("ok", ValidationError::code)
                );
                Ok(error.map(ErrorNode::Leaf))
            }
            Shape::CollectionOfValues {
                item,
                collection_validators,
                ..
            } => {
                let mut errors =
                    self.collection_errors(path, raw, definition, collection_validators, siblings)?;
                if let Some(collection) = raw {
                    for (key, member) in members(collection) {
                        let member_path = join_path(path, &key);
                        if let Some(error) =
                            self.validate_property(&member_path, Some(member), item, raw)?
                        {
                            insert_member(&mut errors, path, &key, error)?;
                        }
                    }
                }
                Ok((!errors.is_empty()).then_some(ErrorNode::Tree(errors)))
            }
            Shape::CollectionOfObjects {
                fields,
                collection_validators,
                ..
            } => {
                let node = fields.compiled().ok_or_else(|| {
                    ShapeError::definition(
                        path,
                        "collection member fields were never compiled into a Schema",
                    )
                })?;
                let mut errors =
                    self.collection_errors(path, raw, definition, collection_validators, siblings)?;
                if let Some(collection) = raw {
                    for (key, member) in members(collection) {
                        let member_path = join_path(path, &key);
                        let member_errors =
                            self.validate_object(&member_path, Some(member), node, Some(member))?;
                        insert_member(&mut errors, path, &key, ErrorNode::Tree(member_errors))?;
                    }
                }
                Ok((!errors.is_empty()).then_some(ErrorNode::Tree(errors)))
            }
            Shape::LazyCollection { .. } => Err(ShapeError::definition(
                path,
                "collection item was never resolved into a Schema",
            )),
        }
    }

    /// Container-level chain; its error lands under `_error` and never
    /// suppresses member validation.
    fn collection_errors(
        &self,
        path: &str,
        raw: Option<&'a JsonValue>,
        definition: &PropertyDefinition,
        checks: &[Check],
        siblings: Option<&'a JsonValue>,
    ) -> Result<ErrorTree, ShapeError> {
        let mut errors = ErrorTree::new();
        if let Some(error) = self.run_checks(path, raw, definition, checks, siblings)? {
            log::trace!("collection {path}: {}", error.code());
            errors.set_collection_error(error);
        }
        Ok(errors)
    }

    fn run_checks(
        &self,
        path: &str,
        raw: Option<&'a JsonValue>,
        definition: &PropertyDefinition,
        checks: &[Check],
        siblings: Option<&'a JsonValue>,
    ) -> Result<Option<ValidationError>, ShapeError> {
        let ctx = ValidationContext::new(raw, definition.getter(), self.entity)
            .with_siblings(siblings)
            .with_params(self.params);
        run_chain(checks, &ctx, path)
    }
}
