//! # TRANSFORM ENGINE
//!
//! **CRITICAL**: Same walk as validation, applying getters instead of rules.
//! **GUARANTEE**: Never fails. Keys absent from the schema and collections of
//! the wrong container kind are copied through untouched.

use crate::definition::{PropertyDefinition, Shape};
use crate::schema::{Schema, SchemaEntry, SchemaNode};
use serde_json::{Map, Value as JsonValue};

/// **TRANSFORM** - New entity with every schema field normalized by its getter.
pub fn transform(entity: &JsonValue, schema: &Schema) -> JsonValue {
    let transformed = transform_object(entity, schema.root());
    log::debug!("transformed entity against {} fields", schema.root().len());
    transformed
}

fn transform_object(object: &JsonValue, node: &SchemaNode) -> JsonValue {
    let JsonValue::Object(fields) = object else {
        return object.clone();
    };
    let transformed: Map<String, JsonValue> = fields
        .iter()
        .map(|(name, value)| {
            let value = match node.get(name) {
                Some(SchemaEntry::Property(definition)) => transform_property(value, definition),
                Some(SchemaEntry::Group(child)) => transform_object(value, child),
                None => value.clone(),
            };
            (name.clone(), value)
        })
        .collect();
    JsonValue::Object(transformed)
}

fn transform_property(value: &JsonValue, definition: &PropertyDefinition) -> JsonValue {
    match definition.shape() {
        Shape::Scalar { .. } => definition.getter().apply(Some(value)).to_json(),
        Shape::CollectionOfValues { container, item, .. } if container.accepts(value) => {
            map_members(value, |member| transform_property(member, item))
        }
        Shape::CollectionOfObjects {
            container, fields, ..
        } if container.accepts(value) => match fields.compiled() {
            Some(node) => map_members(value, |member| transform_object(member, node)),
            None => value.clone(),
        },
        Shape::CollectionOfValues { .. }
        | Shape::CollectionOfObjects { .. }
        | Shape::LazyCollection { .. } => value.clone(),
    }
}

fn map_members(
    collection: &JsonValue,
    mut map: impl FnMut(&JsonValue) -> JsonValue,
) -> JsonValue {
    match collection {
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(&mut map).collect()),
        JsonValue::Object(members) => JsonValue::Object(
            members
                .iter()
                .map(|(key, member)| (key.clone(), map(member)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{
        array_of, boolean, date, dictionary, number, number_with, string, NumberOptions,
    };
    use crate::schema::SchemaTree;
    use serde_json::json;

    fn schema(tree: SchemaTree) -> Schema {
        Schema::new(tree).unwrap()
    }

    #[test]
    fn test_string_is_trimmed() {
        let schema = schema(SchemaTree::new().field("name", string([])));
        assert_eq!(transform(&json!({"name": "  Joe  "}), &schema), json!({"name": "Joe"}));
    }

    #[test]
    fn test_scalars_are_coerced() {
        let schema = schema(
            SchemaTree::new()
                .field("age", number([]))
                .field("price", number([]))
                .field("strict", number_with([], NumberOptions { replace_comma: false }))
                .field("active", boolean([]))
                .field("born", date([])),
        );
        let entity = json!({
            "age": "35",
            "price": "34,55",
            "strict": "34,55",
            "active": "true",
            "born": "2020-02-01T10:00:00Z"
        });
        assert_eq!(
            transform(&entity, &schema),
            json!({
                "age": 35,
                "price": 34.55,
                "strict": null,
                "active": true,
                "born": "2020-02-01T10:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let schema = schema(SchemaTree::new().field("name", string([])));
        let entity = json!({"name": " a ", "extra": {"deep": [1, 2]}});
        assert_eq!(
            transform(&entity, &schema),
            json!({"name": "a", "extra": {"deep": [1, 2]}})
        );
    }

    #[test]
    fn test_missing_fields_are_not_added() {
        let schema = schema(SchemaTree::new().field("name", string([])).field("age", number([])));
        assert_eq!(transform(&json!({"age": "1"}), &schema), json!({"age": 1}));
    }

    #[test]
    fn test_groups_and_collections() {
        let schema = schema(
            SchemaTree::new()
                .group("student", SchemaTree::new().field("name", string([])))
                .field("scores", array_of(number([]), []))
                .field(
                    "friends",
                    dictionary(SchemaTree::new().field("age", number([])), []),
                ),
        );
        let entity = json!({
            "student": {"name": " Ann ", "nick": " A "},
            "scores": ["1", "2,5"],
            "friends": {"bob": {"age": "30"}}
        });
        assert_eq!(
            transform(&entity, &schema),
            json!({
                "student": {"name": "Ann", "nick": " A "},
                "scores": [1, 2.5],
                "friends": {"bob": {"age": 30}}
            })
        );
    }

    #[test]
    fn test_container_mismatch_passes_through() {
        let schema = schema(
            SchemaTree::new()
                .field("scores", array_of(number([]), []))
                .field("friends", array_of(SchemaTree::new().field("age", number([])), [])),
        );
        let entity = json!({"scores": {"a": "1"}, "friends": "none"});
        assert_eq!(transform(&entity, &schema), entity);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let schema = schema(SchemaTree::new().field("name", string([])));
        let entity = json!({"name": " x "});
        let _ = transform(&entity, &schema);
        assert_eq!(entity, json!({"name": " x "}));
    }
}
