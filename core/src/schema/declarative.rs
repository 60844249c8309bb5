//! Declarative (JSON) schema documents.
//!
//! Leaves: a type name (`"string"`), a typed leaf (`{"type": "number",
//! "rules": [...]}`) or a collection (`{"arrayOf": <item>}`,
//! `{"dictionary": <item>}`). Any other object is a nested group.

use super::tree::{RawEntry, SchemaTree};
use crate::config::EngineConfig;
use crate::definition::{
    array_of, boolean, date, dictionary, number_with, object, string_with, ItemSchema,
    NumberOptions, StringOptions,
};
use crate::errors::ShapeError;
use crate::validation::rules;
use crate::validation::Check;
use serde_json::{Map, Value as JsonValue};

const TYPED_LEAF_KEYS: [&str; 4] = ["type", "rules", "trim", "replaceComma"];
const COLLECTION_KEYS: [&str; 3] = ["arrayOf", "dictionary", "rules"];

pub(super) fn tree_from_document(document: &JsonValue) -> Result<SchemaTree, ShapeError> {
    match document {
        JsonValue::Object(map) => Ok(tree_from_map(map)),
        _ => Err(ShapeError::definition("", "schema must be a valid schema object")),
    }
}

fn tree_from_map(map: &Map<String, JsonValue>) -> SchemaTree {
    map.iter().fold(SchemaTree::new(), |tree, (name, value)| {
        tree.field(name.clone(), RawEntry::Declared(value.clone()))
    })
}

/// `{"type": "<name>", ...}` with only typed-leaf keys. Any other key makes
/// the object a group, so a group may hold a field named `type`.
fn is_typed_leaf(map: &Map<String, JsonValue>) -> bool {
    map.get("type").is_some_and(JsonValue::is_string) && only_keys(map, &TYPED_LEAF_KEYS)
}

/// Exactly one of `arrayOf`/`dictionary`, plus optional `rules`.
fn is_collection(map: &Map<String, JsonValue>) -> bool {
    map.contains_key("arrayOf") != map.contains_key("dictionary")
        && only_keys(map, &COLLECTION_KEYS)
}

fn only_keys(map: &Map<String, JsonValue>, allowed: &[&str]) -> bool {
    map.keys().all(|key| allowed.contains(&key.as_str()))
}

pub(super) fn entry_from_json(
    value: &JsonValue,
    path: &str,
    config: &EngineConfig,
) -> Result<RawEntry, ShapeError> {
    match value {
        JsonValue::String(type_name) => {
            scalar(type_name, Vec::new(), config.string_options(), config.number_options(), path)
                .map(RawEntry::Definition)
        }
        JsonValue::Object(map) if is_typed_leaf(map) => typed_leaf(map, path, config),
        JsonValue::Object(map) if is_collection(map) => collection(map, path, config),
        JsonValue::Object(map) => Ok(RawEntry::Group(tree_from_map(map))),
        _ => Err(ShapeError::definition(
            path,
            "Expect an object or a type name (ex.: \"string\", \"number\") in schema",
        )),
    }
}

fn bool_option(
    map: &Map<String, JsonValue>,
    key: &str,
    default: bool,
    path: &str,
) -> Result<bool, ShapeError> {
    match map.get(key) {
        None => Ok(default),
        Some(JsonValue::Bool(flag)) => Ok(*flag),
        Some(_) => Err(ShapeError::definition(path, format!("'{key}' must be a boolean"))),
    }
}

fn scalar(
    type_name: &str,
    checks: Vec<Check>,
    string_options: StringOptions,
    number_options: NumberOptions,
    path: &str,
) -> Result<crate::definition::PropertyDefinition, ShapeError> {
    match type_name {
        "string" => Ok(string_with(checks, string_options)),
        "number" => Ok(number_with(checks, number_options)),
        "date" => Ok(date(checks)),
        "boolean" => Ok(boolean(checks)),
        "object" => Ok(object(checks)),
        other => Err(ShapeError::definition(path, format!("unknown type '{other}'"))),
    }
}

fn typed_leaf(
    map: &Map<String, JsonValue>,
    path: &str,
    config: &EngineConfig,
) -> Result<RawEntry, ShapeError> {
    let type_name = map.get("type").and_then(JsonValue::as_str).unwrap_or_default();
    let string_options = StringOptions {
        use_trim: bool_option(map, "trim", config.use_trim, path)?,
    };
    let number_options = NumberOptions {
        replace_comma: bool_option(map, "replaceComma", config.replace_comma, path)?,
    };
    let checks = parse_rules(map.get("rules"), path)?;
    scalar(type_name, checks, string_options, number_options, path).map(RawEntry::Definition)
}

fn collection(
    map: &Map<String, JsonValue>,
    path: &str,
    config: &EngineConfig,
) -> Result<RawEntry, ShapeError> {
    let (is_array, item) = match (map.get("arrayOf"), map.get("dictionary")) {
        (Some(item), None) => (true, item),
        (None, Some(item)) => (false, item),
        _ => {
            return Err(ShapeError::definition(
                path,
                "a collection declares exactly one of 'arrayOf' or 'dictionary'",
            ));
        }
    };
    let item = match item {
        JsonValue::Object(fields) if !is_typed_leaf(fields) && !is_collection(fields) => {
            ItemSchema::Fields(tree_from_map(fields))
        }
        JsonValue::Object(_) | JsonValue::String(_) => match entry_from_json(item, path, config)? {
            RawEntry::Definition(definition) => ItemSchema::Definition(definition),
            _ => {
                return Err(ShapeError::definition(
                    path,
                    "collection item must be a type or an object",
                ));
            }
        },
        _ => {
            return Err(ShapeError::definition(
                path,
                "expect a type (ex.: \"string\", \"number\") or an object of the \
                 expected properties as collection item",
            ));
        }
    };
    let checks = parse_rules(map.get("rules"), path)?;
    let definition = if is_array {
        array_of(item, checks)
    } else {
        dictionary(item, checks)
    };
    Ok(RawEntry::Definition(definition))
}

fn parse_rules(rules: Option<&JsonValue>, path: &str) -> Result<Vec<Check>, ShapeError> {
    match rules {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items.iter().map(|rule| parse_rule(rule, path)).collect(),
        Some(_) => Err(ShapeError::definition(path, "'rules' must be an array")),
    }
}

fn parse_rule(rule: &JsonValue, path: &str) -> Result<Check, ShapeError> {
    match rule {
        JsonValue::String(name) => match name.as_str() {
            "required" => Ok(rules::required()),
            "email" => Ok(rules::is_email()),
            "integer" => Ok(rules::is_integer()),
            "positive" => Ok(rules::is_positive()),
            "negative" => Ok(rules::is_negative()),
            other => Err(ShapeError::definition(path, format!("unknown rule '{other}'"))),
        },
        JsonValue::Object(map) if map.len() == 1 => {
            let Some((name, argument)) = map.iter().next() else {
                return Err(ShapeError::definition(path, "empty rule object"));
            };
            parse_rule_with_argument(name, argument, path)
        }
        _ => Err(ShapeError::definition(
            path,
            "a rule is a name or a single-key object holding its argument",
        )),
    }
}

fn parse_rule_with_argument(
    name: &str,
    argument: &JsonValue,
    path: &str,
) -> Result<Check, ShapeError> {
    let bad_argument = |expected: &str| {
        ShapeError::definition(path, format!("rule '{name}' expects {expected}"))
    };
    let number = || argument.as_f64().ok_or_else(|| bad_argument("a number"));
    let length = || {
        argument
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| bad_argument("a non-negative integer"))
    };
    let field = || argument.as_str().ok_or_else(|| bad_argument("a field name"));

    match name {
        "minLength" => Ok(rules::min_length(length()?)),
        "maxLength" => Ok(rules::max_length(length()?)),
        "gt" => Ok(rules::number_gt(number()?)),
        "gte" => Ok(rules::number_gte(number()?)),
        "lt" => Ok(rules::number_lt(number()?)),
        "lte" => Ok(rules::number_lte(number()?)),
        "withinRange" => {
            let bounds = argument
                .as_array()
                .filter(|bounds| bounds.len() == 2)
                .and_then(|bounds| Some((bounds[0].as_f64()?, bounds[1].as_f64()?)))
                .ok_or_else(|| bad_argument("[min, max]"))?;
            rules::number_within_range(bounds.0, bounds.1).map_err(|e| match e {
                ShapeError::Definition { message, .. } => ShapeError::definition(path, message),
                other => other,
            })
        }
        "gtField" | "gteField" | "ltField" | "lteField" | "equalToField" => {
            let (other, label) = match argument {
                JsonValue::String(other) => (other.as_str(), None),
                JsonValue::Object(spec) => (
                    spec.get("field")
                        .and_then(JsonValue::as_str)
                        .ok_or_else(|| bad_argument("a field name or {\"field\", \"label\"}"))?,
                    spec.get("label").and_then(JsonValue::as_str),
                ),
                _ => return Err(bad_argument("a field name or {\"field\", \"label\"}")),
            };
            Ok(match name {
                "gtField" => rules::number_gt_field(other, label),
                "gteField" => rules::number_gte_to_field(other, label),
                "ltField" => rules::number_lt_field(other, label),
                "lteField" => rules::number_lte_to_field(other, label),
                _ => rules::number_equal_to_field(other, label),
            })
        }
        "requiredIf" => Ok(rules::required_if_other_field_is_true(field()?)),
        "requiredIfNot" => Ok(rules::required_if_other_field_is_false(field()?)),
        "requiredIfEmpty" => Ok(rules::required_if_other_field_is_empty(field()?)),
        "requiredIfGiven" => Ok(rules::required_if_other_field_is_given(field()?)),
        "requiredIfEquals" => match argument.as_array().map(Vec::as_slice) {
            Some([JsonValue::String(other), JsonValue::Array(expected)]) => Ok(
                rules::required_if_other_field_equals(other.as_str(), expected.iter().cloned()),
            ),
            Some([JsonValue::String(other), expected]) => Ok(
                rules::required_if_other_field_equals(other.as_str(), [expected.clone()]),
            ),
            _ => Err(bad_argument("[fieldName, expectedValue]")),
        },
        other => Err(ShapeError::definition(path, format!("unknown rule '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ValueKind;
    use crate::getters::Getter;
    use crate::schema::Schema;
    use serde_json::json;

    fn definition_error_path(document: JsonValue) -> String {
        match Schema::from_json(&document, &EngineConfig::default()) {
            Err(ShapeError::Definition { path, .. }) => path,
            other => panic!("expected definition error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_names_and_groups() {
        let schema = Schema::from_json(
            &json!({
                "name": "string",
                "age": {"type": "number", "rules": ["required", {"gte": 0}]},
                "address": {"city": "string", "since": "date"}
            }),
            &EngineConfig::default(),
        )
        .unwrap();
        let age = schema.property("age").unwrap();
        let names: Vec<&str> = age.validators().iter().map(Check::name).collect();
        assert_eq!(names, ["isNumber", "required", "numberGte"]);
        assert!(schema.property("address.since").is_some());
    }

    #[test]
    fn test_config_drives_default_options() {
        let config = EngineConfig {
            use_trim: false,
            replace_comma: false,
            ..EngineConfig::default()
        };
        let schema = Schema::from_json(
            &json!({"name": "string", "code": {"type": "string", "trim": true}, "price": "number"}),
            &config,
        )
        .unwrap();
        assert!(matches!(schema.property("name").unwrap().getter(), Getter::String));
        assert!(matches!(schema.property("code").unwrap().getter(), Getter::TrimmedString));
        assert!(matches!(schema.property("price").unwrap().getter(), Getter::Number));
    }

    #[test]
    fn test_collections() {
        let schema = Schema::from_json(
            &json!({
                "scores": {"arrayOf": "number", "rules": [{"minLength": 1}]},
                "friends": {"dictionary": {"name": {"type": "string", "rules": ["required"]}}}
            }),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(schema.property("scores").unwrap().kind(), ValueKind::CollectionOfValues);
        assert_eq!(schema.property("friends").unwrap().kind(), ValueKind::CollectionOfObjects);
    }

    #[test]
    fn test_non_object_document_rejected() {
        assert_eq!(definition_error_path(json!(["string"])), "");
    }

    #[test]
    fn test_bad_leaves_name_their_path() {
        assert_eq!(definition_error_path(json!({"test": "no"})), "test");
        assert_eq!(
            definition_error_path(json!({"student": {"name": {"city": 44}}})),
            "student.name.city"
        );
        assert_eq!(definition_error_path(json!({"scores": {"arrayOf": 5}})), "scores");
        assert_eq!(
            definition_error_path(json!({
                "friends": {"dictionary": {"age": {"type": "number", "rules": ["bogus"]}}}
            })),
            "friends.age"
        );
    }

    #[test]
    fn test_rule_argument_errors() {
        assert_eq!(
            definition_error_path(json!({
                "age": {"type": "number", "rules": [{"withinRange": [9, 1]}]}
            })),
            "age"
        );
        assert_eq!(
            definition_error_path(json!({
                "name": {"type": "string", "rules": [{"minLength": "3"}]}
            })),
            "name"
        );
        // An extra key turns the object into a group; "Name" is then a type name.
        assert_eq!(
            definition_error_path(json!({"name": {"type": "string", "label": "Name"}})),
            "name.label"
        );
    }

    #[test]
    fn test_group_with_a_type_field() {
        let schema = Schema::from_json(
            &json!({"vehicle": {"type": "string", "wheels": "number"}}),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(schema.property("vehicle.type").unwrap().kind(), ValueKind::Scalar);
        assert!(matches!(
            schema.property("vehicle.wheels").unwrap().getter(),
            Getter::FriendlyNumber
        ));
        assert!(schema.property("vehicle").is_none());
    }

    #[test]
    fn test_group_with_collection_keyword_fields() {
        let schema = Schema::from_json(
            &json!({
                "listing": {"arrayOf": "string", "title": "string"},
                "index": {"arrayOf": "string", "dictionary": "number"}
            }),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(schema.property("listing.arrayOf").unwrap().kind(), ValueKind::Scalar);
        assert!(schema.property("listing.title").is_some());
        assert!(schema.property("index.dictionary").is_some());
    }

    #[test]
    fn test_conditional_rules_parse() {
        let schema = Schema::from_json(
            &json!({
                "phone": {"type": "string", "rules": [
                    {"requiredIf": "canCall"},
                    {"requiredIfEquals": ["contact", ["phone", "sms"]]},
                    {"lteField": {"field": "max", "label": "Maximum"}}
                ]}
            }),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(schema.property("phone").unwrap().validators().len(), 4);
    }
}
