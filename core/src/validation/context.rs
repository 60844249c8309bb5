//! # VALIDATION CONTEXT AND CHECKS
//!
//! **CRITICAL**: One context shape for every rule: value, getter, siblings, entity, params.
//! **MANDATE**: Rules are pure. Rule panics are not caught by the engine.

use crate::errors::ShapeError;
use crate::getters::{parse_decimal, Getter};
use crate::types::FieldValue;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// **VALIDATION CONTEXT**
///
/// **PURPOSE**: Everything a rule may inspect for the field under validation.
/// **LIFETIME**: Built per field, dropped as soon as the field's chain has run.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    /// Raw value as found on the entity (`None` = absent)
    pub raw: Option<&'a JsonValue>,

    /// Getter-normalized value
    pub value: FieldValue,

    pub getter: &'a Getter,

    /// Object (or collection) literally enclosing the field
    pub siblings: Option<&'a JsonValue>,

    /// Root entity of the current `validate` call
    pub entity: &'a JsonValue,

    /// Opaque caller data
    pub params: Option<&'a JsonValue>,
}

impl<'a> ValidationContext<'a> {
    /// **CONSTRUCTOR** - Normalizes `raw` through `getter` once.
    pub fn new(raw: Option<&'a JsonValue>, getter: &'a Getter, entity: &'a JsonValue) -> Self {
        Self {
            raw,
            value: getter.apply(raw),
            getter,
            siblings: None,
            entity,
            params: None,
        }
    }

    pub fn with_siblings(mut self, siblings: Option<&'a JsonValue>) -> Self {
        self.siblings = siblings;
        self
    }

    pub fn with_params(mut self, params: Option<&'a JsonValue>) -> Self {
        self.params = params;
        self
    }

    /// **SIBLING LOOKUP** - Object key, or array index when siblings is a collection.
    pub fn sibling(&self, name: &str) -> Option<&'a JsonValue> {
        match self.siblings? {
            JsonValue::Object(map) => map.get(name),
            JsonValue::Array(items) => name.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        }
    }

    /// Re-derive the normalized value from the raw one with this field's getter.
    pub fn normalized(&self) -> FieldValue {
        self.getter.apply(self.raw)
    }

    /// **NUMERIC VIEW**
    ///
    /// `None` for empty or non-numeric values, so comparison rules stay
    /// silent and leave the type guard to report the problem.
    pub fn number(&self) -> Option<f64> {
        numeric(&self.value)
    }

    /// Sibling normalized with this field's getter, as a number.
    pub fn sibling_number(&self, name: &str) -> Option<f64> {
        numeric(&self.getter.apply(self.sibling(name)))
    }

    pub fn raw_or_null(&self) -> JsonValue {
        self.raw.cloned().unwrap_or(JsonValue::Null)
    }
}

fn numeric(value: &FieldValue) -> Option<f64> {
    let number = match value {
        FieldValue::Text(text) if !text.trim().is_empty() => {
            parse_decimal(&text.trim().replacen(',', ".", 1))
        }
        other => other.as_f64()?,
    };
    (!number.is_nan()).then_some(number)
}

/// **ERROR DESCRIPTOR**
///
/// Every error leaf has this shape: `{"error": code, "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub error: String,
    pub params: Map<String, JsonValue>,
}

impl ValidationError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            error: code.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.error
    }

    /// **DESCRIPTOR PARSING**
    ///
    /// Accepts a bare code string or an object holding exactly `error` and an
    /// optional `params` object. Anything else is a rule contract violation.
    pub fn from_descriptor(descriptor: JsonValue) -> Result<Self, String> {
        match descriptor {
            JsonValue::String(code) => Ok(Self::new(code)),
            JsonValue::Object(mut map) => {
                if let Some(extra) = map.keys().find(|key| *key != "error" && *key != "params") {
                    return Err(format!("unexpected key '{extra}' in error descriptor"));
                }
                let code = match map.remove("error") {
                    Some(JsonValue::String(code)) => code,
                    Some(_) => return Err("'error' must be a string".to_string()),
                    None => return Err("error descriptor has no 'error' key".to_string()),
                };
                let params = match map.remove("params") {
                    None | Some(JsonValue::Null) => Map::new(),
                    Some(JsonValue::Object(params)) => params,
                    Some(_) => return Err("'params' must be an object".to_string()),
                };
                Ok(Self { error: code, params })
            }
            other => Err(format!("error descriptor must be a string or an object, got {other}")),
        }
    }
}

type TypedRule = dyn Fn(&ValidationContext<'_>) -> Option<ValidationError> + Send + Sync;
type DescriptorRule = dyn Fn(&ValidationContext<'_>) -> Option<JsonValue> + Send + Sync;

#[derive(Clone)]
enum Rule {
    Typed(Arc<TypedRule>),
    Descriptor(Arc<DescriptorRule>),
}

/// **VALIDATOR FUNCTION**
///
/// A named rule in a validator chain. `None` means the value passes.
#[derive(Clone)]
pub struct Check {
    name: Cow<'static, str>,
    rule: Rule,
}

impl Check {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, rule: F) -> Self
    where
        F: Fn(&ValidationContext<'_>) -> Option<ValidationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Rule::Typed(Arc::new(rule)),
        }
    }

    /// **UNTYPED RULE**
    ///
    /// For rules producing raw JSON descriptors (e.g. bridged from a rules
    /// file). Malformed descriptors abort the `validate` call with
    /// [`ShapeError::Descriptor`].
    pub fn descriptor<F>(name: impl Into<Cow<'static, str>>, rule: F) -> Self
    where
        F: Fn(&ValidationContext<'_>) -> Option<JsonValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: Rule::Descriptor(Arc::new(rule)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn run(
        &self,
        ctx: &ValidationContext<'_>,
        path: &str,
    ) -> Result<Option<ValidationError>, ShapeError> {
        match &self.rule {
            Rule::Typed(rule) => Ok(rule(ctx)),
            Rule::Descriptor(rule) => rule(ctx)
                .map(|descriptor| {
                    ValidationError::from_descriptor(descriptor).map_err(|message| {
                        ShapeError::descriptor(path, format!("rule '{}': {message}", self.name))
                    })
                })
                .transpose(),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check({})", self.name)
    }
}

/// Run a chain, stopping at the first failing rule.
pub(crate) fn run_chain(
    checks: &[Check],
    ctx: &ValidationContext<'_>,
    path: &str,
) -> Result<Option<ValidationError>, ShapeError> {
    for check in checks {
        if let Some(error) = check.run(ctx, path)? {
            return Ok(Some(error));
        }
    }
    Ok(None)
}
