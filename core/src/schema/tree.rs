use super::Schema;
use crate::definition::PropertyDefinition;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

type LazyEntry = dyn Fn() -> RawEntry + Send + Sync;

/// **DECLARED SCHEMA ENTRY**
///
/// Anything accepted at a schema position before classification.
#[derive(Clone)]
pub enum RawEntry {
    Definition(PropertyDefinition),
    Group(SchemaTree),
    Schema(Schema),
    /// Resolved exactly once, when the `Schema` is built
    Lazy(Arc<LazyEntry>),
    /// Declarative JSON leaf or group (see `Schema::from_json`)
    Declared(JsonValue),
}

impl fmt::Debug for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definition(definition) => f.debug_tuple("Definition").field(definition).finish(),
            Self::Group(tree) => f.debug_tuple("Group").field(tree).finish(),
            Self::Schema(schema) => f.debug_tuple("Schema").field(schema).finish(),
            Self::Lazy(_) => f.write_str("Lazy"),
            Self::Declared(value) => f.debug_tuple("Declared").field(value).finish(),
        }
    }
}

impl From<PropertyDefinition> for RawEntry {
    fn from(definition: PropertyDefinition) -> Self {
        Self::Definition(definition)
    }
}

impl From<SchemaTree> for RawEntry {
    fn from(tree: SchemaTree) -> Self {
        Self::Group(tree)
    }
}

impl From<Schema> for RawEntry {
    fn from(schema: Schema) -> Self {
        Self::Schema(schema)
    }
}

impl From<JsonValue> for RawEntry {
    fn from(value: JsonValue) -> Self {
        Self::Declared(value)
    }
}

/// **SCHEMA DECLARATION**
///
/// Ordered field list; order is the traversal order of both engines.
#[derive(Debug, Clone, Default)]
pub struct SchemaTree {
    entries: Vec<(String, RawEntry)>,
}

impl SchemaTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a field.
    pub fn field(mut self, name: impl Into<String>, entry: impl Into<RawEntry>) -> Self {
        let name = name.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
        self
    }

    pub fn group(self, name: impl Into<String>, tree: SchemaTree) -> Self {
        self.field(name, RawEntry::Group(tree))
    }

    /// Field whose definition is produced on demand at `Schema` construction.
    pub fn lazy<F>(self, name: impl Into<String>, make: F) -> Self
    where
        F: Fn() -> RawEntry + Send + Sync + 'static,
    {
        self.field(name, RawEntry::Lazy(Arc::new(make)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, RawEntry)] {
        &self.entries
    }
}
