//! # SCHEMA
//!
//! **CRITICAL**: A `Schema` is the compiled, immutable field tree shared by
//! `validate` and `transform`.
//! **GUARANTEE**: Every leaf is classified at construction. A malformed leaf fails
//! here, with its dotted path, and never at validation time.
//! **CONCURRENCY**: Cloning is cheap (shared root) and the tree is `Send + Sync`.

mod declarative;
pub mod tree;

use crate::config::EngineConfig;
use crate::definition::{ObjectFields, PropertyDefinition, Shape};
use crate::errors::ShapeError;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub use tree::{RawEntry, SchemaTree};

/// **COMPILED ENTRY**
#[derive(Debug, Clone)]
pub enum SchemaEntry {
    Property(PropertyDefinition),
    /// Plain nested group; its fields see the group object as siblings
    Group(SchemaNode),
}

/// **COMPILED NODE** - Ordered mapping from field name to entry.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    entries: Vec<(String, SchemaEntry)>,
}

impl SchemaNode {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of property definitions, nested groups included.
    pub fn property_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, entry)| match entry {
                SchemaEntry::Property(_) => 1,
                SchemaEntry::Group(node) => node.property_count(),
            })
            .sum()
    }
}

/// **SCHEMA**
#[derive(Debug, Clone)]
pub struct Schema {
    root: Arc<SchemaNode>,
}

impl Schema {
    /// **CONSTRUCTOR** - Declarative leaves use the default configuration.
    pub fn new(tree: SchemaTree) -> Result<Self, ShapeError> {
        Self::with_config(tree, &EngineConfig::default())
    }

    pub fn with_config(tree: SchemaTree, config: &EngineConfig) -> Result<Self, ShapeError> {
        let root = Compiler { config }.compile_tree(&tree, "")?;
        log::debug!(
            "compiled schema: {} top-level fields, {} properties",
            root.len(),
            root.property_count()
        );
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// **DECLARATIVE CONSTRUCTOR**
    ///
    /// Builds a schema from a JSON document (`{"name": {"type": "string",
    /// "rules": ["required"]}, "age": "number"}`).
    pub fn from_json(document: &JsonValue, config: &EngineConfig) -> Result<Self, ShapeError> {
        let tree = declarative::tree_from_document(document)?;
        Self::with_config(tree, config)
    }

    pub fn from_json_str(text: &str, config: &EngineConfig) -> Result<Self, ShapeError> {
        let document: JsonValue = serde_json::from_str(text)
            .map_err(|e| ShapeError::definition("", format!("schema is not valid JSON: {e}")))?;
        Self::from_json(&document, config)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub(crate) fn root_arc(&self) -> Arc<SchemaNode> {
        Arc::clone(&self.root)
    }

    /// Property definition at a dotted path through plain groups.
    pub fn property(&self, path: &str) -> Option<&PropertyDefinition> {
        let mut node: &SchemaNode = &self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match node.get(segment)? {
                SchemaEntry::Group(child) => node = child,
                SchemaEntry::Property(definition) if segments.peek().is_none() => {
                    return Some(definition)
                }
                SchemaEntry::Property(_) => return None,
            }
        }
        None
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

struct Compiler<'c> {
    config: &'c EngineConfig,
}

impl Compiler<'_> {
    fn compile_tree(&self, tree: &SchemaTree, path: &str) -> Result<SchemaNode, ShapeError> {
        let entries = tree
            .entries()
            .iter()
            .map(|(name, entry)| {
                let entry_path = join_path(path, name);
                self.compile_entry(entry, &entry_path)
                    .map(|compiled| (name.clone(), compiled))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaNode { entries })
    }

    fn compile_entry(&self, entry: &RawEntry, path: &str) -> Result<SchemaEntry, ShapeError> {
        match entry {
            RawEntry::Definition(definition) => {
                self.compile_definition(definition, path).map(SchemaEntry::Property)
            }
            RawEntry::Group(tree) => self.compile_tree(tree, path).map(SchemaEntry::Group),
            RawEntry::Schema(schema) => Ok(SchemaEntry::Group(schema.root().clone())),
            RawEntry::Lazy(make) => self.compile_entry(&make(), path),
            RawEntry::Declared(value) => {
                let resolved = declarative::entry_from_json(value, path, self.config)?;
                self.compile_entry(&resolved, path)
            }
        }
    }

    fn compile_definition(
        &self,
        definition: &PropertyDefinition,
        path: &str,
    ) -> Result<PropertyDefinition, ShapeError> {
        match definition.shape() {
            Shape::Scalar { .. } => Ok(definition.clone()),
            Shape::CollectionOfValues {
                container,
                item,
                collection_validators,
            } => Ok(definition.with_shape(Shape::CollectionOfValues {
                container: *container,
                item: Box::new(self.compile_definition(item, path)?),
                collection_validators: collection_validators.clone(),
            })),
            Shape::CollectionOfObjects {
                container,
                fields,
                collection_validators,
            } => match fields.declared() {
                Some(tree) => {
                    let node = self.compile_tree(tree, path)?;
                    Ok(definition.with_shape(Shape::CollectionOfObjects {
                        container: *container,
                        fields: ObjectFields::from_node(Arc::new(node)),
                        collection_validators: collection_validators.clone(),
                    }))
                }
                None => Ok(definition.clone()),
            },
            Shape::LazyCollection {
                container,
                item,
                collection_validators,
            } => {
                let resolved = PropertyDefinition::collection(
                    *container,
                    item.resolve(),
                    collection_validators.clone(),
                    None,
                );
                self.compile_definition(&resolved, path)
            }
        }
    }
}
