//! # PROPERTY DEFINITIONS
//!
//! **CRITICAL**: A `PropertyDefinition` describes one field: its shape, its getter,
//! its rule chain and, for collections, the rules applied to the container.
//! **GUARANTEE**: The shape is fixed at construction and matched exhaustively by
//! both engines.

pub mod builders;

use crate::getters::Getter;
use crate::schema::{Schema, SchemaNode, SchemaTree};
use crate::validation::Check;
use std::fmt;
use std::sync::Arc;

pub use builders::{
    array_of, boolean, date, dictionary, number, number_with, object, string, string_with,
    NumberOptions, StringOptions,
};

/// **SHAPE CATEGORY**
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    CollectionOfValues,
    CollectionOfObjects,
    /// Item not produced yet; never found in a compiled `Schema`
    LazyCollection,
}

/// **CONTAINER KIND** - Which runtime collection a collection field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Array,
    Dictionary,
    /// Arrays and objects alike (hand-built collection definitions)
    Any,
}

impl Container {
    pub fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::Dictionary => value.is_object(),
            Self::Any => value.is_array() || value.is_object(),
        }
    }
}

/// **MEMBER SCHEMA OF A COLLECTION OF OBJECTS**
///
/// Holds the declared tree until `Schema` construction compiles it.
#[derive(Debug, Clone)]
pub struct ObjectFields(FieldsState);

#[derive(Debug, Clone)]
enum FieldsState {
    Declared(SchemaTree),
    Compiled(Arc<SchemaNode>),
}

impl ObjectFields {
    pub fn compiled(&self) -> Option<&SchemaNode> {
        match &self.0 {
            FieldsState::Compiled(node) => Some(node),
            FieldsState::Declared(_) => None,
        }
    }

    pub(crate) fn declared(&self) -> Option<&SchemaTree> {
        match &self.0 {
            FieldsState::Declared(tree) => Some(tree),
            FieldsState::Compiled(_) => None,
        }
    }

    pub(crate) fn from_node(node: Arc<SchemaNode>) -> Self {
        Self(FieldsState::Compiled(node))
    }
}

impl From<SchemaTree> for ObjectFields {
    fn from(tree: SchemaTree) -> Self {
        Self(FieldsState::Declared(tree))
    }
}

impl From<Schema> for ObjectFields {
    fn from(schema: Schema) -> Self {
        Self::from_node(schema.root_arc())
    }
}

/// **SHAPE WITH ITS PAYLOAD**
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar {
        validators: Vec<Check>,
    },
    CollectionOfValues {
        container: Container,
        item: Box<PropertyDefinition>,
        collection_validators: Vec<Check>,
    },
    CollectionOfObjects {
        container: Container,
        fields: ObjectFields,
        collection_validators: Vec<Check>,
    },
    /// Replaced by one of the collection shapes when the `Schema` is built.
    LazyCollection {
        container: Container,
        item: LazyItem,
        collection_validators: Vec<Check>,
    },
}

type ItemFn = dyn Fn() -> ItemSchema + Send + Sync;

/// **LAZY COLLECTION ITEM** - Called once, at `Schema` construction.
#[derive(Clone)]
pub struct LazyItem(Arc<ItemFn>);

impl LazyItem {
    pub(crate) fn resolve(&self) -> ItemSchema {
        (self.0)()
    }
}

impl fmt::Debug for LazyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyItem")
    }
}

/// **ITEM OF A COLLECTION BUILDER**
///
/// A single definition makes a collection of values; a tree or a `Schema`
/// makes a collection of objects. A lazy item decides when it is resolved.
#[derive(Debug, Clone)]
pub enum ItemSchema {
    Definition(PropertyDefinition),
    Fields(SchemaTree),
    Schema(Schema),
    Lazy(LazyItem),
}

impl ItemSchema {
    /// Item produced by `make` when the enclosing `Schema` is built.
    pub fn lazy(make: impl Fn() -> ItemSchema + Send + Sync + 'static) -> Self {
        Self::Lazy(LazyItem(Arc::new(make)))
    }
}

impl From<PropertyDefinition> for ItemSchema {
    fn from(definition: PropertyDefinition) -> Self {
        Self::Definition(definition)
    }
}

impl From<SchemaTree> for ItemSchema {
    fn from(tree: SchemaTree) -> Self {
        Self::Fields(tree)
    }
}

impl From<Schema> for ItemSchema {
    fn from(schema: Schema) -> Self {
        Self::Schema(schema)
    }
}

/// **PROPERTY DEFINITION**
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    shape: Shape,
    getter: Getter,
}

impl PropertyDefinition {
    /// **SCALAR CONSTRUCTOR**
    ///
    /// `type_guard`, when given, is placed before `validators`.
    pub fn scalar(
        getter: Getter,
        validators: impl IntoIterator<Item = Check>,
        type_guard: Option<Check>,
    ) -> Self {
        Self {
            shape: Shape::Scalar {
                validators: with_guard(type_guard, validators),
            },
            getter,
        }
    }

    /// **COLLECTION CONSTRUCTOR**
    ///
    /// The item decides the shape. The container guard, when given, is placed
    /// before `collection_validators`.
    pub fn collection(
        container: Container,
        item: impl Into<ItemSchema>,
        collection_validators: impl IntoIterator<Item = Check>,
        container_guard: Option<Check>,
    ) -> Self {
        let collection_validators = with_guard(container_guard, collection_validators);
        let shape = match item.into() {
            ItemSchema::Definition(item) => Shape::CollectionOfValues {
                container,
                item: Box::new(item),
                collection_validators,
            },
            ItemSchema::Fields(tree) => Shape::CollectionOfObjects {
                container,
                fields: tree.into(),
                collection_validators,
            },
            ItemSchema::Schema(schema) => Shape::CollectionOfObjects {
                container,
                fields: schema.into(),
                collection_validators,
            },
            ItemSchema::Lazy(item) => Shape::LazyCollection {
                container,
                item,
                collection_validators,
            },
        };
        Self {
            shape,
            getter: Getter::Identity,
        }
    }

    pub(crate) fn with_shape(&self, shape: Shape) -> Self {
        Self {
            shape,
            getter: self.getter.clone(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self.shape {
            Shape::Scalar { .. } => ValueKind::Scalar,
            Shape::CollectionOfValues { .. } => ValueKind::CollectionOfValues,
            Shape::CollectionOfObjects { .. } => ValueKind::CollectionOfObjects,
            Shape::LazyCollection { .. } => ValueKind::LazyCollection,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn getter(&self) -> &Getter {
        &self.getter
    }

    /// Scalar chain; empty for collections.
    pub fn validators(&self) -> &[Check] {
        match &self.shape {
            Shape::Scalar { validators } => validators,
            _ => &[],
        }
    }

    /// Container chain; `None` for scalars.
    pub fn collection_validators(&self) -> Option<&[Check]> {
        match &self.shape {
            Shape::Scalar { .. } => None,
            Shape::CollectionOfValues {
                collection_validators,
                ..
            }
            | Shape::CollectionOfObjects {
                collection_validators,
                ..
            }
            | Shape::LazyCollection {
                collection_validators,
                ..
            } => Some(collection_validators),
        }
    }

    pub fn container(&self) -> Option<Container> {
        match &self.shape {
            Shape::Scalar { .. } => None,
            Shape::CollectionOfValues { container, .. }
            | Shape::CollectionOfObjects { container, .. }
            | Shape::LazyCollection { container, .. } => Some(*container),
        }
    }
}

fn with_guard(guard: Option<Check>, checks: impl IntoIterator<Item = Check>) -> Vec<Check> {
    guard.into_iter().chain(checks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards;
    use crate::validation::rules::required;

    #[test]
    fn test_scalar_without_guard() {
        let definition = PropertyDefinition::scalar(Getter::Identity, Vec::new(), None);
        assert_eq!(definition.kind(), ValueKind::Scalar);
        assert!(definition.validators().is_empty());
        assert!(definition.collection_validators().is_none());
    }

    #[test]
    fn test_guard_is_prepended() {
        let definition =
            PropertyDefinition::scalar(Getter::String, [required()], Some(guards::string_guard()));
        let names: Vec<&str> = definition.validators().iter().map(Check::name).collect();
        assert_eq!(names, ["isOfTypeString", "required"]);
    }

    #[test]
    fn test_collection_kind_follows_item() {
        let values = PropertyDefinition::collection(
            Container::Any,
            PropertyDefinition::scalar(Getter::String, Vec::new(), None),
            Vec::new(),
            None,
        );
        assert_eq!(values.kind(), ValueKind::CollectionOfValues);
        assert_eq!(values.collection_validators().map(<[Check]>::len), Some(0));

        let objects =
            PropertyDefinition::collection(Container::Array, SchemaTree::new(), Vec::new(), None);
        assert_eq!(objects.kind(), ValueKind::CollectionOfObjects);
        assert!(matches!(objects.getter(), Getter::Identity));
    }

    #[test]
    fn test_lazy_item_waits_for_the_schema() {
        let lazy = PropertyDefinition::collection(
            Container::Array,
            ItemSchema::lazy(|| SchemaTree::new().into()),
            [required()],
            Some(guards::array_guard()),
        );
        assert_eq!(lazy.kind(), ValueKind::LazyCollection);
        assert_eq!(lazy.container(), Some(Container::Array));
        assert_eq!(lazy.collection_validators().map(<[Check]>::len), Some(2));
    }

    #[test]
    fn test_container_accepts() {
        use serde_json::json;
        assert!(Container::Array.accepts(&json!([])));
        assert!(!Container::Array.accepts(&json!({})));
        assert!(Container::Dictionary.accepts(&json!({})));
        assert!(Container::Any.accepts(&json!([])));
        assert!(!Container::Any.accepts(&json!("x")));
    }
}
