//! # ERROR TREE
//!
//! Nested error map mirroring the entity. An absent key means no error on
//! that path; `_error` holds the collection-level error of a collection field.
//! Children keep insertion order, which is the traversal order of `validate`.

use super::context::ValidationError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

/// Reserved key for collection-level errors. A collection member with this
/// key cannot be reported; `validate` fails with `SHAPECHECK_RESERVED_KEY`
/// when such a member has errors.
pub const COLLECTION_ERROR_KEY: &str = "_error";

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorNode {
    Leaf(ValidationError),
    Tree(ErrorTree),
}

impl ErrorNode {
    pub fn as_leaf(&self) -> Option<&ValidationError> {
        match self {
            Self::Leaf(error) => Some(error),
            Self::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Tree(tree) => tree.leaf_count(),
        }
    }
}

/// **ERROR TREE**
///
/// An empty tree is the "no errors" result; it is never replaced by `None`.
/// Equality compares children in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorTree {
    collection_error: Option<ValidationError>,
    children: Vec<(String, ErrorNode)>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.collection_error.is_none() && self.children.is_empty()
    }

    /// Append `node`, or replace it in place when `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, node: ErrorNode) {
        let key = key.into();
        match self.children.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = node,
            None => self.children.push((key, node)),
        }
    }

    /// Insert `node` unless it is an empty subtree.
    pub(crate) fn insert_non_empty(&mut self, key: &str, node: ErrorNode) {
        if !matches!(&node, ErrorNode::Tree(tree) if tree.is_empty()) {
            self.insert(key, node);
        }
    }

    pub fn set_collection_error(&mut self, error: ValidationError) {
        self.collection_error = Some(error);
    }

    pub fn collection_error(&self) -> Option<&ValidationError> {
        self.collection_error.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&ErrorNode> {
        self.children
            .iter()
            .find_map(|(existing, node)| (existing == key).then_some(node))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorNode)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// **PATH LOOKUP** - Error leaf at a dotted path (`"addresses.1.streetName"`,
    /// `"scores._error"`).
    pub fn error_at(&self, path: &str) -> Option<&ValidationError> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (self.subtree(parent)?, last),
            None => (self, path),
        };
        if last == COLLECTION_ERROR_KEY && parent.collection_error.is_some() {
            return parent.collection_error();
        }
        parent.get(last)?.as_leaf()
    }

    /// Subtree at a dotted path; the empty path is the tree itself.
    pub fn subtree(&self, path: &str) -> Option<&ErrorTree> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |tree, segment| tree.get(segment)?.as_tree())
    }

    /// Number of error leaves, collection-level errors included.
    pub fn leaf_count(&self) -> usize {
        usize::from(self.collection_error.is_some())
            + self
                .children
                .iter()
                .map(|(_, node)| node.leaf_count())
                .sum::<usize>()
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl Serialize for ErrorNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(error) => error.serialize(serializer),
            Self::Tree(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(self.collection_error.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(error) = &self.collection_error {
            map.serialize_entry(COLLECTION_ERROR_KEY, error)?;
        }
        for (key, node) in &self.children {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ErrorTree {
        let mut member = ErrorTree::new();
        member.insert("streetName", ErrorNode::Leaf(ValidationError::new("required")));

        let mut addresses = ErrorTree::new();
        addresses.set_collection_error(ValidationError::new("invalidArray"));
        addresses.insert("1", ErrorNode::Tree(member));

        let mut root = ErrorTree::new();
        root.insert("addresses", ErrorNode::Tree(addresses));
        root.insert("name", ErrorNode::Leaf(ValidationError::new("required")));
        root
    }

    #[test]
    fn test_empty_tree() {
        let tree = ErrorTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.to_json(), json!({}));
    }

    #[test]
    fn test_path_lookup() {
        let tree = sample();
        assert_eq!(tree.error_at("name").unwrap().code(), "required");
        assert_eq!(tree.error_at("addresses.1.streetName").unwrap().code(), "required");
        assert_eq!(tree.error_at("addresses._error").unwrap().code(), "invalidArray");
        assert!(tree.error_at("addresses.0.streetName").is_none());
        assert!(tree.error_at("addresses").is_none());
    }

    #[test]
    fn test_leaf_count_includes_collection_errors() {
        assert_eq!(sample().leaf_count(), 3);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            sample().to_json(),
            json!({
                "addresses": {
                    "_error": {"error": "invalidArray", "params": {}},
                    "1": {"streetName": {"error": "required", "params": {}}}
                },
                "name": {"error": "required", "params": {}}
            })
        );
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut scores = ErrorTree::new();
        for index in 0..12 {
            scores.insert(index.to_string(), ErrorNode::Leaf(ValidationError::new("required")));
        }
        let keys: Vec<&str> = scores.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11"]);

        let JsonValue::Object(map) = scores.to_json() else {
            panic!("expected an object");
        };
        let serialized: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(serialized, keys);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut tree = ErrorTree::new();
        tree.insert("a", ErrorNode::Leaf(ValidationError::new("required")));
        tree.insert("b", ErrorNode::Leaf(ValidationError::new("required")));
        tree.insert("a", ErrorNode::Leaf(ValidationError::new("invalidNumber")));
        let keys: Vec<&str> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(tree.error_at("a").unwrap().code(), "invalidNumber");
    }

    #[test]
    fn test_underscore_error_child_outside_a_collection() {
        let mut tree = ErrorTree::new();
        tree.insert("_error", ErrorNode::Leaf(ValidationError::new("unknownProperty")));
        assert_eq!(tree.error_at("_error").unwrap().code(), "unknownProperty");
    }

    #[test]
    fn test_empty_subtrees_are_not_inserted() {
        let mut tree = ErrorTree::new();
        tree.insert_non_empty("group", ErrorNode::Tree(ErrorTree::new()));
        assert!(tree.is_empty());
    }
}
