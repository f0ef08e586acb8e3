//! Feature document data structures.

use crate::geo::GeoCoordinate;

/// One key/value pair attached to a feature node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A located feature with its tags in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureNode {
    pub id: i64,
    pub coordinate: GeoCoordinate,
    pub tags: Vec<Tag>,
}

/// Parsed feed response: the located nodes in document order, plus a count
/// of nodes dropped for unusable attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatureDocument {
    nodes: Vec<FeatureNode>,
    skipped: usize,
}

impl RawFeatureDocument {
    pub fn new(nodes: Vec<FeatureNode>) -> Self {
        Self { nodes, skipped: 0 }
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    /// Nodes left out because their `id`, `lat`, or `lon` was unusable.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn nodes(&self) -> &[FeatureNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<FeatureNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
