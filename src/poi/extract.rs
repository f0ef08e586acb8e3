//! Tag lookup and POI extraction.

use super::Poi;
use crate::config::{INFORMATION_TAG, NAME_TAG};
use crate::feed::{FeatureNode, RawFeatureDocument, Tag};

/// Value of the first tag with `key`, in document order.
pub fn first_value<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

/// Keeps the nodes that carry at least one `name` tag, whatever its value.
pub fn filter_named(doc: RawFeatureDocument) -> Vec<FeatureNode> {
    doc.into_nodes()
        .into_iter()
        .filter(|node| first_value(&node.tags, NAME_TAG).is_some())
        .collect()
}

/// The node's `name` tag value, if any.
pub fn extract_name(node: &FeatureNode) -> Option<&str> {
    first_value(&node.tags, NAME_TAG)
}

/// The node's `information` tag value, if any.
pub fn extract_information(node: &FeatureNode) -> Option<&str> {
    first_value(&node.tags, INFORMATION_TAG)
}

/// Filters a document down to named nodes and labels each one.
pub fn extract_pois(doc: RawFeatureDocument) -> Vec<Poi> {
    filter_named(doc)
        .into_iter()
        .filter_map(Poi::from_node)
        .collect()
}
