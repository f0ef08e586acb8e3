//! Point-of-interest extraction from feature documents.
//!
//! A POI is any feature node with a `name` tag. Tag lookups go through
//! [`first_value`]: exact key match, first occurrence in document order wins.

mod extract;

// Re-export public API
pub use extract::{extract_information, extract_name, extract_pois, filter_named, first_value};

use crate::feed::FeatureNode;
use crate::geo::GeoCoordinate;
use crate::session::EntityMetadata;

/// A named, located feature ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub coordinate: GeoCoordinate,
    pub name: String,
    pub information: Option<String>,
    pub source_node: FeatureNode,
}

impl Poi {
    /// Labels a node; `None` if it has no `name` tag.
    pub fn from_node(node: FeatureNode) -> Option<Self> {
        let name = extract_name(&node)?.to_string();
        let information = extract_information(&node).map(str::to_string);
        Some(Self {
            coordinate: node.coordinate,
            name,
            information,
            source_node: node,
        })
    }

    /// Metadata attached to the placed entity and echoed back on click.
    pub fn metadata(&self) -> EntityMetadata {
        EntityMetadata {
            coordinate: self.coordinate,
            name: Some(self.name.clone()),
            information: self.information.clone(),
        }
    }
}
