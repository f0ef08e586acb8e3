//! Map-data feed: bounding-box queries and feature document parsing.
//!
//! This module provides:
//! - `FeedClient`: one HTTP GET per query against the configured endpoint
//! - `parse_feature_document`: XML body to `RawFeatureDocument`
//! - Feature types (`FeatureNode`, `Tag`)

mod client;
mod parse;
mod types;

// Re-export public API
pub use client::FeedClient;
pub use parse::parse_feature_document;
pub use types::{FeatureNode, RawFeatureDocument, Tag};

#[cfg(test)]
mod tests;
