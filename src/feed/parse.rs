//! Map-data XML parsing.
//!
//! Handles the subset of the OpenStreetMap XML format needed for POIs:
//! - `<osm>` root element
//! - `<node id lat lon>` elements, self-closing or with children
//! - `<tag k v/>` elements, collected depth-first for the enclosing node
//!
//! Ways, relations, and their tags are skipped. A node whose `id`, `lat`, or
//! `lon` is missing or unusable is skipped along with its children; the rest
//! of the document is kept.

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::types::{FeatureNode, RawFeatureDocument, Tag};
use crate::error_handling::FeedError;
use crate::geo::GeoCoordinate;

const ROOT_ELEMENT: &[u8] = b"osm";
const NODE_ELEMENT: &[u8] = b"node";
const TAG_ELEMENT: &[u8] = b"tag";

/// Node being assembled while its children are read.
struct OpenNode {
    node: FeatureNode,
    depth: usize,
}

/// Parses a feed response body into a feature document.
///
/// # Errors
///
/// `FeedError::Parse` if the body is not well-formed XML, the root element is
/// not `<osm>`, or the document is truncated.
pub fn parse_feature_document(body: &str) -> Result<RawFeatureDocument, FeedError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut nodes = Vec::new();
    let mut open: Option<OpenNode> = None;
    // Depth of a rejected node whose children are being skipped
    let mut skipping: Option<usize> = None;
    let mut skipped = 0usize;
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            FeedError::Parse(format!(
                "malformed XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let self_closing = matches!(event, Event::Empty(_));
                if depth == 0 {
                    if saw_root {
                        return Err(FeedError::Parse("multiple root elements".into()));
                    }
                    check_root(e)?;
                    saw_root = true;
                    if !self_closing {
                        depth += 1;
                    }
                    continue;
                }
                if !self_closing {
                    depth += 1;
                }
                if skipping.is_some() {
                    continue;
                }

                let name = e.name();
                if open.is_none() && name.as_ref() == NODE_ELEMENT {
                    match parse_node(e)? {
                        Some(node) if self_closing => nodes.push(node),
                        Some(node) => open = Some(OpenNode { node, depth }),
                        None => {
                            skipped += 1;
                            if !self_closing {
                                skipping = Some(depth);
                            }
                        }
                    }
                } else if name.as_ref() == TAG_ELEMENT {
                    if let Some(current) = open.as_mut() {
                        if let Some(tag) = parse_tag(e)? {
                            current.node.tags.push(tag);
                        }
                    }
                }
            }
            Event::End(_) => {
                if skipping == Some(depth) {
                    skipping = None;
                }
                if open.as_ref().is_some_and(|current| current.depth == depth) {
                    if let Some(current) = open.take() {
                        nodes.push(current.node);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(FeedError::Parse("document has no root element".into()));
    }
    if depth != 0 {
        return Err(FeedError::Parse("unexpected end of document".into()));
    }

    if skipped > 0 {
        warn!("Skipped {skipped} node(s) with unusable attributes");
    }
    Ok(RawFeatureDocument::new(nodes).with_skipped(skipped))
}

fn check_root(e: &BytesStart<'_>) -> Result<(), FeedError> {
    if e.name().as_ref() == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(FeedError::Parse(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        )))
    }
}

/// Reads a `<node>` element. `Ok(None)` means the node is unusable and was
/// logged; `Err` is reserved for malformed XML attributes.
fn parse_node(e: &BytesStart<'_>) -> Result<Option<FeatureNode>, FeedError> {
    let (Some(id), Some(lat), Some(lon)) =
        (attribute(e, "id")?, attribute(e, "lat")?, attribute(e, "lon")?)
    else {
        warn!("Skipping <node> without id, lat, and lon attributes");
        return Ok(None);
    };
    match node_from_attributes(&id, &lat, &lon) {
        Ok(node) => Ok(Some(node)),
        Err(reason) => {
            warn!("Skipping node {id}: {reason}");
            Ok(None)
        }
    }
}

fn node_from_attributes(id: &str, lat: &str, lon: &str) -> Result<FeatureNode, String> {
    let id = id
        .parse::<i64>()
        .map_err(|_| format!("invalid id '{id}'"))?;
    let latitude = lat
        .parse::<f64>()
        .map_err(|_| format!("invalid lat '{lat}'"))?;
    let longitude = lon
        .parse::<f64>()
        .map_err(|_| format!("invalid lon '{lon}'"))?;
    let coordinate = GeoCoordinate::new(latitude, longitude)
        .map_err(|err| format!("out-of-range coordinate: {err}"))?;

    Ok(FeatureNode {
        id,
        coordinate,
        tags: Vec::new(),
    })
}

/// Reads a `<tag k v/>` element; tags missing either attribute are skipped.
fn parse_tag(e: &BytesStart<'_>) -> Result<Option<Tag>, FeedError> {
    match (attribute(e, "k")?, attribute(e, "v")?) {
        (Some(key), Some(value)) => Ok(Some(Tag { key, value })),
        _ => {
            debug!("Skipping tag without k/v attributes");
            Ok(None)
        }
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, FeedError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FeedError::Parse(format!("malformed attribute: {err}")))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| FeedError::Parse(format!("bad attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="openstreetmap-cgimap">
  <bounds minlat="12.99" minlon="74.78" maxlat="13.01" maxlon="74.80"/>
  <node id="1" lat="13.0010000" lon="74.7900000" version="1">
    <tag k="amenity" v="library"/>
    <tag k="name" v="Library"/>
    <tag k="information" v="Open 9-5"/>
  </node>
  <node id="2" lat="13.0020000" lon="74.7910000"/>
  <node id="3" lat="12.9950000" lon="74.7850000">
    <tag k="highway" v="crossing"/>
  </node>
  <way id="10">
    <nd ref="1"/>
    <tag k="name" v="Main Road"/>
  </way>
</osm>"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = parse_feature_document(SAMPLE).unwrap();
        assert_eq!(doc.len(), 3);

        let first = &doc.nodes()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.coordinate.latitude(), 13.001);
        assert_eq!(first.coordinate.longitude(), 74.79);
        assert_eq!(
            first.tags,
            vec![
                Tag::new("amenity", "library"),
                Tag::new("name", "Library"),
                Tag::new("information", "Open 9-5"),
            ]
        );

        assert!(doc.nodes()[1].tags.is_empty());
        assert_eq!(doc.nodes()[2].tags, vec![Tag::new("highway", "crossing")]);
    }

    #[test]
    fn test_way_tags_are_not_attached_to_nodes() {
        let doc = parse_feature_document(SAMPLE).unwrap();
        assert!(doc
            .nodes()
            .iter()
            .all(|n| n.tags.iter().all(|t| t.value != "Main Road")));
    }

    #[test]
    fn test_nested_tags_collected_depth_first() {
        let body = r#"<osm>
  <node id="5" lat="1.0" lon="2.0">
    <meta><tag k="name" v="Inner"/></meta>
    <tag k="name" v="Outer"/>
  </node>
</osm>"#;
        let doc = parse_feature_document(body).unwrap();
        let values: Vec<_> = doc.nodes()[0].tags.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["Inner", "Outer"]);
    }

    #[test]
    fn test_escaped_values_are_unescaped() {
        let body = r#"<osm><node id="7" lat="0" lon="0"><tag k="name" v="Fish &amp; Chips"/></node></osm>"#;
        let doc = parse_feature_document(body).unwrap();
        assert_eq!(doc.nodes()[0].tags[0].value, "Fish & Chips");
    }

    #[test]
    fn test_empty_root_is_empty_document() {
        assert!(parse_feature_document("<osm/>").unwrap().is_empty());
        assert!(parse_feature_document("<osm></osm>").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_osm_root() {
        let err = parse_feature_document("<html><body>Rate limited</body></html>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(ref msg) if msg.contains("html")));
    }

    #[test]
    fn test_rejects_garbage_and_empty_body() {
        assert!(matches!(
            parse_feature_document("You requested too many nodes"),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            parse_feature_document(""),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_document() {
        let body = r#"<osm><node id="1" lat="1.0" lon="2.0"><tag k="name" v="A"/>"#;
        assert!(matches!(
            parse_feature_document(body),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_nodes_are_skipped_and_siblings_kept() {
        for bad in [
            r#"<node id="2" lon="74.79"/>"#,
            r#"<node id="2" lat="north" lon="74.79"/>"#,
            r#"<node id="x" lat="13.0" lon="74.79"/>"#,
            r#"<node id="2" lat="95.0" lon="74.79"/>"#,
        ] {
            let body = format!(
                r#"<osm><node id="1" lat="13.001" lon="74.79"><tag k="name" v="Good"/></node>{bad}<node id="3" lat="13.002" lon="74.79"/></osm>"#
            );
            let doc = parse_feature_document(&body)
                .unwrap_or_else(|e| panic!("{bad} should be skipped, got {e}"));
            let ids: Vec<_> = doc.nodes().iter().map(|n| n.id).collect();
            assert_eq!(ids, [1, 3], "{bad}");
            assert_eq!(doc.skipped(), 1);
            assert_eq!(doc.nodes()[0].tags, vec![Tag::new("name", "Good")]);
        }
    }

    #[test]
    fn test_children_of_skipped_node_are_dropped() {
        let body = r#"<osm>
  <node id="1" lat="13.001" lon="74.79"><tag k="name" v="Good"/></node>
  <node id="2" lon="74.79">
    <tag k="name" v="Broken"/>
    <node id="9" lat="1.0" lon="1.0"/>
  </node>
  <node id="3" lat="13.002" lon="74.79"/>
</osm>"#;
        let doc = parse_feature_document(body).unwrap();
        let ids: Vec<_> = doc.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, [1, 3]);
        assert!(doc.nodes()[1].tags.is_empty());
        assert!(doc
            .nodes()
            .iter()
            .all(|n| n.tags.iter().all(|t| t.value != "Broken")));
    }

    #[test]
    fn test_tag_without_value_is_skipped() {
        let body = r#"<osm><node id="1" lat="1" lon="2"><tag k="name"/><tag k="name" v="B"/></node></osm>"#;
        let doc = parse_feature_document(body).unwrap();
        assert_eq!(doc.nodes()[0].tags, vec![Tag::new("name", "B")]);
    }
}
