// Feed client tests against a mock map-data server.

use std::sync::Arc;

use httptest::{matchers::*, responders::*, Expectation, Server};

use super::FeedClient;
use crate::config::Config;
use crate::error_handling::FeedError;
use crate::geo::GeoCoordinate;

const MAP_PATH: &str = "/api/0.6/map";

const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="100" lat="13.0010000" lon="74.7900000">
    <tag k="name" v="Library"/>
    <tag k="information" v="Open 9-5"/>
  </node>
  <node id="101" lat="13.0030000" lon="74.7920000"/>
</osm>"#;

fn feed_client(feed_url: String) -> FeedClient {
    let config = Config {
        feed_url,
        ..Default::default()
    };
    FeedClient::new(Arc::new(reqwest::Client::new()), &config).expect("valid feed URL")
}

fn camera() -> GeoCoordinate {
    GeoCoordinate::new(13.0, 74.79).expect("valid coordinate")
}

#[tokio::test]
async fn test_fetch_features_success() {
    let server = Server::run();
    server.expect(
        Expectation::matching(httptest::all_of![
            request::method_path("GET", MAP_PATH),
            request::query(url_decoded(contains((
                "bbox",
                "74.7800000,12.9900000,74.8000000,13.0100000"
            )))),
        ])
        .respond_with(status_code(200).body(BODY)),
    );

    let client = feed_client(server.url(MAP_PATH).to_string());
    let bbox = client.query_box(camera()).unwrap();
    let doc = client.fetch_features(&bbox).await.unwrap();

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.nodes()[0].id, 100);
    assert_eq!(doc.nodes()[0].tags.len(), 2);
}

#[tokio::test]
async fn test_fetch_features_http_error() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", MAP_PATH))
            .respond_with(status_code(509).body("Bandwidth limit exceeded")),
    );

    let client = feed_client(server.url(MAP_PATH).to_string());
    let bbox = client.query_box(camera()).unwrap();
    let err = client.fetch_features(&bbox).await.unwrap_err();

    assert!(matches!(err, FeedError::Status { status: 509 }));
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_fetch_features_malformed_body() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", MAP_PATH))
            .respond_with(status_code(200).body("<osm><node id=\"1\" lat=\"1\"")),
    );

    let client = feed_client(server.url(MAP_PATH).to_string());
    let bbox = client.query_box(camera()).unwrap();
    let err = client.fetch_features(&bbox).await.unwrap_err();

    assert!(matches!(err, FeedError::Parse(_)));
    assert!(!err.is_unavailable());
}

#[tokio::test]
async fn test_fetch_features_connection_refused() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = feed_client(format!("http://127.0.0.1:{port}{MAP_PATH}"));
    let bbox = client.query_box(camera()).unwrap();
    let err = client.fetch_features(&bbox).await.unwrap_err();

    assert!(matches!(err, FeedError::Unavailable(_)));
}

#[test]
fn test_query_url_keeps_existing_parameters() {
    let client = feed_client("https://maps.example.com/api/0.6/map?client=test".to_string());
    let bbox = client.query_box(camera()).unwrap();
    let url = client.query_url(&bbox);

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs[0], ("client".to_string(), "test".to_string()));
    assert_eq!(
        pairs[1],
        (
            "bbox".to_string(),
            "74.7800000,12.9900000,74.8000000,13.0100000".to_string()
        )
    );
}

#[test]
fn test_new_rejects_relative_url() {
    let config = Config {
        feed_url: "/api/0.6/map".to_string(),
        ..Default::default()
    };
    assert!(FeedClient::new(Arc::new(reqwest::Client::new()), &config).is_err());
}
