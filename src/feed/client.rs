//! Feed service HTTP client.

use std::sync::Arc;

use log::debug;
use url::Url;

use super::parse::parse_feature_document;
use super::types::RawFeatureDocument;
use crate::config::Config;
use crate::error_handling::{FeedError, GeoError, InitializationError};
use crate::geo::{BoundingBox, GeoCoordinate};

/// Accept header sent with every feed query.
const FEED_ACCEPT: &str = "application/xml, text/xml;q=0.9";

/// Issues bounding-box queries against the map-data service.
///
/// One call to [`FeedClient::fetch_features`] is one HTTP GET: no retry and
/// no caching. Timeouts come from the shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Arc<reqwest::Client>,
    endpoint: Url,
    bbox_epsilon: f64,
}

impl FeedClient {
    /// Creates a client for `config.feed_url` with the configured query radius.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::FeedUrlError` if the feed URL does not parse.
    pub fn new(client: Arc<reqwest::Client>, config: &Config) -> Result<Self, InitializationError> {
        let endpoint = Url::parse(&config.feed_url)?;
        Ok(Self {
            client,
            endpoint,
            bbox_epsilon: config.bbox_epsilon,
        })
    }

    /// Query window `[lon - ε, lat - ε, lon + ε, lat + ε]` around a position.
    pub fn query_box(&self, center: GeoCoordinate) -> Result<BoundingBox, GeoError> {
        BoundingBox::around(center, self.bbox_epsilon)
    }

    /// Full request URL for a window, with the `bbox` query parameter set.
    pub fn query_url(&self, bbox: &BoundingBox) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("bbox", &bbox.to_query_value());
        url
    }

    /// Fetches and parses every node inside `bbox`.
    ///
    /// # Errors
    ///
    /// - `FeedError::Unavailable` on a network failure
    /// - `FeedError::Status` on a non-success response
    /// - `FeedError::Parse` if the body is not a feature document
    pub async fn fetch_features(
        &self,
        bbox: &BoundingBox,
    ) -> Result<RawFeatureDocument, FeedError> {
        let url = self.query_url(bbox);
        debug!("Querying feed: {url}");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, FEED_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Feed returned {} bytes", body.len());
        parse_feature_document(&body)
    }
}
