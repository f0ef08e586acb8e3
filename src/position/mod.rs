//! Single-shot device position reads.
//!
//! A [`PositionSource`] answers one read per call with no caching and no
//! retry; every call reaches the underlying sensor.
//!
//! - [`StaticPositionSource`]: always reports the same coordinate
//! - [`SensorPositionSource`]: forwards each read as a one-shot request to a
//!   sensor task over a channel, the way platform geolocation callbacks are
//!   bridged into async code

use std::future::Future;

use tokio::sync::{mpsc, oneshot};

use crate::error_handling::{PositionError, PositionFailure};
use crate::geo::GeoCoordinate;

/// Source of the device's current coordinate.
pub trait PositionSource: Send + Sync {
    /// Reads the current position once.
    ///
    /// # Errors
    ///
    /// `PositionError::Unavailable` on permission denial, timeout, or sensor fault.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<GeoCoordinate, PositionError>> + Send;
}

/// Position source that always reports a fixed coordinate.
#[derive(Debug, Clone, Copy)]
pub struct StaticPositionSource {
    position: GeoCoordinate,
}

impl StaticPositionSource {
    pub fn new(position: GeoCoordinate) -> Self {
        Self { position }
    }
}

impl PositionSource for StaticPositionSource {
    async fn current_position(&self) -> Result<GeoCoordinate, PositionError> {
        Ok(self.position)
    }
}

/// Reply channel handed to the sensor for one read.
pub type PositionReply = oneshot::Sender<Result<GeoCoordinate, PositionError>>;

/// Position source backed by a sensor task.
///
/// Each call sends a fresh [`PositionReply`] and suspends until the sensor
/// answers. A sensor that has gone away, or drops the reply, surfaces as
/// `PositionFailure::SensorFault`.
#[derive(Debug, Clone)]
pub struct SensorPositionSource {
    requests: mpsc::Sender<PositionReply>,
}

impl SensorPositionSource {
    /// Creates a source and the receiving end the sensor task serves.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PositionReply>) {
        let (requests, rx) = mpsc::channel(capacity.max(1));
        (Self { requests }, rx)
    }
}

impl PositionSource for SensorPositionSource {
    async fn current_position(&self) -> Result<GeoCoordinate, PositionError> {
        let sensor_fault = PositionError::Unavailable {
            reason: PositionFailure::SensorFault,
        };
        let (reply, response) = oneshot::channel();
        if self.requests.send(reply).await.is_err() {
            log::warn!("Position sensor is no longer running");
            return Err(sensor_fault);
        }
        match response.await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Position sensor dropped the request without answering");
                Err(sensor_fault)
            }
        }
    }
}

/// Serves every request on `rx` with `position` until all sources are dropped.
pub async fn serve_fixed_position(
    mut rx: mpsc::Receiver<PositionReply>,
    position: Result<GeoCoordinate, PositionError>,
) {
    while let Some(reply) = rx.recv().await {
        let _ = reply.send(position.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_repeats_position() {
        let position = GeoCoordinate::new(13.0, 74.79).unwrap();
        let source = StaticPositionSource::new(position);
        assert_eq!(source.current_position().await.unwrap(), position);
        assert_eq!(source.current_position().await.unwrap(), position);
    }

    #[tokio::test]
    async fn test_sensor_source_reads_once_per_call() {
        let (source, mut rx) = SensorPositionSource::channel(4);
        let sensor = tokio::spawn(async move {
            let mut reads = 0u32;
            while let Some(reply) = rx.recv().await {
                reads += 1;
                let lat = 10.0 + f64::from(reads);
                let _ = reply.send(Ok(GeoCoordinate::new(lat, 0.0).unwrap()));
            }
            reads
        });

        let first = source.current_position().await.unwrap();
        let second = source.current_position().await.unwrap();
        assert_eq!(first.latitude(), 11.0);
        assert_eq!(second.latitude(), 12.0);

        drop(source);
        assert_eq!(sensor.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sensor_source_propagates_denial() {
        let (source, rx) = SensorPositionSource::channel(1);
        let denied = PositionError::Unavailable {
            reason: PositionFailure::PermissionDenied,
        };
        tokio::spawn(serve_fixed_position(rx, Err(denied.clone())));
        assert_eq!(source.current_position().await, Err(denied));
    }

    #[tokio::test]
    async fn test_sensor_source_without_sensor_is_fault() {
        let (source, rx) = SensorPositionSource::channel(1);
        drop(rx);
        assert_eq!(
            source.current_position().await,
            Err(PositionError::Unavailable {
                reason: PositionFailure::SensorFault
            })
        );
    }

    #[tokio::test]
    async fn test_sensor_source_dropped_reply_is_fault() {
        let (source, mut rx) = SensorPositionSource::channel(1);
        tokio::spawn(async move {
            while let Some(reply) = rx.recv().await {
                drop(reply);
            }
        });
        assert!(source.current_position().await.is_err());
    }
}
