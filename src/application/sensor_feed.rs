// Feed trait for live sensor data access
use crate::domain::sensor::SensorReading;
use async_trait::async_trait;
use thiserror::Error;

/// Why the live endpoint could not be used on this tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnavailableCause {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("empty payload")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("live sensor endpoint unavailable: {0}")]
    RemoteUnavailable(#[from] UnavailableCause),
}

#[async_trait]
pub trait SensorFeed: Send + Sync {
    /// Fetch the authoritative reading collection.
    ///
    /// Returns a non-empty collection or `SyncError::RemoteUnavailable`.
    async fn fetch_live(&self) -> Result<Vec<SensorReading>, SyncError>;
}
