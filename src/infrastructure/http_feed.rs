// HTTP live sensor feed implementation
use crate::application::sensor_feed::{SensorFeed, SyncError, UnavailableCause};
use crate::domain::sensor::SensorReading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpSensorFeed {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSensorFeed {
    pub fn new(endpoint: String, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build live sensor HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SensorFeed for HttpSensorFeed {
    async fn fetch_live(&self) -> Result<Vec<SensorReading>, SyncError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UnavailableCause::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UnavailableCause::Status(status.as_u16()).into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UnavailableCause::Transport(e.to_string()))?;

        let readings: Vec<SensorReading> = serde_json::from_slice(&body)
            .map_err(|e| UnavailableCause::Malformed(e.to_string()))?;

        if readings.is_empty() {
            return Err(UnavailableCause::Empty.into());
        }

        Ok(readings)
    }
}
