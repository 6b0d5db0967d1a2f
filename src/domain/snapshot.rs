// Live sensor snapshot published to consumers
use super::sensor::{SensorReading, SensorStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the readings of the latest tick came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    RemoteFed,
    Simulated,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub readings: Vec<SensorReading>,
    pub connected: bool,
    pub last_sync: DateTime<Utc>,
    pub provenance: Provenance,
}

impl LiveSnapshot {
    /// Optimistic starting state: connected and remote-fed before any tick resolves.
    pub fn seeded(readings: Vec<SensorReading>, now: DateTime<Utc>) -> Self {
        Self {
            readings,
            connected: true,
            last_sync: now,
            provenance: Provenance::RemoteFed,
        }
    }

    pub fn find(&self, sensor_id: &str) -> Option<&SensorReading> {
        self.readings.iter().find(|s| s.id == sensor_id)
    }

    pub fn for_asset(&self, asset_id: &str) -> Vec<SensorReading> {
        self.readings
            .iter()
            .filter(|s| s.asset_id == asset_id)
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_readings(&self.readings)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub exceeded: usize,
}

impl StatusSummary {
    pub fn from_readings(readings: &[SensorReading]) -> Self {
        readings.iter().fold(Self::default(), |mut acc, s| {
            acc.total += 1;
            match s.status {
                SensorStatus::Normal => acc.normal += 1,
                SensorStatus::Warning => acc.warning += 1,
                SensorStatus::Exceeded => acc.exceeded += 1,
            }
            acc
        })
    }
}
