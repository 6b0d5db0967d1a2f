// Initial sensor collection loaded at startup
use crate::domain::sensor::SensorReading;
use anyhow::{Context, Result};
use std::path::Path;

pub fn load_seed_readings(path: impl AsRef<Path>) -> Result<Vec<SensorReading>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed readings from {}", path.display()))?;

    let readings: Vec<SensorReading> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse seed readings in {}", path.display()))?;

    if readings.is_empty() {
        tracing::warn!("Seed file {} contains no readings", path.display());
    }

    Ok(readings)
}
