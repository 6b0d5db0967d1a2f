// Sensor domain models
use serde::{Deserialize, Serialize};

/// Absolute reconstruction error above which the anomaly model flags a sensor.
pub const ANOMALY_THRESHOLD: f64 = 0.08;
/// Fraction of the anomaly threshold that raises a warning.
pub const ANOMALY_WARNING_RATIO: f64 = 0.75;
/// Fraction of the sensor threshold that raises a warning.
pub const THRESHOLD_WARNING_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    Accelerometer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SensorStatus {
    Normal,
    Warning,
    Exceeded,
}

impl SensorStatus {
    /// Status from the raw reading against the alarm threshold.
    /// Both comparisons are strict.
    pub fn from_threshold(reading: f64, threshold: f64) -> Self {
        if reading > threshold {
            SensorStatus::Exceeded
        } else if reading > threshold * THRESHOLD_WARNING_RATIO {
            SensorStatus::Warning
        } else {
            SensorStatus::Normal
        }
    }

    /// Status for a sensor whose edge unit reports a reconstruction error.
    ///
    /// The anomaly model decides `Exceeded` on its own: a raw threshold
    /// breach with a healthy reconstruction error is reported as `Warning`.
    /// Below the anomaly warning band the threshold status otherwise stands,
    /// capped at `Warning` rather than passed through unchanged, so `Exceeded`
    /// always means the reconstruction error is above `ANOMALY_THRESHOLD`.
    pub fn from_anomaly(reconstruction_error: f64, threshold_status: SensorStatus) -> Self {
        if reconstruction_error > ANOMALY_THRESHOLD {
            SensorStatus::Exceeded
        } else if reconstruction_error > ANOMALY_THRESHOLD * ANOMALY_WARNING_RATIO {
            SensorStatus::Warning
        } else {
            threshold_status.min(SensorStatus::Warning)
        }
    }

    pub fn derive(reading: f64, threshold: f64, reconstruction_error: Option<f64>) -> Self {
        let threshold_status = Self::from_threshold(reading, threshold);
        match reconstruction_error {
            Some(error) => Self::from_anomaly(error, threshold_status),
            None => threshold_status,
        }
    }
}

/// Latest telemetry of one sensing channel, in the wire shape served by the
/// live sensor endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub id: String,
    pub asset_id: String,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    pub location: String,
    pub reading: f64,
    pub unit: String,
    pub threshold: f64,
    pub status: SensorStatus,
    pub last_update: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_frequency_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_frequency_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping_ratio_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_shape_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daq_unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconstruction_error: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,
}

impl SensorReading {
    pub fn derived_status(&self) -> SensorStatus {
        SensorStatus::derive(self.reading, self.threshold, self.reconstruction_error)
    }

    /// Percentage drift of the identified natural frequency from its healthy baseline.
    pub fn frequency_shift_pct(&self) -> Option<f64> {
        match (self.natural_frequency_hz, self.baseline_frequency_hz) {
            (Some(current), Some(baseline)) if baseline != 0.0 => {
                Some((current - baseline) / baseline * 100.0)
            }
            _ => None,
        }
    }
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_status_uses_strict_comparisons() {
        // 0.13 is below 0.9 * 0.15 = 0.135
        assert_eq!(SensorStatus::from_threshold(0.13, 0.15), SensorStatus::Normal);
        assert_eq!(SensorStatus::from_threshold(0.14, 0.15), SensorStatus::Warning);
        assert_eq!(SensorStatus::from_threshold(0.15, 0.15), SensorStatus::Warning);
        assert_eq!(SensorStatus::from_threshold(0.16, 0.15), SensorStatus::Exceeded);
        assert_eq!(SensorStatus::from_threshold(0.0, 0.15), SensorStatus::Normal);
    }

    #[test]
    fn test_anomaly_status_takes_precedence() {
        assert_eq!(SensorStatus::derive(0.05, 0.15, Some(0.081)), SensorStatus::Exceeded);
        assert_eq!(SensorStatus::derive(0.05, 0.15, Some(0.08)), SensorStatus::Warning);
        assert_eq!(SensorStatus::derive(0.05, 0.15, Some(0.061)), SensorStatus::Warning);
        assert_eq!(SensorStatus::derive(0.05, 0.15, Some(0.06)), SensorStatus::Normal);
        assert_eq!(SensorStatus::derive(0.14, 0.15, Some(0.01)), SensorStatus::Warning);
    }

    #[test]
    fn test_exceeded_tracks_reconstruction_error_when_present() {
        assert_eq!(SensorStatus::derive(0.22, 0.18, Some(0.02)), SensorStatus::Warning);
        assert_eq!(SensorStatus::derive(0.22, 0.18, Some(0.146)), SensorStatus::Exceeded);
        assert_eq!(SensorStatus::derive(0.22, 0.18, None), SensorStatus::Exceeded);
    }

    #[test]
    fn test_frequency_shift() {
        let sensor = fixtures::monitored("SEN-001", 0.09, 4.0, 0.017);
        let shift = sensor.frequency_shift_pct().unwrap();
        assert!((shift - (-3.614457831)).abs() < 1e-6);

        let bare = fixtures::reading("SEN-002", "BRG-001", 0.09, 0.15);
        assert_eq!(bare.frequency_shift_pct(), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.126, 2), 0.13);
        assert_eq!(round_to(4.1449, 3), 4.145);
        assert_eq!(round_to(0.01234, 4), 0.0123);
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "id": "SEN-009",
            "assetId": "BLD-002",
            "type": "Accelerometer",
            "location": "5th Floor Column C5",
            "reading": 0.05,
            "unit": "g",
            "threshold": 0.2,
            "status": "Normal",
            "lastUpdate": "2026-02-10 09:35",
            "naturalFrequencyHz": 5.27,
            "reconstructionError": 0.011
        }"#;

        let sensor: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(sensor.asset_id, "BLD-002");
        assert_eq!(sensor.kind, SensorKind::Accelerometer);
        assert_eq!(sensor.natural_frequency_hz, Some(5.27));
        assert_eq!(sensor.humidity_pct, None);

        let encoded = serde_json::to_value(&sensor).unwrap();
        assert_eq!(encoded["assetId"], "BLD-002");
        assert!(encoded.get("humidityPct").is_none());
    }
}
