// Local telemetry simulation used when the live endpoint is unavailable
use crate::domain::sensor::{round_to, SensorReading, SensorStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reading spread as a fraction of the sensor threshold (±3%).
const READING_SPREAD_RATIO: f64 = 0.06;
/// Natural frequency spread in Hz (±0.025 Hz).
const FREQUENCY_SPREAD_HZ: f64 = 0.05;
/// Reconstruction error spread.
const RECONSTRUCTION_SPREAD: f64 = 0.01;
/// Centre of the reconstruction error draw. Below 0.5 so the error drifts upward.
const RECONSTRUCTION_CENTER: f64 = 0.45;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

pub struct Simulator {
    random: Box<dyn RandomSource>,
}

impl Simulator {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Perturb every reading independently and recompute its status.
    pub fn perturb(&mut self, readings: &[SensorReading], stamp: &str) -> Vec<SensorReading> {
        readings
            .iter()
            .map(|sensor| self.perturb_one(sensor, stamp))
            .collect()
    }

    fn perturb_one(&mut self, sensor: &SensorReading, stamp: &str) -> SensorReading {
        let variation = (self.random.next_unit() - 0.5) * (sensor.threshold * READING_SPREAD_RATIO);
        let reading = round_to((sensor.reading + variation).max(0.0), 2);

        let natural_frequency_hz = sensor.natural_frequency_hz.map(|frequency| {
            round_to(frequency + (self.random.next_unit() - 0.5) * FREQUENCY_SPREAD_HZ, 3)
        });

        let reconstruction_error = sensor.reconstruction_error.map(|error| {
            let drift = (self.random.next_unit() - RECONSTRUCTION_CENTER) * RECONSTRUCTION_SPREAD;
            round_to((error + drift).max(0.0), 4)
        });

        SensorReading {
            reading,
            natural_frequency_hz,
            reconstruction_error,
            status: SensorStatus::derive(reading, sensor.threshold, reconstruction_error),
            last_update: stamp.to_string(),
            ..sensor.clone()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::ScriptedRandom;
    use super::*;
    use crate::domain::sensor::fixtures;
    use crate::domain::sensor::ANOMALY_THRESHOLD;

    const STAMP: &str = "2026-02-10 09:41:00";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perturbs_all_fields_with_exact_draws() {
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::new(vec![0.9, 0.1, 0.95])));
        let mut sensor = fixtures::monitored("SEN-001", 0.5, 4.14, 0.017);
        sensor.threshold = 1.0;

        let next = simulator.perturb(&[sensor.clone()], STAMP).remove(0);

        // 0.5 + 0.4 * 0.06 = 0.524
        assert!(close(next.reading, 0.52));
        // 4.14 - 0.4 * 0.05 = 4.12
        assert!(close(next.natural_frequency_hz.unwrap(), 4.12));
        // 0.017 + 0.5 * 0.01 = 0.022
        assert!(close(next.reconstruction_error.unwrap(), 0.022));
        assert_eq!(next.status, SensorStatus::Normal);
        assert_eq!(next.last_update, STAMP);
        assert_eq!(next.id, sensor.id);
        assert_eq!(next.mode_shape_label, sensor.mode_shape_label);
    }

    #[test]
    fn test_reading_is_floored_at_zero() {
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::constant(0.0)));
        let sensor = fixtures::reading("SEN-010", "BLD-001", 0.01, 1.0);

        let next = simulator.perturb(&[sensor], STAMP).remove(0);

        assert_eq!(next.reading, 0.0);
        assert_eq!(next.status, SensorStatus::Normal);
    }

    #[test]
    fn test_floored_reading_is_positive_zero() {
        // 0.003 - 0.5 * 0.15 * 0.06 = -0.0015, which would round to -0.0
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::constant(0.0)));
        let sensor = fixtures::reading("SEN-013", "BRG-001", 0.003, 0.15);

        let next = simulator.perturb(&[sensor], STAMP).remove(0);

        assert_eq!(next.reading, 0.0);
        assert!(!next.reading.is_sign_negative());
        let encoded = serde_json::to_value(&next).unwrap();
        assert_eq!(encoded["reading"].to_string(), "0.0");
    }

    #[test]
    fn test_reconstruction_error_is_floored_at_zero() {
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::constant(0.0)));
        let sensor = fixtures::monitored("SEN-001", 0.09, 4.14, 0.001);

        let next = simulator.perturb(&[sensor], STAMP).remove(0);

        assert_eq!(next.reconstruction_error, Some(0.0));
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::constant(0.7)));
        let sensor = fixtures::reading("SEN-011", "BLD-002", 0.05, 0.2);

        let next = simulator.perturb(&[sensor], STAMP).remove(0);

        assert_eq!(next.natural_frequency_hz, None);
        assert_eq!(next.reconstruction_error, None);
    }

    #[test]
    fn test_anomaly_overrides_threshold_status() {
        // Reading stays well under threshold, error crosses the anomaly threshold.
        let mut simulator = Simulator::new(Box::new(ScriptedRandom::constant(0.95)));
        let sensor = fixtures::monitored("SEN-008", 0.02, 2.41, 0.079);

        let next = simulator.perturb(&[sensor], STAMP).remove(0);

        assert!(next.reconstruction_error.unwrap() > ANOMALY_THRESHOLD);
        assert!(next.reading < next.threshold * 0.9);
        assert_eq!(next.status, SensorStatus::Exceeded);
    }

    #[test]
    fn test_seeded_simulation_stays_within_bounds() {
        let mut simulator = Simulator::new(Box::new(StdRandom::seeded(7)));
        let mut readings = vec![
            fixtures::monitored("SEN-001", 0.09, 4.14, 0.017),
            fixtures::monitored("SEN-008", 0.22, 2.41, 0.146),
            fixtures::reading("SEN-012", "BLD-003", 0.0, 0.2),
        ];

        for _ in 0..200 {
            let next = simulator.perturb(&readings, STAMP);
            for (before, after) in readings.iter().zip(&next) {
                assert!(after.reading >= 0.0);
                assert!(after.reading - before.reading <= before.threshold * 0.03 + 0.005 + 1e-9);
                assert!(before.reading - after.reading <= before.threshold * 0.03 + 0.005 + 1e-9);
                if let (Some(f0), Some(f1)) = (before.natural_frequency_hz, after.natural_frequency_hz) {
                    assert!((f1 - f0).abs() <= 0.025 + 0.0005 + 1e-9);
                }
                if let Some(error) = after.reconstruction_error {
                    assert!(error >= 0.0);
                    assert_eq!(
                        after.status == SensorStatus::Exceeded,
                        error > ANOMALY_THRESHOLD
                    );
                } else {
                    assert_eq!(
                        after.status == SensorStatus::Exceeded,
                        after.reading > after.threshold
                    );
                }
            }
            readings = next;
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let readings = vec![fixtures::monitored("SEN-001", 0.09, 4.14, 0.017)];
        let mut a = Simulator::new(Box::new(StdRandom::seeded(42)));
        let mut b = Simulator::new(Box::new(StdRandom::seeded(42)));

        assert_eq!(a.perturb(&readings, STAMP), b.perturb(&readings, STAMP));
    }
}
