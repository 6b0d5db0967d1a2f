// Live sensor sync service - Remote-first refresh with simulated fallback
use crate::application::sensor_feed::SensorFeed;
use crate::application::simulation::Simulator;
use crate::domain::sensor::SensorReading;
use crate::domain::snapshot::{LiveSnapshot, Provenance};
use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(5);

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TickOutcome {
    RemoteFed,
    Simulated,
    /// Another remote attempt was in flight, or the sync was stopped.
    Skipped,
}

/// Shared sync state: the feed, the simulator and the published snapshot.
pub struct SyncEngine {
    feed: Arc<dyn SensorFeed>,
    simulator: Mutex<Simulator>,
    state: watch::Sender<LiveSnapshot>,
    in_flight: AtomicBool,
    cancel: CancellationToken,
}

/// Clears the in-flight flag when the tick finishes or is dropped mid-fetch.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    fn new(
        feed: Arc<dyn SensorFeed>,
        simulator: Simulator,
        initial: Vec<SensorReading>,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(LiveSnapshot::seeded(initial, Utc::now()));
        Self {
            feed,
            simulator: Mutex::new(simulator),
            state,
            in_flight: AtomicBool::new(false),
            cancel,
        }
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveSnapshot> {
        self.state.subscribe()
    }

    /// Cancelled once the sync loop is stopped.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one sync attempt: fetch remotely, or perturb the current readings
    /// locally when the endpoint is unavailable.
    pub async fn tick(&self) -> TickOutcome {
        if self.cancel.is_cancelled() {
            return TickOutcome::Skipped;
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Sync tick skipped: remote attempt already in flight");
            return TickOutcome::Skipped;
        };

        let fetched = self.feed.fetch_live().await;
        if self.cancel.is_cancelled() {
            return TickOutcome::Skipped;
        }

        match fetched {
            Ok(readings) => {
                tracing::debug!("Live endpoint returned {} readings", readings.len());
                self.publish(readings, Provenance::RemoteFed);
                TickOutcome::RemoteFed
            }
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to simulated readings");
                let current = self.state.borrow().readings.clone();
                let stamp = Local::now().format(LAST_UPDATE_FORMAT).to_string();
                let next = self.simulator.lock().await.perturb(&current, &stamp);
                self.publish(next, Provenance::Simulated);
                TickOutcome::Simulated
            }
        }
    }

    fn publish(&self, readings: Vec<SensorReading>, provenance: Provenance) {
        self.state.send_modify(|snapshot| {
            snapshot.readings = readings;
            // The fallback path is deliberately reported as connected.
            snapshot.connected = true;
            snapshot.last_sync = next_sync_time(snapshot.last_sync, Utc::now());
            snapshot.provenance = provenance;
        });
    }
}

/// Keep `last_sync` strictly increasing even if the wall clock has not moved
/// (or stepped back) between two ticks.
fn next_sync_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// Handle of a running sync loop. Stopping or dropping it cancels the timer.
pub struct LiveSensorSync {
    engine: Arc<SyncEngine>,
    task: Option<JoinHandle<()>>,
}

impl LiveSensorSync {
    /// Seed the snapshot with `initial` and start refreshing it every `interval`.
    /// The first attempt runs immediately.
    pub fn start(
        feed: Arc<dyn SensorFeed>,
        simulator: Simulator,
        initial: Vec<SensorReading>,
        interval: Duration,
    ) -> Self {
        let engine = Arc::new(SyncEngine::new(
            feed,
            simulator,
            initial,
            CancellationToken::new(),
        ));

        tracing::info!(
            "Starting live sensor sync with {} seeded readings every {:?}",
            engine.state.borrow().readings.len(),
            interval
        );

        let task = tokio::spawn(Self::run(engine.clone(), interval));
        Self {
            engine,
            task: Some(task),
        }
    }

    pub fn engine(&self) -> Arc<SyncEngine> {
        self.engine.clone()
    }

    /// Cancel the timer and wait for the loop to exit.
    pub async fn stop(&mut self) {
        self.engine.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        tracing::info!("Live sensor sync stopped");
    }

    async fn run(engine: Arc<SyncEngine>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = engine.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = engine.cancel.cancelled() => break,
                outcome = engine.tick() => {
                    tracing::trace!(?outcome, "Sync tick complete");
                }
            }
        }
    }
}

impl Drop for LiveSensorSync {
    fn drop(&mut self) {
        self.engine.cancel.cancel();
    }
}
