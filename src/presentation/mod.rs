// Presentation layer - HTTP surface over the live snapshot
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    asset_sensors, get_sensor, health_check, live_snapshot, refresh, sensor_summary,
    stream_snapshots,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sensors", get(live_snapshot))
        .route("/sensors/summary", get(sensor_summary))
        .route("/sensors/stream", get(stream_snapshots))
        .route("/sensors/refresh", post(refresh))
        .route("/sensors/:id", get(get_sensor))
        .route("/assets/:asset_id/sensors", get(asset_sensors))
        .with_state(state)
}
