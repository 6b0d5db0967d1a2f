// HTTP request handlers
use crate::application::live_sync::TickOutcome;
use crate::domain::sensor::SensorReading;
use crate::domain::snapshot::{LiveSnapshot, Provenance, StatusSummary};
use crate::infrastructure::snapshot_events::snapshot_events;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: StatusSummary,
    pub connected: bool,
    pub last_sync: DateTime<Utc>,
    pub provenance: Provenance,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorDetail {
    #[serde(flatten)]
    pub sensor: SensorReading,
    pub frequency_shift_pct: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub outcome: TickOutcome,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full live snapshot
pub async fn live_snapshot(State(state): State<Arc<AppState>>) -> Json<LiveSnapshot> {
    Json(state.sync.snapshot())
}

/// Status counts for the summary cards
pub async fn sensor_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let snapshot = state.sync.snapshot();
    Json(SummaryResponse {
        summary: snapshot.summary(),
        connected: snapshot.connected,
        last_sync: snapshot.last_sync,
        provenance: snapshot.provenance,
    })
}

pub async fn get_sensor(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SensorDetail>, StatusCode> {
    let snapshot = state.sync.snapshot();
    let sensor = snapshot.find(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(SensorDetail {
        frequency_shift_pct: sensor.frequency_shift_pct(),
        sensor: sensor.clone(),
    }))
}

pub async fn asset_sensors(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SensorReading>> {
    Json(state.sync.snapshot().for_asset(&asset_id))
}

/// Run one sync tick now instead of waiting for the timer
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let outcome = state.sync.tick().await;
    tracing::info!(?outcome, "Manual sensor refresh");
    Json(RefreshResponse { outcome })
}

pub async fn stream_snapshots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    snapshot_events(state.sync.subscribe(), state.sync.shutdown_token())
}
