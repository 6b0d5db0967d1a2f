// Application state for HTTP handlers
use crate::application::live_sync::SyncEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncEngine>,
}
