// Application layer - Live sensor sync and its collaborators
pub mod live_sync;
pub mod sensor_feed;
pub mod simulation;
