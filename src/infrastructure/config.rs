use crate::application::live_sync::DEFAULT_SYNC_INTERVAL;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub sync: SyncSettings,
    pub seed: SeedSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    pub endpoint: String,
    pub interval_secs: u64,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedSettings {
    pub path: String,
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("sync.endpoint", "http://127.0.0.1:9090/api/sensors/live")?
        .set_default("sync.interval_secs", DEFAULT_SYNC_INTERVAL.as_secs())?
        .set_default("sync.request_timeout_ms", 4000)?
        .set_default("seed.path", "config/sensors.json")?)
}

/// Load `config/live_sensors.*` with `SHM_` environment overrides
/// (`SHM_SYNC__ENDPOINT`, `SHM_SERVER__BIND`, ...).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/live_sensors").required(false))
        .add_source(
            config::Environment::with_prefix("SHM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
