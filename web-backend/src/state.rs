use anyhow::Context;
use numscan_core::{ScanConfig, ScannerManager};
use std::sync::Arc;

pub const CONFIG_PATH_ENV: &str = "NUMSCAN_CONFIG";

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ScannerManager>,
}

impl AppState {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            manager: Arc::new(ScannerManager::from_config(config)),
        }
    }

    /// Config file from `NUMSCAN_CONFIG` if set, then environment overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => ScanConfig::load(&path)
                .with_context(|| format!("Failed to load {} ({})", CONFIG_PATH_ENV, path))?,
            Err(_) => ScanConfig::default(),
        };
        let config = config.apply_env();

        if !config.disabled_scanners.is_empty() {
            tracing::info!(disabled = ?config.disabled_scanners, "Scanners disabled by configuration");
        }

        Ok(Self::new(&config))
    }
}
