use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const NUMVERIFY_API_KEY_ENV: &str = "NUMVERIFY_API_KEY";
pub const DISABLED_SCANNERS_ENV: &str = "NUMSCAN_DISABLED_SCANNERS";

const NUMVERIFY_ENDPOINT: &str = "https://api.apilayer.com/number_verification/validate";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Scanners skipped on every scan
    pub disabled_scanners: Vec<String>,
    pub max_concurrency: Option<usize>,
    pub numverify: NumverifyConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NumverifyConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for NumverifyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: NUMVERIFY_ENDPOINT.to_string(),
        }
    }
}

impl ScanConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_yaml(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(NUMVERIFY_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.numverify.api_key = Some(key.trim().to_string());
        }

        if let Some(list) = lookup(DISABLED_SCANNERS_ENV) {
            for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                if !self.disabled_scanners.iter().any(|existing| existing == id) {
                    self.disabled_scanners.push(id.to_string());
                }
            }
        }

        self
    }
}
