use std::time::Duration;

use serde::Deserialize;

use crate::error::EngineError;

/// Engine connection settings, loaded from the environment.
///
/// Variables are prefixed with `BPM`, e.g. `BPM_BASE_URL`,
/// `BPM_REQUEST_TIMEOUT_SECS`. A `.env` file is honored when present.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/engine-rest".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl EngineConfig {
    pub fn load() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("BPM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn load_falls_back_to_defaults() {
        std::env::remove_var("BPM_BASE_URL");
        std::env::remove_var("BPM_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("BPM_REQUEST_TIMEOUT_SECS");
        let config = EngineConfig::load().expect("config should load");
        assert_eq!(config.base_url, "http://localhost:8080/engine-rest");
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn load_reads_prefixed_environment_variables() {
        std::env::set_var("BPM_BASE_URL", "http://engine:8080/engine-rest");
        std::env::set_var("BPM_REQUEST_TIMEOUT_SECS", "10");
        let config = EngineConfig::load().expect("config should load");
        assert_eq!(config.base_url, "http://engine:8080/engine-rest");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        std::env::remove_var("BPM_BASE_URL");
        std::env::remove_var("BPM_REQUEST_TIMEOUT_SECS");
    }

    /// A single underscore separates the prefix from the field name; the
    /// double underscore is reserved for nesting and must not be accepted
    /// as the prefix separator.
    #[test]
    #[serial]
    fn load_splits_the_prefix_on_a_single_underscore() {
        std::env::set_var("BPM_BASE_URL", "http://engine:8080/engine-rest");
        std::env::set_var("BPM__BASE_URL", "http://nested:8080/engine-rest");
        let config = EngineConfig::load().expect("config should load");
        assert_eq!(config.base_url, "http://engine:8080/engine-rest");
        std::env::remove_var("BPM_BASE_URL");
        std::env::remove_var("BPM__BASE_URL");
    }
}
