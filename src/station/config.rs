//! Station configuration

use std::time::Duration;

use crate::registry::RegistryConfig;

/// Station configuration options
#[derive(Debug, Clone)]
pub struct StationConfig {
    /// Subscriber registry settings
    pub registry: RegistryConfig,

    /// How often an idle station checks for a non-empty playlist
    pub idle_poll_interval: Duration,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            idle_poll_interval: Duration::from_secs(1),
        }
    }
}

impl StationConfig {
    /// Set the registry configuration
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Set the idle poll interval (at least one millisecond)
    pub fn idle_poll_interval(mut self, interval: Duration) -> Self {
        self.idle_poll_interval = interval.max(Duration::from_millis(1));
        self
    }
}
