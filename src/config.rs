//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `hub.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - ServerConfig: Where to listen and where the map page lives.
//!     - AuthConfig: The shared key sensor nodes must present.
//!     - LoggingConfig: Log filter and whether to echo every reading.
//!     - ZoneConfig: Circles that newly discovered sensors are placed in.
//!
//! ==============================================================================

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// environment variable that overrides `auth.api_key`
pub const API_KEY_ENV: &str = "AQI_HUB_API_KEY";

/// Root configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub show_sensor_data: bool,
}

/// a circular discovery zone: center plus radius, in degrees
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ZoneConfig {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { api_key: "SECRET_KEY_123".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), show_sensor_data: false }
    }
}

fn zone(name: &str, lat: f64, lng: f64) -> ZoneConfig {
    ZoneConfig { name: name.to_string(), lat, lng, radius: 0.005 }
}

/// the warsaw calibration clusters
fn default_zones() -> Vec<ZoneConfig> {
    vec![
        zone("Lazenki", 52.21496, 21.03371),
        zone("Pola", 52.21323, 21.00054),
        zone("park", 52.24281, 21.05586),
    ]
}

impl HubConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let mut config: HubConfig = toml::from_str(&content)
            .context("Failed to parse config")?;

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load with default fallback.
    ///
    /// runs before logging is set up, so instead of logging it returns the
    /// messages for the caller to emit once the subscriber exists.
    pub fn load_or_default() -> (Self, Vec<String>) {
        let paths = [
            std::path::PathBuf::from("config").join("hub.toml"),
            std::path::PathBuf::from("..").join("config").join("hub.toml"),
        ];
        let mut notes = Vec::new();

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        notes.push(format!("Loaded from {}", path.display()));
                        return (config, notes);
                    }
                    Err(e) => {
                        notes.push(format!("Warning: Failed to load {}: {:#}", path.display(), e));
                    }
                }
            }
        }

        notes.push("Warning: No usable config file found - using defaults".to_string());
        let mut config = Self::default();
        config.apply_env();
        (config, notes)
    }

    /// let the deployment environment supply the shared key
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.auth.api_key = key;
            }
        }
    }

    /// reject configurations the service cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.api_key.is_empty() {
            bail!("auth.api_key must not be empty");
        }
        if self.zones.is_empty() {
            bail!("at least one zone must be configured");
        }
        for z in &self.zones {
            if !z.radius.is_finite() || z.radius < 0.0 {
                bail!("zone '{}' has invalid radius {}", z.name, z.radius);
            }
        }
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        tracing::info!(
            bind = %self.server.bind_address,
            zones = self.zones.len(),
            level = %self.logging.level,
            "[CONFIG] hub configuration"
        );
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            zones: default_zones(),
        }
    }
}
