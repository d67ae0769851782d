/*
 * Copyright (c) 2025. Cohort Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for the Cohort framework.
///
/// This struct contains all configurable values for Cohort, loaded from
/// TOML files in XDG-compliant directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CohortConfig {
    /// Limits and capacity configuration.
    pub limits: LimitsConfig,
    /// Default values configuration.
    pub defaults: DefaultsConfig,
    /// Tracing and logging configuration.
    pub tracing: TracingConfig,
    /// Path configuration for various directories.
    pub paths: PathsConfig,
    /// Behavioral configuration switches.
    pub behavior: BehaviorConfig,
}

/// Limits and capacity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Capacity of the receiver bridge's probe-to-loop event channel.
    pub event_channel_capacity: usize,
    /// Queue depth at which a destination inbox logs a backlog warning.
    pub backlog_warn_threshold: usize,
}

/// Default configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Rank that distributes bulk data in the pull protocol.
    pub distributor_rank: usize,
}

/// Tracing and logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub default_level: String,
}

/// Path configuration for various directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for log files.
    pub log_directory: String,
}

/// Behavioral configuration switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Write logs through a non-blocking file appender.
    pub log_to_file: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 16,
            backlog_warn_threshold: 1024,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { distributor_rank: 0 }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_directory: "~/.local/share/cohort/logs".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self { log_to_file: false }
    }
}

impl CohortConfig {
    /// Load configuration from XDG-compliant locations.
    ///
    /// This function attempts to load configuration from the following
    /// locations in order of preference:
    /// 1. `$XDG_CONFIG_HOME/cohort/config.toml` (Linux/macOS)
    /// 2. `~/.config/cohort/config.toml` (Linux fallback)
    /// 3. `~/Library/Application Support/cohort/config.toml` (macOS fallback)
    /// 4. `%APPDATA%/cohort/config.toml` (Windows)
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and
    /// uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        // Get the XDG base directories
        let xdg_dirs = match xdg::BaseDirectories::with_prefix("cohort") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        // Try to find the configuration file
        let config_path = xdg_dirs.find_config_file("config.toml");

        if let Some(path) = config_path {
            info!("Loading configuration from: {}", path.display());
            match std::fs::read_to_string(&path) {
                Ok(config_str) => match toml::from_str::<Self>(&config_str) {
                    Ok(config) => {
                        info!("Successfully loaded configuration");
                        config
                    }
                    Err(e) => {
                        error!("Failed to parse configuration file {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    error!("Failed to read configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            info!("No configuration file found, using defaults");
            Self::default()
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations.
    pub static ref CONFIG: CohortConfig = CohortConfig::load();
}
