//! Optional YAML configuration for `hid-replay`.
//!
//! ```yaml
//! log_level: debug
//! output: json
//! product_id: 0x00BD
//! session:
//!   max_retries: 2
//!   start_speed: low
//!   send_tablet_mode: false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tablet_hid_wacom_bt_protocol::{SessionConfig, Speed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Session settings as they appear in the file; unset fields keep the
/// protocol defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    pub max_retries: Option<u8>,
    pub start_speed: Option<Speed>,
    pub send_tablet_mode: Option<bool>,
}

impl SessionSettings {
    pub fn to_session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            start_speed: self.start_speed.unwrap_or(defaults.start_speed),
            send_tablet_mode: self.send_tablet_mode.unwrap_or(defaults.send_tablet_mode),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset and no `-v`
    /// flag was given.
    pub log_level: Option<String>,
    pub output: OutputFormat,
    /// Product id used when a capture file does not name a supported one.
    pub product_id: Option<u16>,
    pub session: SessionSettings,
}

impl ReplayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse YAML")
    }
}
