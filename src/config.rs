use serde::Deserialize;

use crate::{Error, Result};

fn default_http_method() -> String {
    "GET".to_string()
}

/// Accessory configuration as the host platform hands it over.
///
/// Presence of the `rotationSpeed` object is what enables the
/// rotation-speed characteristic; without it the characteristic is never
/// exposed. Key spellings follow the external config schema
/// (`onUrl`, `statusUrl`, `notificationID`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanConfig {
    pub name: String,
    #[serde(default)]
    pub active: Option<ActiveConfig>,
    #[serde(default)]
    pub rotation_speed: Option<RotationSpeedConfig>,
    #[serde(default, rename = "notificationID")]
    pub notification_id: Option<String>,
    #[serde(default)]
    pub notification_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveConfig {
    #[serde(default = "default_http_method")]
    pub http_method: String,
    #[serde(default)]
    pub on_url: Option<String>,
    #[serde(default)]
    pub off_url: Option<String>,
    #[serde(default)]
    pub status_url: Option<String>,
}

impl Default for ActiveConfig {
    fn default() -> Self {
        Self {
            http_method: default_http_method(),
            on_url: None,
            off_url: None,
            status_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSpeedConfig {
    #[serde(default = "default_http_method")]
    pub http_method: String,
    #[serde(default)]
    pub set_url: Option<String>,
    #[serde(default)]
    pub status_url: Option<String>,
}

impl Default for RotationSpeedConfig {
    fn default() -> Self {
        Self {
            http_method: default_http_method(),
            set_url: None,
            status_url: None,
        }
    }
}

impl FanConfig {
    /// Parse the config block a platform hands over as loose JSON.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Config(format!("invalid fan config: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid fan config: {e}")))
    }
}
