use std::sync::Mutex;

use tracing::{debug, warn};

use crate::config::{ActiveConfig, FanConfig, RotationSpeedConfig};
use crate::http::HttpExecutor;
use crate::logger::RequestLogger;
use crate::types::{ActiveState, Characteristic};
use crate::{Error, Result};

/// Placeholder token replaced with the target value in set URLs.
const URL_VALUE_TOKEN: &str = "%s";

#[derive(Debug, Default)]
struct BridgeState {
    active: Option<ActiveState>,
    rotation_speed: Option<i64>,
    /// One flag for the whole accessory, not one per characteristic: a
    /// pushed notification marks the next set request as an echo,
    /// whichever characteristic that set targets.
    ignore_next_set: bool,
}

/// Maps the accessory's characteristics onto the configured device URLs
/// and keeps the last value seen for each.
///
/// Every get/set completes exactly once with a success or an error; none
/// of the operations retry, queue, or enforce a timeout beyond the
/// transport default.
pub struct FanBridge {
    executor: HttpExecutor,
    active: ActiveConfig,
    rotation_speed: Option<RotationSpeedConfig>,
    state: Mutex<BridgeState>,
    logger: Option<Mutex<RequestLogger>>,
}

impl FanBridge {
    pub(crate) fn new(config: &FanConfig, logger: Option<RequestLogger>) -> Self {
        Self {
            executor: HttpExecutor::new(),
            active: config.active.clone().unwrap_or_default(),
            rotation_speed: config.rotation_speed.clone(),
            state: Mutex::new(BridgeState::default()),
            logger: logger.map(Mutex::new),
        }
    }

    pub fn rotation_speed_enabled(&self) -> bool {
        self.rotation_speed.is_some()
    }

    /// Last power state established by a completed round-trip or a
    /// pushed update.
    pub fn last_active(&self) -> Option<ActiveState> {
        self.state.lock().unwrap().active
    }

    pub fn last_rotation_speed(&self) -> Option<i64> {
        self.state.lock().unwrap().rotation_speed
    }

    /// Reads the power state from `active.statusUrl`. The device must
    /// answer with exactly `0` or `1`; status reads always use GET.
    pub async fn get_active(&self) -> Result<ActiveState> {
        let body = self
            .request(
                "get_active",
                self.active.status_url.as_deref(),
                "GET",
                "active.statusUrl",
            )
            .await?;

        let value = match body.trim().parse::<i64>() {
            Ok(0) => ActiveState::Inactive,
            Ok(1) => ActiveState::Active,
            Ok(other) => return Err(self.invalid_active(&other.to_string())),
            Err(_) => return Err(self.invalid_active(body.trim())),
        };

        debug!("fan is currently {value}");
        self.state.lock().unwrap().active = Some(value);
        Ok(value)
    }

    /// Drives the power state through `active.onUrl`/`active.offUrl`.
    /// Consumes a pending suppression first: a set that follows a pushed
    /// notification is already applied on the device and sends nothing.
    pub async fn set_active(&self, value: ActiveState) -> Result<()> {
        if self.consume_suppressed_set() {
            debug!("set_active: pushed update already applied, no request sent");
            return Ok(());
        }

        let (url, url_name) = match value {
            ActiveState::Active => (self.active.on_url.as_deref(), "active.onUrl"),
            ActiveState::Inactive => (self.active.off_url.as_deref(), "active.offUrl"),
        };

        self.request("set_active", url, &self.active.http_method, url_name)
            .await?;

        debug!("fan successfully set to {value}");
        self.state.lock().unwrap().active = Some(value);
        Ok(())
    }

    /// Reads the speed from `rotationSpeed.statusUrl`. Any integer the
    /// device reports is passed through unclamped; the platform side
    /// owns range handling.
    pub async fn get_rotation_speed(&self) -> Result<i64> {
        let config = self.rotation_speed_config()?;
        let body = self
            .request(
                "get_rotation_speed",
                config.status_url.as_deref(),
                "GET",
                "rotationSpeed.statusUrl",
            )
            .await?;

        let speed = body.trim().parse::<i64>().map_err(|_| {
            Error::Protocol(format!(
                "rotationSpeed.statusUrl responded with an invalid value: {}",
                body.trim()
            ))
        })?;

        debug!("rotation speed is currently at {speed} %");
        self.state.lock().unwrap().rotation_speed = Some(speed);
        Ok(speed)
    }

    /// Drives the speed through `rotationSpeed.setUrl`, substituting the
    /// first `%s` in the template with the decimal value. A template
    /// without the token is used verbatim.
    pub async fn set_rotation_speed(&self, value: i64) -> Result<()> {
        if self.consume_suppressed_set() {
            debug!("set_rotation_speed: pushed update already applied, no request sent");
            return Ok(());
        }

        let config = self.rotation_speed_config()?;
        let url = config
            .set_url
            .as_deref()
            .map(|template| substitute_value(template, value));

        self.request(
            "set_rotation_speed",
            url.as_deref(),
            &config.http_method,
            "rotationSpeed.setUrl",
        )
        .await?;

        debug!("rotation speed successfully set to {value} %");
        self.state.lock().unwrap().rotation_speed = Some(value);
        Ok(())
    }

    /// Ingress half of the echo-suppression protocol: records the pushed
    /// value and arms the flag in one locked step, so a concurrent set
    /// observes either both or neither.
    pub(crate) fn apply_external_update(&self, characteristic: Characteristic, value: i64) {
        if let Some(logger) = &self.logger {
            logger
                .lock()
                .unwrap()
                .log_notification(characteristic.as_name(), value);
        }

        let mut state = self.state.lock().unwrap();
        state.ignore_next_set = true;
        match characteristic {
            Characteristic::Active => {
                if let Some(active) = ActiveState::from_i64(value) {
                    state.active = Some(active);
                }
            }
            Characteristic::RotationSpeed => state.rotation_speed = Some(value),
        }
    }

    fn consume_suppressed_set(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.ignore_next_set {
            state.ignore_next_set = false;
            true
        } else {
            false
        }
    }

    fn rotation_speed_config(&self) -> Result<&RotationSpeedConfig> {
        self.rotation_speed
            .as_ref()
            .ok_or_else(|| Error::Config("'rotationSpeed' is not configured".to_string()))
    }

    fn invalid_active(&self, value: &str) -> Error {
        warn!("active.statusUrl responded with an invalid value: {value}");
        Error::Protocol(format!(
            "active.statusUrl responded with an invalid value: {value}"
        ))
    }

    async fn request(
        &self,
        operation: &str,
        url: Option<&str>,
        method: &str,
        url_name: &str,
    ) -> Result<String> {
        let Some(url) = url else {
            warn!("ignoring {operation}() request, '{url_name}' is not defined");
            return Err(Error::Config(format!("no '{url_name}' defined")));
        };

        if let Some(logger) = &self.logger {
            logger.lock().unwrap().log_request(operation, method, url);
        }

        match self.executor.perform(url, method).await {
            Ok(body) => {
                if let Some(logger) = &self.logger {
                    logger.lock().unwrap().log_response(operation, &body);
                }
                Ok(body)
            }
            Err(e) => {
                match &e {
                    Error::Status(code) => debug!("{operation}() returned http error: {code}"),
                    other => debug!("{operation}() failed: {other}"),
                }
                if let Some(logger) = &self.logger {
                    logger.lock().unwrap().log_error(operation, &e);
                }
                Err(e)
            }
        }
    }
}

fn substitute_value(template: &str, value: i64) -> String {
    template.replacen(URL_VALUE_TOKEN, &value.to_string(), 1)
}
