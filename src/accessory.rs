use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bridge::FanBridge;
use crate::config::FanConfig;
use crate::logger::{RequestLogMode, RequestLogger};
use crate::notify::{NotificationPayload, NotificationRegistry};
use crate::types::{ActiveState, Characteristic, CharacteristicUpdate};
use crate::{Error, Result};

type UpdateCallback = Box<dyn Fn(&CharacteristicUpdate) + Send + Sync>;

/// Static identity block the platform shows next to the characteristics.
#[derive(Debug, Clone)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
}

impl Default for AccessoryInformation {
    fn default() -> Self {
        Self {
            manufacturer: "http-fan".to_string(),
            model: "HTTP Fan".to_string(),
            serial_number: "FAN02".to_string(),
            firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub struct FanAccessoryBuilder {
    config: FanConfig,
    information: AccessoryInformation,
    update_callbacks: Vec<UpdateCallback>,
    log_mode: Option<RequestLogMode>,
    log_path: Option<String>,
}

impl FanAccessoryBuilder {
    pub fn new(config: FanConfig) -> Self {
        Self {
            config,
            information: AccessoryInformation::default(),
            update_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn information(mut self, information: AccessoryInformation) -> Self {
        self.information = information;
        self
    }

    /// Called whenever an externally pushed update lands, so the host can
    /// forward the new value to the platform.
    pub fn on_update(mut self, f: impl Fn(&CharacteristicUpdate) + Send + Sync + 'static) -> Self {
        self.update_callbacks.push(Box::new(f));
        self
    }

    pub fn request_log(mut self, mode: RequestLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> FanAccessory {
        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => {
                Some(RequestLogger::new(mode, &path).expect("failed to open log file"))
            }
            _ => None,
        };

        FanAccessory {
            name: self.config.name.clone(),
            information: self.information,
            notification_id: self.config.notification_id.clone(),
            notification_password: self.config.notification_password.clone(),
            bridge: FanBridge::new(&self.config, logger),
            update_callbacks: self.update_callbacks,
        }
    }
}

/// The externally visible accessory: bridge characteristics plus static
/// identity metadata. Performs no logic of its own beyond wiring.
pub struct FanAccessory {
    name: String,
    information: AccessoryInformation,
    bridge: FanBridge,
    update_callbacks: Vec<UpdateCallback>,
    notification_id: Option<String>,
    notification_password: Option<String>,
}

impl FanAccessory {
    pub fn builder(config: FanConfig) -> FanAccessoryBuilder {
        FanAccessoryBuilder::new(config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Characteristics the host should register get/set handlers for.
    /// RotationSpeed appears only when its config section is present.
    pub fn characteristics(&self) -> Vec<Characteristic> {
        let mut characteristics = vec![Characteristic::Active];
        if self.bridge.rotation_speed_enabled() {
            characteristics.push(Characteristic::RotationSpeed);
        }
        characteristics
    }

    /// Direct access to the bridge operations.
    pub fn bridge(&self) -> &FanBridge {
        &self.bridge
    }

    /// Platform "get" handler for one characteristic.
    pub async fn read(&self, characteristic: Characteristic) -> Result<i64> {
        match characteristic {
            Characteristic::Active => Ok(self.bridge.get_active().await?.as_i64()),
            Characteristic::RotationSpeed => self.bridge.get_rotation_speed().await,
        }
    }

    /// Platform "set" handler for one characteristic.
    pub async fn write(&self, characteristic: Characteristic, value: i64) -> Result<()> {
        match characteristic {
            Characteristic::Active => {
                let state = ActiveState::from_i64(value)
                    .ok_or_else(|| Error::Protocol(format!("invalid active value: {value}")))?;
                self.bridge.set_active(state).await
            }
            Characteristic::RotationSpeed => self.bridge.set_rotation_speed(value).await,
        }
    }

    pub fn identify(&self) {
        info!(name = %self.name, "identify requested");
    }

    /// Applies an externally pushed update and echoes it to the platform
    /// through the update callbacks. Unknown characteristic names are
    /// dropped with a log line; the push channel has no caller to report
    /// errors back to.
    pub fn handle_notification(&self, payload: NotificationPayload) {
        let Some(characteristic) = Characteristic::from_name(&payload.characteristic) else {
            warn!(
                "encountered unknown characteristic handling notification: {}",
                payload.characteristic
            );
            return;
        };

        debug!(
            "updating '{}' to new value: {}",
            payload.characteristic, payload.value
        );

        let value = payload.value as i64;
        self.bridge.apply_external_update(characteristic, value);

        let update = CharacteristicUpdate {
            characteristic,
            value,
        };
        for callback in &self.update_callbacks {
            callback(&update);
        }
    }

    /// Call once the host platform has finished launching. Registers the
    /// notification handler when an id is configured; a taken id is
    /// logged and otherwise ignored.
    pub fn register_notifications(self: &Arc<Self>, registry: &mut dyn NotificationRegistry) {
        let Some(id) = self.notification_id.clone() else {
            return;
        };

        let accessory = Arc::clone(self);
        let handler = Box::new(move |payload: NotificationPayload| {
            accessory.handle_notification(payload);
        });

        match registry.register(&id, self.notification_password.as_deref(), handler) {
            Ok(()) => info!("detected running notification server, registered successfully"),
            Err(reason) => warn!(
                "could not register notification handler, id '{id}' is already taken: {reason}"
            ),
        }
    }
}
