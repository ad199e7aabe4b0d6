mod accessory;
mod bridge;
mod config;
mod error;
mod http;
mod logger;
mod notify;
mod types;

pub use accessory::{AccessoryInformation, FanAccessory, FanAccessoryBuilder};
pub use bridge::FanBridge;
pub use config::{ActiveConfig, FanConfig, RotationSpeedConfig};
pub use error::{Error, Result};
pub use logger::RequestLogMode;
pub use notify::{NotificationHandler, NotificationPayload, NotificationRegistry};
pub use types::*;
