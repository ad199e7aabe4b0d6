use serde::Deserialize;

/// Externally pushed state update for one characteristic. Validated and
/// discarded per call, never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPayload {
    pub characteristic: String,
    pub value: f64,
}

/// Handler the registry invokes for each pushed update.
pub type NotificationHandler = Box<dyn Fn(NotificationPayload) + Send + Sync>;

/// Out-of-band channel through which the physical device pushes state
/// changes without being polled.
///
/// The service behind this trait typically becomes available only after
/// the host platform finishes launching; hosts call
/// [`crate::FanAccessory::register_notifications`] once it signals
/// readiness. Password checking is entirely the registry's business.
pub trait NotificationRegistry {
    /// Registers `handler` under `id`. Fails when the id is already
    /// taken; the caller treats that as non-fatal.
    fn register(
        &mut self,
        id: &str,
        password: Option<&str>,
        handler: NotificationHandler,
    ) -> std::result::Result<(), String>;
}
