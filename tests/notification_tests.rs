use std::sync::{Arc, Mutex};

use http_fan::{
    ActiveState, Characteristic, CharacteristicUpdate, FanAccessory, FanConfig,
    NotificationHandler, NotificationPayload, NotificationRegistry,
};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FakeRegistry {
    taken: Vec<String>,
    registered: Vec<(String, Option<String>, NotificationHandler)>,
}

impl FakeRegistry {
    fn new() -> Self {
        Self {
            taken: Vec::new(),
            registered: Vec::new(),
        }
    }
}

impl NotificationRegistry for FakeRegistry {
    fn register(
        &mut self,
        id: &str,
        password: Option<&str>,
        handler: NotificationHandler,
    ) -> Result<(), String> {
        if self.taken.iter().any(|t| t == id) {
            return Err(format!("id '{id}' is already taken"));
        }
        self.registered
            .push((id.to_string(), password.map(String::from), handler));
        Ok(())
    }
}

fn captured_updates() -> (
    Arc<Mutex<Vec<CharacteristicUpdate>>>,
    impl Fn(&CharacteristicUpdate) + Send + Sync + 'static,
) {
    let updates: Arc<Mutex<Vec<CharacteristicUpdate>>> = Arc::new(Mutex::new(vec![]));
    let updates_clone = updates.clone();
    (updates, move |update: &CharacteristicUpdate| {
        updates_clone.lock().unwrap().push(update.clone());
    })
}

#[tokio::test]
async fn notification_updates_state_and_emits_to_platform() {
    let (updates, callback) = captured_updates();
    let accessory = FanAccessory::builder(
        FanConfig::from_value(json!({ "name": "Fan", "rotationSpeed": {} })).unwrap(),
    )
    .on_update(callback)
    .build();

    accessory.handle_notification(NotificationPayload {
        characteristic: "RotationSpeed".to_string(),
        value: 60.0,
    });

    assert_eq!(accessory.bridge().last_rotation_speed(), Some(60));
    let captured = updates.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].characteristic, Characteristic::RotationSpeed);
    assert_eq!(captured[0].value, 60);
}

#[tokio::test]
async fn unknown_characteristic_is_dropped_silently() {
    let (updates, callback) = captured_updates();
    let accessory =
        FanAccessory::builder(FanConfig::from_value(json!({ "name": "Fan" })).unwrap())
            .on_update(callback)
            .build();

    accessory.handle_notification(NotificationPayload {
        characteristic: "SwingMode".to_string(),
        value: 1.0,
    });

    assert_eq!(accessory.bridge().last_active(), None);
    assert_eq!(accessory.bridge().last_rotation_speed(), None);
    assert!(updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn notification_suppresses_exactly_one_following_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/off"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/on"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let accessory = FanAccessory::builder(
        FanConfig::from_value(json!({
            "name": "Fan",
            "active": {
                "onUrl": format!("{}/on", server.uri()),
                "offUrl": format!("{}/off", server.uri())
            }
        }))
        .unwrap(),
    )
    .build();

    // The device reports it turned itself on; the platform echoes that
    // back as a set, which must not hit the device again.
    accessory.handle_notification(NotificationPayload {
        characteristic: "Active".to_string(),
        value: 1.0,
    });
    accessory.write(Characteristic::Active, 1).await.unwrap();
    assert_eq!(accessory.bridge().last_active(), Some(ActiveState::Active));
    assert!(server.received_requests().await.unwrap().is_empty());

    // A genuine set afterwards goes out on the wire.
    accessory.write(Characteristic::Active, 0).await.unwrap();
    assert_eq!(accessory.bridge().last_active(), Some(ActiveState::Inactive));
}

#[tokio::test]
async fn suppression_is_shared_across_characteristics() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let accessory = FanAccessory::builder(
        FanConfig::from_value(json!({
            "name": "Fan",
            "active": { "onUrl": format!("{}/on", server.uri()) },
            "rotationSpeed": { "setUrl": format!("{}/speed?v=%s", server.uri()) }
        }))
        .unwrap(),
    )
    .build();

    // An Active notification swallows the next RotationSpeed set too.
    accessory.handle_notification(NotificationPayload {
        characteristic: "Active".to_string(),
        value: 1.0,
    });
    accessory.write(Characteristic::RotationSpeed, 75).await.unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn registers_handler_once_platform_is_ready() {
    let accessory = Arc::new(
        FanAccessory::builder(
            FanConfig::from_value(json!({
                "name": "Fan",
                "notificationID": "living-room-fan",
                "notificationPassword": "secret"
            }))
            .unwrap(),
        )
        .build(),
    );

    let mut registry = FakeRegistry::new();
    accessory.register_notifications(&mut registry);

    assert_eq!(registry.registered.len(), 1);
    let (id, password, handler) = &registry.registered[0];
    assert_eq!(id, "living-room-fan");
    assert_eq!(password.as_deref(), Some("secret"));

    // A payload pushed through the registered handler reaches the bridge.
    handler(NotificationPayload {
        characteristic: "Active".to_string(),
        value: 1.0,
    });
    assert_eq!(accessory.bridge().last_active(), Some(ActiveState::Active));
}

#[tokio::test]
async fn registration_skipped_without_notification_id() {
    let accessory = Arc::new(
        FanAccessory::builder(FanConfig::from_value(json!({ "name": "Fan" })).unwrap()).build(),
    );

    let mut registry = FakeRegistry::new();
    accessory.register_notifications(&mut registry);
    assert!(registry.registered.is_empty());
}

#[tokio::test]
async fn duplicate_id_registration_is_not_fatal() {
    let accessory = Arc::new(
        FanAccessory::builder(
            FanConfig::from_value(json!({ "name": "Fan", "notificationID": "fan" })).unwrap(),
        )
        .build(),
    );

    let mut registry = FakeRegistry::new();
    registry.taken.push("fan".to_string());
    accessory.register_notifications(&mut registry);
    assert!(registry.registered.is_empty());
}
