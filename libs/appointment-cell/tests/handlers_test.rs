mod common;

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, AppointmentRecord};
use appointment_cell::router::{appointment_routes_with_state, AppointmentState};
use appointment_cell::services::AppointmentStore;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

use common::{RecordingNotifier, RecordingStore};

/// Store that discards a booking flow while its appointment is being saved,
/// as a concurrent DELETE on the same flow would.
#[derive(Default)]
struct FlowDiscardingStore {
    target: Mutex<Option<(Weak<AppointmentState>, Uuid, String)>>,
    inserts: Mutex<Vec<AppointmentRecord>>,
}

#[async_trait]
impl AppointmentStore for FlowDiscardingStore {
    async fn insert_appointment(&self, record: &AppointmentRecord, _auth_token: &str) -> Result<(), AppointmentError> {
        self.inserts.lock().unwrap().push(record.clone());

        let target = self.target.lock().unwrap().take();
        if let Some((state, flow_id, owner_id)) = target {
            if let Some(state) = state.upgrade() {
                state.flows.remove(flow_id, &owner_id).await?;
            }
        }
        Ok(())
    }
}

struct TestApp {
    router: Router,
    store: Arc<RecordingStore>,
    notifier: Arc<RecordingNotifier>,
    config: TestConfig,
}

impl TestApp {
    fn new() -> Self {
        Self::with_doubles(RecordingStore::default(), RecordingNotifier::default())
    }

    fn with_doubles(store: RecordingStore, notifier: RecordingNotifier) -> Self {
        let config = TestConfig::default();
        let store = Arc::new(store);
        let notifier = Arc::new(notifier);
        let state = AppointmentState::with_services(config.to_arc(), store.clone(), notifier.clone());

        Self {
            router: appointment_routes_with_state(Arc::new(state)),
            store,
            notifier,
            config,
        }
    }

    fn token_for(&self, user: &TestUser) -> String {
        JwtTestUtils::create_test_token(user, &self.config.jwt_secret, None)
    }

    async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_booking_requires_sign_in() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            "POST",
            "/",
            None,
            Some(json!({ "doctor_id": 1, "day": "Monday", "time": "9:00 AM", "reason": "Checkup" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["redirect"], "/auth/signin");
    assert_eq!(app.store.insert_count(), 0);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new();
    let user = TestUser::patient("jane@example.com");
    let token = JwtTestUtils::create_expired_token(&user, &app.config.jwt_secret);

    let (status, _) = app.call("POST", "/flows", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_one_shot_booking() {
    let app = TestApp::new();
    let user = TestUser::patient("jane@example.com").with_name("Jane");
    let token = app.token_for(&user);

    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(&token),
            Some(json!({ "doctor_id": 2, "day": "Thursday", "time": "10:00 AM", "reason": "Headaches" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["doctor_name"], "Dr. James Williams");
    assert_eq!(body["notification_sent"], true);
    assert_eq!(
        body["message"],
        "Your appointment with Dr. James Williams on Thursday at 10:00 AM has been confirmed."
    );

    let record = app.store.last_record().unwrap();
    assert_eq!(record.user_id, user.id);
    assert_eq!(app.store.inserts.lock().unwrap()[0].1, token);
    assert_eq!(app.notifier.sent_count(), 1);
}

#[tokio::test]
async fn test_one_shot_booking_with_blank_reason() {
    let app = TestApp::new();
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(&token),
            Some(json!({ "doctor_id": 2, "day": "Thursday", "time": "10:00 AM", "reason": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a reason for your visit");
}

#[tokio::test]
async fn test_full_flow_walkthrough() {
    let app = TestApp::new();
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (status, flow) = app.call("POST", "/flows", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(flow["step"], "search");
    assert_eq!(flow["doctors"].as_array().unwrap().len(), 3);
    let flow_id = flow["id"].as_str().unwrap().to_string();
    let base = format!("/flows/{}", flow_id);

    let (status, flow) = app
        .call("PUT", &format!("{}/search", base), Some(&token), Some(json!({ "specialty": "pedia" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flow["doctors"].as_array().unwrap().len(), 1);

    let (status, flow) = app
        .call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "select" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flow["step"], "select");

    let (status, flow) = app
        .call(
            "POST",
            &format!("{}/slot", base),
            Some(&token),
            Some(json!({ "doctor_id": 3, "day": "Wednesday", "time": "1:00 PM" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flow["step"], "details");
    assert_eq!(flow["selection"]["doctor_name"], "Dr. Emily Rodriguez");

    let (status, _) = app
        .call("PUT", &format!("{}/reason", base), Some(&token), Some(json!({ "reason": "Annual checkup" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call("POST", &format!("{}/submit", base), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confirmation"]["day"], "Wednesday");
    assert_eq!(body["flow"]["step"], "search");
    assert_eq!(body["flow"]["reason"], "");
    assert!(body["flow"]["selection"].is_null());
    assert_eq!(app.store.last_record().unwrap().reason, "Annual checkup");
}

#[tokio::test]
async fn test_persistence_failure_keeps_flow_in_details() {
    let app = TestApp::with_doubles(
        RecordingStore::failing("duplicate key value violates unique constraint"),
        RecordingNotifier::default(),
    );
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (_, flow) = app.call("POST", "/flows", Some(&token), None).await;
    let base = format!("/flows/{}", flow["id"].as_str().unwrap());
    app.call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "select" })))
        .await;
    app.call(
        "POST",
        &format!("{}/slot", base),
        Some(&token),
        Some(json!({ "doctor_id": 1, "day": "Friday", "time": "3:00 PM" })),
    )
    .await;
    app.call("PUT", &format!("{}/reason", base), Some(&token), Some(json!({ "reason": "Follow-up" })))
        .await;

    let (status, body) = app.call("POST", &format!("{}/submit", base), Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "duplicate key value violates unique constraint");

    let (_, flow) = app.call("GET", &base, Some(&token), None).await;
    assert_eq!(flow["step"], "details");
    assert_eq!(flow["reason"], "Follow-up");
    assert_eq!(flow["selection"]["time"], "3:00 PM");
    assert_eq!(app.notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_notification_failure_still_succeeds_over_http() {
    let app = TestApp::with_doubles(RecordingStore::default(), RecordingNotifier::failing());
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (status, body) = app
        .call(
            "POST",
            "/",
            Some(&token),
            Some(json!({ "doctor_id": 1, "day": "Wednesday", "time": "11:00 AM", "reason": "Palpitations" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notification_sent"], false);
    assert_eq!(app.store.insert_count(), 1);
}

#[tokio::test]
async fn test_step_guards() {
    let app = TestApp::new();
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (_, flow) = app.call("POST", "/flows", Some(&token), None).await;
    let base = format!("/flows/{}", flow["id"].as_str().unwrap());

    let (status, _) = app
        .call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "details" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.call("PUT", &format!("{}/search", base), Some(&token), Some(json!({ "name": "nobody" })))
        .await;
    let (status, body) = app
        .call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "select" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No doctors match your search criteria");

    let (status, _) = app
        .call("PUT", &format!("{}/reason", base), Some(&token), Some(json!({ "reason": "Too early" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.call("POST", &format!("{}/submit", base), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.store.insert_count(), 0);
}

#[tokio::test]
async fn test_flows_are_private_to_their_owner() {
    let app = TestApp::new();
    let owner_token = app.token_for(&TestUser::patient("owner@example.com"));
    let other_token = app.token_for(&TestUser::patient("other@example.com"));

    let (_, flow) = app.call("POST", "/flows", Some(&owner_token), None).await;
    let base = format!("/flows/{}", flow["id"].as_str().unwrap());

    let (status, _) = app.call("GET", &base, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call("DELETE", &base, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call("DELETE", &base, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call("GET", &base, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_succeeds_when_flow_is_discarded_during_save() {
    let config = TestConfig::default();
    let store = Arc::new(FlowDiscardingStore::default());
    let state = Arc::new(AppointmentState::with_services(
        config.to_arc(),
        store.clone(),
        Arc::new(RecordingNotifier::default()),
    ));
    let app = TestApp {
        router: appointment_routes_with_state(state.clone()),
        store: Arc::new(RecordingStore::default()),
        notifier: Arc::new(RecordingNotifier::default()),
        config,
    };
    let user = TestUser::patient("jane@example.com");
    let token = app.token_for(&user);

    let (_, flow) = app.call("POST", "/flows", Some(&token), None).await;
    let flow_id: Uuid = flow["id"].as_str().unwrap().parse().unwrap();
    let base = format!("/flows/{}", flow_id);
    app.call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "select" })))
        .await;
    app.call(
        "POST",
        &format!("{}/slot", base),
        Some(&token),
        Some(json!({ "doctor_id": 2, "day": "Tuesday", "time": "1:00 PM" })),
    )
    .await;
    app.call("PUT", &format!("{}/reason", base), Some(&token), Some(json!({ "reason": "Dizziness" })))
        .await;

    *store.target.lock().unwrap() = Some((Arc::downgrade(&state), flow_id, user.id.clone()));

    let (status, body) = app.call("POST", &format!("{}/submit", base), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confirmation"]["doctor_name"], "Dr. James Williams");
    assert!(body["flow"].is_null());
    assert_eq!(store.inserts.lock().unwrap().len(), 1);

    let (status, _) = app.call("GET", &base, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_slot_must_belong_to_a_listed_doctor() {
    let app = TestApp::new();
    let token = app.token_for(&TestUser::patient("jane@example.com"));

    let (_, flow) = app.call("POST", "/flows", Some(&token), None).await;
    let base = format!("/flows/{}", flow["id"].as_str().unwrap());
    app.call("PUT", &format!("{}/search", base), Some(&token), Some(json!({ "specialty": "cardio" })))
        .await;
    app.call("POST", &format!("{}/step", base), Some(&token), Some(json!({ "step": "select" })))
        .await;

    let (status, body) = app
        .call(
            "POST",
            &format!("{}/slot", base),
            Some(&token),
            Some(json!({ "doctor_id": 3, "day": "Monday", "time": "8:00 AM" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Doctor 3 is not among the doctors matching your search");

    let (_, flow) = app.call("GET", &base, Some(&token), None).await;
    assert_eq!(flow["step"], "select");
    assert!(flow["selection"].is_null());
}
