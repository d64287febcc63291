use api_client::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared::domain::{IsolateId, OtuId, ReferenceId, SampleId, SequenceId};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::{net::TcpListener, sync::Notify};

use super::*;
use crate::{
    state::RootState,
    store::{MemoryHistory, TracingReporter},
};

#[derive(Default)]
struct ScriptedTransport {
    routes: HashMap<String, (u16, Value)>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn respond(mut self, path: &str, status: u16, body: Value) -> Self {
        self.routes.insert(path.to_string(), (status, body));
        self
    }

    fn gate(mut self, path: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(path.to_string(), gate);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls
            .lock()
            .push(format!("{} {}", request.method, request.path));
        if let Some(gate) = self.gates.get(&request.path) {
            gate.notified().await;
        }
        match self.routes.get(&request.path) {
            Some((status, body)) => Ok(ApiResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(TransportError::Network(format!(
                "connection refused: {}",
                request.path
            ))),
        }
    }
}

fn start(transport: impl Transport + 'static) -> OrchestratorHandle {
    let store = Store::new(
        Arc::new(MemoryHistory::default()),
        Arc::new(TracingReporter),
    );
    Orchestrator::start(store, Arc::new(transport), Duration::from_secs(5))
}

async fn wait_for(store: &Store, predicate: impl Fn(&RootState) -> bool) {
    let mut snapshots = store.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let done = predicate(&snapshots.borrow_and_update());
            if done {
                return;
            }
            snapshots.changed().await.expect("store alive");
        }
    })
    .await
    .expect("state reached");
}

fn get_otu(id: &str) -> Request {
    Request::GetOtu {
        otu_id: OtuId::from(id),
    }
}

#[tokio::test]
async fn latest_wins_drops_the_superseded_detail() {
    let gate = Arc::new(Notify::new());
    let transport = ScriptedTransport::default()
        .respond("/otus/a", 200, json!({"id": "a", "version": 1}))
        .respond("/otus/b", 200, json!({"id": "b", "version": 1}))
        .gate("/otus/a", Arc::clone(&gate));
    let effects = start(transport);

    effects.store().dispatch(Action::Requested(get_otu("a")));
    let completion = effects.settle(get_otu("b")).await.expect("settled");
    assert!(completion.is_success());

    gate.notify_waiters();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = effects.store().state();
    assert!(state.otus.resource.get("a").is_none());
    assert!(state.otus.resource.get("b").is_some());
    assert!(!state.otus.resource.is_pending(Category::GetOtu));
}

#[tokio::test]
async fn api_failures_carry_status_and_server_message() {
    let transport = ScriptedTransport::default().respond(
        "/samples/missing",
        404,
        json!({"id": "not_found", "message": "Sample not found"}),
    );
    let effects = start(transport);

    let completion = effects
        .settle(Request::GetSample {
            sample_id: SampleId::from("missing"),
        })
        .await
        .expect("settled");

    let failure = completion.failure().expect("failed");
    assert_eq!(failure.status, 404);
    assert_eq!(failure.message, "Sample not found");
    let state = effects.store().state();
    assert!(state.errors.get(Category::GetSample).is_some());
}

#[tokio::test]
async fn failures_without_a_message_use_the_reason_phrase() {
    let transport = ScriptedTransport::default().respond("/otus/x", 503, Value::Null);
    let effects = start(transport);

    let completion = effects.settle(get_otu("x")).await.expect("settled");

    let failure = completion.failure().expect("failed");
    assert_eq!(failure.status, 503);
    assert_eq!(failure.message, "Service Unavailable");
}

#[tokio::test]
async fn malformed_success_bodies_become_failures() {
    let transport = ScriptedTransport::default().respond("/otus/x", 200, json!([1, 2, 3]));
    let effects = start(transport);

    let completion = effects.settle(get_otu("x")).await.expect("settled");

    let failure = completion.failure().expect("failed");
    assert_eq!(failure.status, 200);
    assert!(failure.message.starts_with("malformed response"));
}

#[tokio::test]
async fn transport_errors_fail_with_status_zero() {
    let effects = start(ScriptedTransport::default());

    let completion = effects.settle(get_otu("x")).await.expect("settled");

    let failure = completion.failure().expect("failed");
    assert!(failure.is_transport());
    assert!(failure.message.contains("connection refused"));
}

#[tokio::test]
async fn sequence_removal_refetches_the_otu_and_its_history() {
    let transport = ScriptedTransport::default()
        .respond("/otus/o1/isolates/i1/sequences/s1", 204, Value::Null)
        .respond(
            "/otus/o1",
            200,
            json!({"id": "o1", "isolates": [{"id": "i1", "sequences": [{"id": "s2"}]}]}),
        )
        .respond("/otus/o1/history", 200, json!([{"id": "o1.4"}]));
    let effects = start(transport);

    let completion = effects
        .settle(Request::RemoveSequence {
            otu_id: OtuId::from("o1"),
            isolate_id: IsolateId::from("i1"),
            sequence_id: SequenceId::from("s1"),
        })
        .await
        .expect("settled");
    assert!(completion.is_success());

    wait_for(effects.store(), |state| {
        state.otus.resource.get("o1").is_some() && state.otus.history.contains_key("o1")
    })
    .await;
}

#[tokio::test]
async fn superseded_settles_time_out() {
    let gate = Arc::new(Notify::new());
    let transport = ScriptedTransport::default()
        .respond("/otus/a", 200, json!({"id": "a"}))
        .respond("/otus/b", 200, json!({"id": "b"}))
        .gate("/otus/a", Arc::clone(&gate));
    let store = Store::new(
        Arc::new(MemoryHistory::default()),
        Arc::new(TracingReporter),
    );
    let effects = Orchestrator::start(
        Arc::clone(&store),
        Arc::new(transport),
        Duration::from_millis(200),
    );

    let (older, _) = tokio::join!(effects.settle(get_otu("a")), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.dispatch(Action::Requested(get_otu("b")));
    });

    assert!(matches!(older, Err(SettleError::Timeout(_, Category::GetOtu))));
}

fn create_label(name: &str) -> Request {
    Request::CreateLabel {
        name: name.to_string(),
        color: "#3B82F6".to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn requests_reach_their_watcher_when_the_action_bus_overflows() {
    let transport = Arc::new(
        ScriptedTransport::default().respond("/labels", 201, json!({"id": "l1", "name": "x"})),
    );
    let store = Store::with_event_buffer(
        Arc::new(MemoryHistory::default()),
        Arc::new(TracingReporter),
        2,
    );
    // Never read, so the bus overflows after two actions.
    let _idle = store.actions();
    let effects = Orchestrator::start(
        Arc::clone(&store),
        Arc::clone(&transport) as Arc<dyn Transport>,
        Duration::from_secs(5),
    );

    for name in ["a", "b", "c"] {
        store.dispatch(Action::Requested(create_label(name)));
    }

    wait_for(effects.store(), |state| {
        !state.labels.0.is_pending(Category::CreateLabel)
    })
    .await;
    assert_eq!(transport.calls.lock().len(), 3);
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

struct HangingTransport {
    entered: Arc<Notify>,
    cancelled: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for HangingTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let _guard = SetOnDrop(Arc::clone(&self.cancelled));
        self.entered.notify_one();
        std::future::pending::<()>().await;
        Ok(ApiResponse {
            status: 200,
            body: Value::Null,
        })
    }
}

#[tokio::test]
async fn shutdown_cancels_calls_in_flight() {
    let entered = Arc::new(Notify::new());
    let cancelled = Arc::new(AtomicBool::new(false));
    let mut effects = start(HangingTransport {
        entered: Arc::clone(&entered),
        cancelled: Arc::clone(&cancelled),
    });

    // All-concurrent, so only the watcher's task set tracks it.
    effects
        .store()
        .dispatch(Action::Requested(create_label("pending")));
    tokio::time::timeout(Duration::from_secs(5), entered.notified())
        .await
        .expect("call started");

    effects.shutdown();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cancelled.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("call cancelled");
    assert!(effects
        .store()
        .state()
        .labels
        .0
        .is_pending(Category::CreateLabel));
}

#[test]
fn follow_ups_route_after_removals_and_logout() {
    let paths = |actions: Vec<Action>| -> Vec<String> {
        actions
            .into_iter()
            .filter_map(|action| match action {
                Action::Navigate(location) => Some(location.pathname),
                _ => None,
            })
            .collect()
    };

    assert_eq!(paths(follow_ups(&Request::Logout, &Payload::Empty)), vec!["/login"]);
    assert_eq!(
        paths(follow_ups(
            &Request::RemoveOtu {
                otu_id: OtuId::from("o1"),
                ref_id: ReferenceId::from("r1"),
            },
            &Payload::Empty
        )),
        vec!["/refs/r1/otus"]
    );
    assert_eq!(
        paths(follow_ups(
            &Request::RemoveSample {
                sample_id: SampleId::from("s1")
            },
            &Payload::Empty
        )),
        vec!["/samples"]
    );

    let login = follow_ups(
        &Request::Login {
            username: "bob".to_string(),
            password: "pw".to_string(),
            remember: false,
        },
        &Payload::Empty,
    );
    let names: Vec<String> = login.iter().map(Action::type_name).collect();
    assert_eq!(names, vec!["GET_ACCOUNT_REQUESTED", "GET_SETTINGS_REQUESTED"]);
    assert!(follow_ups(&Request::ListLabels, &Payload::Empty).is_empty());
}

async fn spawn_api_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route(
            "/api/account/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == json!("secret") {
                    (StatusCode::CREATED, Json(json!({"reset": false})))
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"id": "unauthorized", "message": "Invalid credentials"})),
                    )
                }
            }),
        )
        .route(
            "/api/account",
            get(|| async { Json(json!({"id": "bob", "administrator": true})) }),
        )
        .route(
            "/api/settings",
            get(|| async { Json(json!({"enable_sentry": false})) }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

fn login(password: &str) -> Request {
    Request::Login {
        username: "bob".to_string(),
        password: password.to_string(),
        remember: false,
    }
}

#[tokio::test]
async fn login_over_http_loads_account_and_settings() {
    let base = spawn_api_server().await;
    let transport = HttpTransport::new(&base, Duration::from_secs(5)).expect("transport");
    let effects = start(transport);

    let rejected = effects.settle(login("wrong")).await.expect("settled");
    assert_eq!(rejected.failure().map(|f| f.status), Some(401));
    assert!(effects.store().state().errors.get(Category::Login).is_some());
    assert!(effects.store().state().app.login);

    let accepted = effects.settle(login("secret")).await.expect("settled");
    assert!(accepted.is_success());

    wait_for(effects.store(), |state| {
        state.account.ready && state.settings.data.is_some()
    })
    .await;
    let state = effects.store().state();
    assert!(!state.app.login);
    assert_eq!(state.errors.get(Category::Login), None);
    assert_eq!(
        state.account.account.as_ref().and_then(|a| a.id()).as_deref(),
        Some("bob")
    );
}
