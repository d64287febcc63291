use serde_json::json;
use shared::{
    domain::{OtuId, SampleId},
    error::{ErrorEntry, Failure},
    protocol::Succeeded,
    Payload, Record, Request,
};

use super::*;
use crate::reducers::router::HistoryAction;

#[derive(Default)]
struct RecordingReporter {
    reported: Mutex<Vec<Category>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, failed: &Failed) {
        self.reported.lock().push(failed.request.category());
    }
}

struct Harness {
    store: Arc<Store>,
    history: Arc<MemoryHistory>,
    reporter: Arc<RecordingReporter>,
}

fn harness() -> Harness {
    let history = Arc::new(MemoryHistory::default());
    let reporter = Arc::new(RecordingReporter::default());
    let store = Store::new(
        Arc::clone(&history) as Arc<dyn History>,
        Arc::clone(&reporter) as Arc<dyn ErrorReporter>,
    );
    Harness {
        store,
        history,
        reporter,
    }
}

fn get_otu(id: &str) -> Request {
    Request::GetOtu {
        otu_id: OtuId::from(id),
    }
}

fn otu(id: &str, version: u64) -> Payload {
    Payload::Record(Record::from_value(json!({"id": id, "version": version})).expect("object"))
}

fn completed(ticket: Ticket, request: Request, payload: Payload) -> Action {
    Action::Succeeded(Succeeded {
        ticket,
        request,
        payload,
    })
}

fn login() -> Request {
    Request::Login {
        username: "bob".to_string(),
        password: "wrong".to_string(),
        remember: false,
    }
}

#[test]
fn tickets_increase_and_envelopes_follow_dispatch_order() {
    let Harness { store, .. } = harness();
    let mut actions = store.actions();

    let first = store.dispatch(Action::Requested(Request::ListLabels));
    let second = store.dispatch(Action::ClearError(Category::Login));

    assert_eq!(first, Dispatch::Applied(Ticket(1)));
    assert_eq!(second, Dispatch::Applied(Ticket(2)));
    let envelope = actions.try_recv().expect("first envelope");
    assert_eq!(envelope.ticket, Ticket(1));
    assert_eq!(envelope.action.type_name(), "LIST_LABELS_REQUESTED");
    assert_eq!(actions.try_recv().expect("second envelope").ticket, Ticket(2));
}

#[test]
fn irrelevant_actions_keep_the_same_root() {
    let Harness { store, .. } = harness();
    let before = store.state();

    let outcome = store.dispatch(Action::succeeded(Request::GetSettings, Payload::Empty));

    assert!(outcome.is_applied());
    assert!(Arc::ptr_eq(&before, &store.state()));
}

#[test]
fn untouched_slices_keep_their_arcs() {
    let Harness { store, .. } = harness();
    let before = store.state();

    store.dispatch(Action::Requested(Request::FindSamples {
        term: String::new(),
        page: 1,
        labels: Vec::new(),
    }));

    let after = store.state();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(!Arc::ptr_eq(&before.samples, &after.samples));
    assert!(Arc::ptr_eq(&before.labels, &after.labels));
    assert!(Arc::ptr_eq(&before.otus, &after.otus));
}

#[test]
fn superseded_latest_wins_completions_are_dropped() {
    let Harness { store, .. } = harness();
    let Dispatch::Applied(older) = store.dispatch(Action::Requested(get_otu("a"))) else {
        panic!("requests are always applied");
    };
    let Dispatch::Applied(newer) = store.dispatch(Action::Requested(get_otu("b"))) else {
        panic!("requests are always applied");
    };

    let before = store.state();
    let stale = store.dispatch(completed(older, get_otu("a"), otu("a", 1)));
    assert_eq!(stale, Dispatch::Superseded);
    assert!(Arc::ptr_eq(&before, &store.state()));

    let fresh = store.dispatch(completed(newer, get_otu("b"), otu("b", 1)));
    assert!(fresh.is_applied());
    let state = store.state();
    assert!(state.otus.resource.get("a").is_none());
    assert!(state.otus.resource.get("b").is_some());
    assert!(!state.otus.resource.is_pending(Category::GetOtu));
}

#[test]
fn untracked_completions_always_apply() {
    let Harness { store, .. } = harness();
    store.dispatch(Action::Requested(get_otu("a")));

    let outcome = store.dispatch(Action::succeeded(get_otu("x"), otu("x", 2)));

    assert!(outcome.is_applied());
    assert!(store.state().otus.resource.get("x").is_some());
}

#[test]
fn concurrent_mutation_completions_apply_in_arrival_order() {
    let Harness { store, .. } = harness();
    let remove = |id: &str| Request::RemoveSample {
        sample_id: SampleId::from(id),
    };
    let Dispatch::Applied(first) = store.dispatch(Action::Requested(remove("a"))) else {
        panic!("requests are always applied");
    };
    let Dispatch::Applied(second) = store.dispatch(Action::Requested(remove("b"))) else {
        panic!("requests are always applied");
    };

    assert!(store
        .dispatch(completed(second, remove("b"), Payload::Empty))
        .is_applied());
    assert!(store.state().samples.is_pending(Category::RemoveSample));
    assert!(store
        .dispatch(completed(first, remove("a"), Payload::Empty))
        .is_applied());
    assert!(!store.state().samples.is_pending(Category::RemoveSample));
}

#[test]
fn navigation_reaches_history_and_router() {
    let Harness { store, history, .. } = harness();

    store.dispatch(Action::Navigate(Location::new("/samples")));

    assert_eq!(history.current(), Some(Location::new("/samples")));
    let router = store.state().router.clone();
    assert_eq!(router.location, Location::new("/samples"));
    assert_eq!(router.action, HistoryAction::Push);

    store.dispatch(Action::Navigate(Location::new("/refs")));
    let back = history.back().expect("previous entry");
    store.dispatch(Action::LocationChanged(back));
    let router = store.state().router.clone();
    assert_eq!(router.location, Location::new("/samples"));
    assert_eq!(router.action, HistoryAction::Pop);
}

#[test]
fn only_reported_failures_reach_the_reporter() {
    let Harness {
        store, reporter, ..
    } = harness();

    store.dispatch(Action::failed(
        Request::RemoveSample {
            sample_id: SampleId::from("s"),
        },
        Failure::new(500, "boom"),
    ));
    store.dispatch(Action::failed(login(), Failure::new(401, "Invalid credentials")));

    assert_eq!(*reporter.reported.lock(), vec![Category::RemoveSample]);
}

#[test]
fn login_error_is_set_then_cleared_by_the_next_attempt() {
    let Harness { store, .. } = harness();

    store.dispatch(Action::failed(login(), Failure::new(401, "Invalid credentials")));
    let state = store.state();
    assert_eq!(
        state.errors.get(Category::Login),
        Some(&ErrorEntry::Status {
            status: 401,
            message: "Invalid credentials".to_string()
        })
    );
    assert!(state.app.login);

    store.dispatch(Action::Requested(login()));
    let state = store.state();
    assert!(state.errors.has_key(Category::Login));
    assert_eq!(state.errors.get(Category::Login), None);
}

#[tokio::test]
async fn snapshot_subscribers_see_new_roots() {
    let Harness { store, .. } = harness();
    let mut snapshots = store.subscribe();

    store.dispatch(Action::SetInitialState {
        dev: true,
        first: false,
    });

    snapshots.changed().await.expect("store alive");
    assert!(snapshots.borrow().app.dev);
}

#[tokio::test]
async fn snapshot_stream_starts_with_the_current_root() {
    use futures::StreamExt;

    let Harness { store, .. } = harness();
    store.dispatch(Action::SetInitialState {
        dev: false,
        first: true,
    });
    let mut stream = store.snapshots();

    let current = stream.next().await.expect("initial snapshot");
    assert!(current.app.first);

    store.dispatch(Action::ClearError(Category::Login));
    let next = stream.next().await.expect("next snapshot");
    assert!(next.errors.has_key(Category::Login));
}

#[test]
fn request_routes_only_carry_their_domain_requests() {
    let Harness { store, .. } = harness();
    let mut otus = store.route_requests(Domain::Otus);
    // Bounded bus subscriber that never reads.
    let _idle = store.actions();

    let ticket = store
        .dispatch(Action::Requested(get_otu("o1")))
        .ticket()
        .expect("applied");
    store.dispatch(Action::Requested(Request::ListLabels));
    store.dispatch(completed(ticket, get_otu("o1"), otu("o1", 1)));
    for _ in 0..DEFAULT_EVENT_BUFFER + 1 {
        store.dispatch(Action::Requested(get_otu("o2")));
    }

    let first = otus.try_recv().expect("routed");
    assert_eq!(first.ticket, ticket);
    let mut routed = 1;
    while let Ok(envelope) = otus.try_recv() {
        assert!(matches!(envelope.action.as_ref(), Action::Requested(Request::GetOtu { .. })));
        routed += 1;
    }
    assert_eq!(routed, DEFAULT_EVENT_BUFFER + 2);
}

#[test]
fn dropped_request_routes_do_not_block_dispatch() {
    let Harness { store, .. } = harness();
    drop(store.route_requests(Domain::Otus));

    assert!(store.dispatch(Action::Requested(get_otu("o1"))).is_applied());
    assert!(store.dispatch(Action::Requested(get_otu("o2"))).is_applied());
}
