//! The single store: owns the root state, applies actions under one lock and
//! publishes both the resulting snapshot and the applied action.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use shared::{
    category::ErrorShape,
    domain::{Domain, Location},
    protocol::Failed,
    Action, Category, Envelope, Mode, Ticket,
};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error};

use crate::state::RootState;

/// Capacity of the action bus; slow subscribers past this lag and skip.
/// Request routes registered with [`Store::route_requests`] never lag.
pub const DEFAULT_EVENT_BUFFER: usize = 1024;

/// Browser-style navigation history the routing middleware writes to.
pub trait History: Send + Sync {
    fn push(&self, location: &Location);
}

/// In-process history; the CLI and tests use it in place of a browser.
#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<Location>>,
}

impl MemoryHistory {
    pub fn entries(&self) -> Vec<Location> {
        self.entries.lock().clone()
    }

    pub fn current(&self) -> Option<Location> {
        self.entries.lock().last().cloned()
    }

    /// Steps back one entry and returns the location now current. The caller
    /// dispatches `Action::LocationChanged` with it.
    pub fn back(&self) -> Option<Location> {
        let mut entries = self.entries.lock();
        entries.pop();
        entries.last().cloned()
    }
}

impl History for MemoryHistory {
    fn push(&self, location: &Location) {
        self.entries.lock().push(location.clone());
    }
}

/// Receives failures that are not rendered inline in the error slice.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, failed: &Failed);
}

pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, failed: &Failed) {
        error!(
            category = %failed.request.category(),
            ticket = %failed.ticket,
            status = failed.failure.status,
            message = %failed.failure.message,
            "store: request failed"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied(Ticket),
    /// A latest-wins completion arrived after a newer request of the same
    /// category; it was dropped without touching state.
    Superseded,
}

impl Dispatch {
    pub fn ticket(self) -> Option<Ticket> {
        match self {
            Dispatch::Applied(ticket) => Some(ticket),
            Dispatch::Superseded => None,
        }
    }

    pub fn is_applied(self) -> bool {
        matches!(self, Dispatch::Applied(_))
    }
}

struct StoreInner {
    root: Arc<RootState>,
    next_ticket: u64,
    /// Ticket of the newest request per latest-wins category.
    latest: HashMap<Category, Ticket>,
    /// Unbounded per-domain feeds of requested actions.
    routes: HashMap<Domain, mpsc::UnboundedSender<Envelope>>,
}

pub struct Store {
    inner: Mutex<StoreInner>,
    snapshots: watch::Sender<Arc<RootState>>,
    actions: broadcast::Sender<Envelope>,
    history: Arc<dyn History>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Store {
    pub fn new(history: Arc<dyn History>, reporter: Arc<dyn ErrorReporter>) -> Arc<Self> {
        Self::with_event_buffer(history, reporter, DEFAULT_EVENT_BUFFER)
    }

    pub fn with_event_buffer(
        history: Arc<dyn History>,
        reporter: Arc<dyn ErrorReporter>,
        event_buffer: usize,
    ) -> Arc<Self> {
        let root = Arc::new(RootState::default());
        let (snapshots, _) = watch::channel(Arc::clone(&root));
        let (actions, _) = broadcast::channel(event_buffer.max(1));
        Arc::new(Self {
            inner: Mutex::new(StoreInner {
                root,
                next_ticket: 0,
                latest: HashMap::new(),
                routes: HashMap::new(),
            }),
            snapshots,
            actions,
            history,
            reporter,
        })
    }

    /// Reduces `action` into the root state and publishes it.
    ///
    /// Everything up to publishing the envelope happens under the store lock,
    /// so subscribers and request routes observe actions in exactly the
    /// order they were applied. Side effects on the history and reporter
    /// collaborators run after the lock is released.
    pub fn dispatch(&self, action: Action) -> Dispatch {
        let action = Arc::new(action);
        let ticket = {
            let mut inner = self.inner.lock();

            if let (Some(category), Some(completion)) =
                (action.category(), action.completion_ticket())
            {
                if completion != Ticket::UNTRACKED
                    && category.mode() == Mode::LatestWins
                    && inner.latest.get(&category) != Some(&completion)
                {
                    debug!(
                        category = %category,
                        ticket = %completion,
                        "store: dropping superseded completion"
                    );
                    return Dispatch::Superseded;
                }
            }

            inner.next_ticket += 1;
            let ticket = Ticket(inner.next_ticket);
            if let Action::Requested(request) = action.as_ref() {
                let category = request.category();
                if category.mode() == Mode::LatestWins {
                    inner.latest.insert(category, ticket);
                }
            }

            if let Some(next) = inner.root.reduce(&action) {
                inner.root = Arc::new(next);
                self.snapshots.send_replace(Arc::clone(&inner.root));
            }
            debug!(ticket = %ticket, action = %action.type_name(), "store: applied");
            let envelope = Envelope {
                ticket,
                action: Arc::clone(&action),
            };
            if let Action::Requested(request) = action.as_ref() {
                let domain = request.domain();
                let closed = inner
                    .routes
                    .get(&domain)
                    .is_some_and(|route| route.send(envelope.clone()).is_err());
                if closed {
                    debug!(domain = domain.as_str(), "store: request route closed");
                    inner.routes.remove(&domain);
                }
            }
            // No subscribers is fine; the action is still applied.
            let _ = self.actions.send(envelope);
            ticket
        };

        match action.as_ref() {
            Action::Navigate(location) => self.history.push(location),
            Action::Failed(failed)
                if failed.request.category().error_shape() == ErrorShape::Reported =>
            {
                self.reporter.report(failed)
            }
            _ => {}
        }

        Dispatch::Applied(ticket)
    }

    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.inner.lock().root)
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.snapshots.subscribe()
    }

    /// Snapshot stream starting with the current state.
    pub fn snapshots(&self) -> WatchStream<Arc<RootState>> {
        WatchStream::new(self.subscribe())
    }

    pub fn actions(&self) -> broadcast::Receiver<Envelope> {
        self.actions.subscribe()
    }

    /// Feed of every `*_REQUESTED` envelope owned by `domain`, in dispatch
    /// order. Unlike [`Store::actions`] it is unbounded, so a busy consumer
    /// falls behind but never skips a request. Registering again for the same
    /// domain replaces the previous feed.
    pub fn route_requests(&self, domain: Domain) -> mpsc::UnboundedReceiver<Envelope> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.inner.lock().routes.insert(domain, sender);
        receiver
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
