//! Effect orchestration: one watcher task per domain turns `*_REQUESTED`
//! actions into REST calls and dispatches their completions.

use std::{collections::HashMap, sync::Arc, time::Duration};

use api_client::{routes, Transport};
use shared::{
    domain::{Domain, Location},
    error::Failure,
    protocol::{Failed, Succeeded},
    Action, Category, Envelope, Mode, Payload, Request, Ticket,
};
use thiserror::Error;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::{AbortHandle, JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::store::{Dispatch, Store};

#[derive(Debug, Error)]
pub enum SettleError {
    #[error("timed out after {0:?} waiting for {1} to complete")]
    Timeout(Duration, Category),
    #[error("action bus closed before {0} completed")]
    Closed(Category),
}

/// Outcome of a request awaited with [`OrchestratorHandle::settle`].
#[derive(Debug, Clone)]
pub enum Completion {
    Succeeded(Succeeded),
    Failed(Failed),
}

impl Completion {
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Succeeded(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Completion::Failed(failed) => Some(&failed.failure),
            Completion::Succeeded(_) => None,
        }
    }
}

pub struct Orchestrator;

impl Orchestrator {
    /// Spawns the watchers. Each watcher's request route is registered before
    /// this returns, so requests dispatched right after `start` are never
    /// missed.
    pub fn start(
        store: Arc<Store>,
        transport: Arc<dyn Transport>,
        settle_timeout: Duration,
    ) -> OrchestratorHandle {
        let watchers = Domain::ALL
            .iter()
            .map(|&domain| {
                let requests = store.route_requests(domain);
                let store = Arc::clone(&store);
                let transport = Arc::clone(&transport);
                tokio::spawn(watch_domain(domain, requests, store, transport))
            })
            .collect();
        info!(watchers = Domain::ALL.len(), "effects: started");
        OrchestratorHandle {
            store,
            watchers,
            settle_timeout,
        }
    }
}

pub struct OrchestratorHandle {
    store: Arc<Store>,
    watchers: Vec<JoinHandle<()>>,
    settle_timeout: Duration,
}

impl OrchestratorHandle {
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Dispatches `request` and waits for its own completion.
    ///
    /// A latest-wins request superseded by a newer one never completes, so
    /// this returns `SettleError::Timeout` for it.
    pub async fn settle(&self, request: Request) -> Result<Completion, SettleError> {
        let category = request.category();
        let mut actions = self.store.actions();
        let Dispatch::Applied(ticket) = self.store.dispatch(Action::Requested(request)) else {
            // Requests are never gated.
            return Err(SettleError::Closed(category));
        };

        let wait = async {
            loop {
                match actions.recv().await {
                    Ok(envelope) => {
                        if let Some(completion) = completion_for(&envelope, ticket) {
                            return Ok(completion);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, category = %category, "effects: settle lagged");
                    }
                    Err(RecvError::Closed) => return Err(SettleError::Closed(category)),
                }
            }
        };
        tokio::time::timeout(self.settle_timeout, wait)
            .await
            .map_err(|_| SettleError::Timeout(self.settle_timeout, category))?
    }

    /// Stops every watcher. Calls still in flight are cancelled with them and
    /// never dispatch a completion.
    pub fn shutdown(&mut self) {
        for watcher in self.watchers.drain(..) {
            watcher.abort();
        }
    }
}

impl Drop for OrchestratorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn completion_for(envelope: &Envelope, ticket: Ticket) -> Option<Completion> {
    match envelope.action.as_ref() {
        Action::Succeeded(succeeded) if succeeded.ticket == ticket => {
            Some(Completion::Succeeded(succeeded.clone()))
        }
        Action::Failed(failed) if failed.ticket == ticket => Some(Completion::Failed(failed.clone())),
        _ => None,
    }
}

async fn watch_domain(
    domain: Domain,
    mut requests: mpsc::UnboundedReceiver<Envelope>,
    store: Arc<Store>,
    transport: Arc<dyn Transport>,
) {
    // Dropping the set, including when this task is aborted, cancels every
    // call it still owns.
    let mut calls = JoinSet::new();
    let mut latest: HashMap<Category, AbortHandle> = HashMap::new();
    loop {
        tokio::select! {
            received = requests.recv() => {
                let Some(envelope) = received else {
                    break;
                };
                let Action::Requested(request) = envelope.action.as_ref() else {
                    continue;
                };

                let category = request.category();
                let call = calls.spawn(run_call(
                    Arc::clone(&store),
                    Arc::clone(&transport),
                    envelope.ticket,
                    request.clone(),
                ));
                if category.mode() == Mode::LatestWins {
                    if let Some(previous) = latest.insert(category, call) {
                        if !previous.is_finished() {
                            debug!(category = %category, "effects: cancelling superseded call");
                            previous.abort();
                        }
                    }
                }
            }
            Some(joined) = calls.join_next(), if !calls.is_empty() => {
                if let Err(err) = joined {
                    if err.is_panic() {
                        warn!(domain = domain.as_str(), "effects: call panicked");
                    }
                }
            }
        }
    }
    debug!(domain = domain.as_str(), "effects: request route closed");
    calls.shutdown().await;
}

async fn run_call(
    store: Arc<Store>,
    transport: Arc<dyn Transport>,
    ticket: Ticket,
    request: Request,
) {
    let category = request.category();
    let api_request = routes::build(&request);
    debug!(
        category = %category,
        ticket = %ticket,
        method = %api_request.method,
        path = %api_request.path,
        "effects: calling api"
    );

    let outcome = match transport.send(api_request).await {
        Ok(response) if response.is_success() => {
            let status = response.status;
            Payload::decode(request.response_kind(), response.body).map_err(|err| {
                Failure::new(status, format!("malformed response: {err}"))
            })
        }
        Ok(response) => {
            let reason = response.reason();
            Err(Failure::from_response(response.status, response.body, reason))
        }
        Err(err) => Err(Failure::new(0, err.to_string())),
    };

    match outcome {
        Ok(payload) => {
            let follow = follow_ups(&request, &payload);
            let applied = store.dispatch(Action::Succeeded(Succeeded {
                ticket,
                request,
                payload,
            }));
            if applied.is_applied() {
                for action in follow {
                    store.dispatch(action);
                }
            }
        }
        Err(failure) => {
            warn!(
                category = %category,
                ticket = %ticket,
                status = failure.status,
                message = %failure.message,
                "effects: call failed"
            );
            store.dispatch(Action::Failed(Failed {
                ticket,
                request,
                failure,
            }));
        }
    }
}

/// Actions dispatched after a request succeeds, in order.
pub fn follow_ups(request: &Request, payload: &Payload) -> Vec<Action> {
    match request {
        Request::Login { .. } => vec![
            Action::Requested(Request::GetAccount),
            Action::Requested(Request::GetSettings),
        ],
        Request::Logout => vec![Action::Navigate(Location::new("/login"))],
        Request::AddIsolate { otu_id, .. }
        | Request::EditIsolate { otu_id, .. }
        | Request::SetIsolateAsDefault { otu_id, .. }
        | Request::RemoveIsolate { otu_id, .. }
        | Request::AddSequence { otu_id, .. }
        | Request::EditSequence { otu_id, .. }
        | Request::RemoveSequence { otu_id, .. }
        | Request::Revert { otu_id, .. } => vec![
            Action::Requested(Request::GetOtu {
                otu_id: otu_id.clone(),
            }),
            Action::Requested(Request::GetOtuHistory {
                otu_id: otu_id.clone(),
            }),
        ],
        Request::EditOtu { otu_id, .. } => vec![Action::Requested(Request::GetOtuHistory {
            otu_id: otu_id.clone(),
        })],
        Request::RemoveOtu { ref_id, .. } => {
            vec![Action::Navigate(Location::new(format!("/refs/{ref_id}/otus")))]
        }
        Request::RemoveReference { .. } => vec![Action::Navigate(Location::new("/refs"))],
        Request::CreateSample { .. } | Request::RemoveSample { .. } => {
            vec![Action::Navigate(Location::new("/samples"))]
        }
        Request::CreateOtu { .. } => payload
            .record()
            .and_then(|record| record.id())
            .map(|id| vec![Action::Navigate(Location::new(format!("/otus/{id}")))])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
