//! Client-side state orchestration for the lab data API: a single store of
//! per-domain slices, pure reducers, and an effect orchestrator that turns
//! requests into REST calls.

use std::sync::Arc;

use anyhow::{Context, Result};
use api_client::{HttpTransport, Transport};
use shared::{Action, Request};
use tracing::info;

pub mod config;
pub mod orchestrator;
pub mod reducers;
pub mod state;
pub mod store;

pub use config::{load_settings, load_settings_from, Settings};
pub use orchestrator::{follow_ups, Completion, Orchestrator, OrchestratorHandle, SettleError};
pub use state::RootState;
pub use store::{
    Dispatch, ErrorReporter, History, MemoryHistory, Store, TracingReporter, DEFAULT_EVENT_BUFFER,
};

/// A wired store plus running effect watchers.
pub struct LabClient {
    history: Arc<MemoryHistory>,
    effects: OrchestratorHandle,
}

impl LabClient {
    /// Builds an HTTP transport from `settings` and starts the watchers.
    /// Must be called from within a Tokio runtime.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let transport = HttpTransport::new(&settings.api_url, settings.request_timeout())
            .with_context(|| format!("invalid api url: {}", settings.api_url))?;
        info!(api_url = %settings.api_url, "client: connecting");
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        let history = Arc::new(MemoryHistory::default());
        let store = Store::with_event_buffer(
            Arc::clone(&history) as Arc<dyn History>,
            Arc::new(TracingReporter),
            settings.event_buffer,
        );
        let effects = Orchestrator::start(store, transport, settings.settle_timeout());
        Self { history, effects }
    }

    pub fn store(&self) -> &Arc<Store> {
        self.effects.store()
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn dispatch(&self, action: Action) -> Dispatch {
        self.store().dispatch(action)
    }

    pub fn state(&self) -> Arc<RootState> {
        self.store().state()
    }

    pub async fn settle(&self, request: Request) -> Result<Completion, SettleError> {
        self.effects.settle(request).await
    }
}
