//! The global state tree. Each slice sits behind its own `Arc` so an action
//! only reallocates the slices that actually changed.

use std::sync::Arc;

use serde::Serialize;
use shared::{domain::Domain, Action};

use crate::reducers::{
    AccountState, AnalysesState, AppState, CachesState, ErrorsState, FilesState, GroupsState,
    HmmsState, IndexesState, JobsState, LabelsState, OtusState, Reducer, ReferencesState,
    RouterState, SamplesState, SettingsState, SubtractionState, TasksState, UsersState,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootState {
    pub account: Arc<AccountState>,
    pub analyses: Arc<AnalysesState>,
    pub app: Arc<AppState>,
    pub caches: Arc<CachesState>,
    pub errors: Arc<ErrorsState>,
    pub files: Arc<FilesState>,
    pub groups: Arc<GroupsState>,
    pub hmms: Arc<HmmsState>,
    pub indexes: Arc<IndexesState>,
    pub jobs: Arc<JobsState>,
    pub labels: Arc<LabelsState>,
    pub otus: Arc<OtusState>,
    pub references: Arc<ReferencesState>,
    pub router: Arc<RouterState>,
    pub samples: Arc<SamplesState>,
    pub settings: Arc<SettingsState>,
    pub subtraction: Arc<SubtractionState>,
    pub tasks: Arc<TasksState>,
    pub users: Arc<UsersState>,
}

impl RootState {
    /// Runs every slice reducer. Returns `None` when no slice changed, in
    /// which case the caller keeps the previous root.
    pub fn reduce(&self, action: &Action) -> Option<RootState> {
        let mut changed = false;
        let next = RootState {
            account: step(&self.account, action, &mut changed),
            analyses: step(&self.analyses, action, &mut changed),
            app: step(&self.app, action, &mut changed),
            caches: step(&self.caches, action, &mut changed),
            errors: step(&self.errors, action, &mut changed),
            files: step(&self.files, action, &mut changed),
            groups: step(&self.groups, action, &mut changed),
            hmms: step(&self.hmms, action, &mut changed),
            indexes: step(&self.indexes, action, &mut changed),
            jobs: step(&self.jobs, action, &mut changed),
            labels: step(&self.labels, action, &mut changed),
            otus: step(&self.otus, action, &mut changed),
            references: step(&self.references, action, &mut changed),
            router: step(&self.router, action, &mut changed),
            samples: step(&self.samples, action, &mut changed),
            settings: step(&self.settings, action, &mut changed),
            subtraction: step(&self.subtraction, action, &mut changed),
            tasks: step(&self.tasks, action, &mut changed),
            users: step(&self.users, action, &mut changed),
        };
        changed.then_some(next)
    }

    /// The slice owning `domain`, serialized. Used by the CLI to print just
    /// the part of the tree a command touched.
    pub fn slice_json(&self, domain: Domain) -> serde_json::Result<serde_json::Value> {
        match domain {
            Domain::App => serde_json::to_value(&*self.app),
            Domain::Account => serde_json::to_value(&*self.account),
            Domain::Analyses => serde_json::to_value(&*self.analyses),
            Domain::Caches => serde_json::to_value(&*self.caches),
            Domain::Files => serde_json::to_value(&*self.files),
            Domain::Groups => serde_json::to_value(&*self.groups),
            Domain::Hmms => serde_json::to_value(&*self.hmms),
            Domain::Indexes => serde_json::to_value(&*self.indexes),
            Domain::Jobs => serde_json::to_value(&*self.jobs),
            Domain::Labels => serde_json::to_value(&*self.labels),
            Domain::Otus => serde_json::to_value(&*self.otus),
            Domain::References => serde_json::to_value(&*self.references),
            Domain::Samples => serde_json::to_value(&*self.samples),
            Domain::Settings => serde_json::to_value(&*self.settings),
            Domain::Subtraction => serde_json::to_value(&*self.subtraction),
            Domain::Tasks => serde_json::to_value(&*self.tasks),
            Domain::Users => serde_json::to_value(&*self.users),
        }
    }
}

fn step<S: Reducer>(slice: &Arc<S>, action: &Action, changed: &mut bool) -> Arc<S> {
    match slice.reduce(action) {
        Some(next) => {
            *changed = true;
            Arc::new(next)
        }
        None => Arc::clone(slice),
    }
}
