//! Slice reducers: pure `(slice, action) -> slice` functions, one per named
//! region of the global state tree.

pub mod account;
pub mod analyses;
pub mod app;
pub mod errors;
pub mod hmms;
pub mod indexes;
pub mod otus;
pub mod resource;
pub mod resources;
pub mod router;
pub mod settings;

use shared::Action;

pub use account::AccountState;
pub use analyses::AnalysesState;
pub use app::AppState;
pub use errors::ErrorsState;
pub use hmms::HmmsState;
pub use indexes::IndexesState;
pub use otus::OtusState;
pub use resource::{Membership, ResourceState};
pub use resources::{
    CachesState, FilesState, GroupsState, JobsState, LabelsState, ReferencesState, SamplesState,
    SubtractionState, TasksState, UsersState,
};
pub use router::RouterState;
pub use settings::SettingsState;

pub trait Reducer: Sized {
    /// Next slice state, or `None` when the action does not concern this
    /// slice. `None` lets the store keep the previous `Arc` so consumers can
    /// skip work on pointer equality.
    fn reduce(&self, action: &Action) -> Option<Self>;
}
