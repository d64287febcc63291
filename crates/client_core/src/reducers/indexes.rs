use im::OrdMap;
use serde::Serialize;
use shared::{domain::Domain, protocol::Succeeded, Action, Page, Request};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexesState {
    #[serde(flatten)]
    pub resource: ResourceState,
    /// Changes not yet built into an index, per reference id.
    pub unbuilt: OrdMap<String, Page>,
}

impl Reducer for IndexesState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let resource = self
            .resource
            .reduce(action, Domain::Indexes, Membership::Refetch)?;
        let mut unbuilt = self.unbuilt.clone();

        match action {
            Action::Succeeded(Succeeded {
                request: Request::GetUnbuiltChanges { ref_id },
                payload,
                ..
            }) => {
                if let Some(page) = payload.page() {
                    unbuilt.insert(ref_id.to_string(), page);
                }
            }
            // A new build consumes every pending change of its reference.
            Action::Succeeded(Succeeded {
                request: Request::CreateIndex { ref_id },
                ..
            }) => {
                unbuilt.remove(ref_id.as_str());
            }
            _ => {}
        }

        Some(Self { resource, unbuilt })
    }
}
