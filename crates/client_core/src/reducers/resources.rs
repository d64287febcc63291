//! Slices that need nothing beyond the generic resource policy.

use std::ops::Deref;

use serde::Serialize;
use shared::{domain::Domain, Action};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

macro_rules! resource_slice {
    ($(#[$meta:meta])* $name:ident, $domain:ident, $membership:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub ResourceState);

        impl Deref for $name {
            type Target = ResourceState;

            fn deref(&self) -> &ResourceState {
                &self.0
            }
        }

        impl Reducer for $name {
            fn reduce(&self, action: &Action) -> Option<Self> {
                self.0
                    .reduce(action, Domain::$domain, Membership::$membership)
                    .map($name)
            }
        }
    };
}

resource_slice!(CachesState, Caches, Refetch);
resource_slice!(FilesState, Files, Refetch);
resource_slice!(GroupsState, Groups, Append);
resource_slice!(
    /// Cancel and archive come back as edits of the job document.
    JobsState,
    Jobs,
    Refetch
);
resource_slice!(LabelsState, Labels, Append);
resource_slice!(ReferencesState, References, Append);
resource_slice!(
    /// New samples are placed by the server once their files are processed.
    SamplesState,
    Samples,
    Refetch
);
resource_slice!(SubtractionState, Subtraction, Append);
resource_slice!(TasksState, Tasks, Refetch);
resource_slice!(UsersState, Users, Append);
