//! OTU slice: the generic resource policy plus change history, GenBank
//! lookups and in-place edits of the nested `isolates[].sequences[]` of the
//! cached OTU record.

use im::OrdMap;
use serde::Serialize;
use serde_json::Value;
use shared::{domain::Domain, protocol::Succeeded, Action, Payload, Record, Request};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

const ISOLATES: &str = "isolates";
const SEQUENCES: &str = "sequences";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OtusState {
    #[serde(flatten)]
    pub resource: ResourceState,
    /// Change history per OTU id, newest first as returned by the server.
    pub history: OrdMap<String, Vec<Record>>,
    /// GenBank records by accession.
    pub genbank: OrdMap<String, Record>,
}

impl OtusState {
    pub fn isolate(&self, otu_id: &str, isolate_id: &str) -> Option<Record> {
        self.resource
            .get(otu_id)?
            .children(ISOLATES)
            .into_iter()
            .find(|isolate| isolate.id().as_deref() == Some(isolate_id))
    }
}

impl Reducer for OtusState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let resource = self.resource.reduce(action, Domain::Otus, Membership::Refetch)?;
        let mut next = Self {
            resource,
            history: self.history.clone(),
            genbank: self.genbank.clone(),
        };
        if let Action::Succeeded(succeeded) = action {
            next.apply_success(succeeded);
        }
        Some(next)
    }
}

impl OtusState {
    fn apply_success(&mut self, succeeded: &Succeeded) {
        let Succeeded {
            request, payload, ..
        } = succeeded;
        let record = payload.record();

        match request {
            Request::GetOtuHistory { otu_id } => {
                if let Payload::Records(changes) = payload {
                    self.history.insert(otu_id.to_string(), changes.clone());
                }
            }
            Request::GetGenbank { accession } => {
                if let Some(record) = record {
                    self.genbank.insert(accession.clone(), record.clone());
                }
            }
            Request::RemoveOtu { otu_id, .. } => {
                self.history.remove(otu_id.as_str());
            }
            Request::AddIsolate { otu_id, .. } | Request::EditIsolate { otu_id, .. } => {
                if let Some(isolate) = record {
                    self.edit_isolates(otu_id.as_str(), |isolates| {
                        put_child(isolates, isolate);
                    });
                }
            }
            Request::SetIsolateAsDefault { otu_id, isolate_id } => {
                self.edit_isolates(otu_id.as_str(), |isolates| {
                    for isolate in isolates.iter_mut() {
                        let is_default = isolate.id().as_deref() == Some(isolate_id.as_str());
                        isolate.set("default", Value::Bool(is_default));
                    }
                    if let Some(isolate) = record {
                        put_child(isolates, isolate);
                    }
                });
            }
            Request::RemoveIsolate { otu_id, isolate_id } => {
                self.edit_isolates(otu_id.as_str(), |isolates| {
                    isolates.retain(|isolate| isolate.id().as_deref() != Some(isolate_id.as_str()));
                });
            }
            Request::AddSequence {
                otu_id, isolate_id, ..
            }
            | Request::EditSequence {
                otu_id, isolate_id, ..
            } => {
                if let Some(sequence) = record {
                    self.edit_sequences(otu_id.as_str(), isolate_id.as_str(), |sequences| {
                        put_child(sequences, sequence);
                    });
                }
            }
            Request::RemoveSequence {
                otu_id,
                isolate_id,
                sequence_id,
            } => {
                self.edit_sequences(otu_id.as_str(), isolate_id.as_str(), |sequences| {
                    sequences
                        .retain(|sequence| sequence.id().as_deref() != Some(sequence_id.as_str()));
                });
            }
            _ => {}
        }
    }

    /// Applies `edit` to the isolates of a cached OTU. Uncached OTUs are left
    /// alone; the follow-up `GET_OTU` fills them in.
    fn edit_isolates(&mut self, otu_id: &str, edit: impl FnOnce(&mut Vec<Record>)) {
        let Some(mut otu) = self.resource.get(otu_id).cloned() else {
            return;
        };
        let mut isolates = otu.children(ISOLATES);
        edit(&mut isolates);
        otu.set_children(ISOLATES, isolates);
        self.resource.documents.insert(otu_id.to_string(), otu);
    }

    fn edit_sequences(
        &mut self,
        otu_id: &str,
        isolate_id: &str,
        edit: impl FnOnce(&mut Vec<Record>),
    ) {
        self.edit_isolates(otu_id, |isolates| {
            if let Some(isolate) = isolates
                .iter_mut()
                .find(|isolate| isolate.id().as_deref() == Some(isolate_id))
            {
                let mut sequences = isolate.children(SEQUENCES);
                edit(&mut sequences);
                isolate.set_children(SEQUENCES, sequences);
            }
        });
    }
}

/// Replaces the child with the same id, or appends it.
fn put_child(children: &mut Vec<Record>, child: &Record) {
    let id = child.id();
    match children
        .iter_mut()
        .find(|existing| id.is_some() && existing.id() == id)
    {
        Some(existing) => existing.merge(child),
        None => children.push(child.clone()),
    }
}

#[cfg(test)]
#[path = "tests/otus_tests.rs"]
mod tests;
