use im::OrdMap;
use serde::Serialize;
use shared::{domain::Domain, protocol::Succeeded, Action, Record, Request};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysesState {
    #[serde(flatten)]
    pub resource: ResourceState,
    /// NuVs BLAST results keyed by `"{analysis_id}/{sequence_index}"`.
    pub blast: OrdMap<String, Record>,
}

impl AnalysesState {
    pub fn blast_key(analysis_id: &str, sequence_index: u32) -> String {
        format!("{analysis_id}/{sequence_index}")
    }

    pub fn blast_for(&self, analysis_id: &str, sequence_index: u32) -> Option<&Record> {
        self.blast.get(&Self::blast_key(analysis_id, sequence_index))
    }
}

impl Reducer for AnalysesState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let resource = self
            .resource
            .reduce(action, Domain::Analyses, Membership::Append)?;
        let mut next = Self {
            resource,
            blast: self.blast.clone(),
        };

        if let Action::Succeeded(Succeeded {
            request:
                Request::BlastNuvs {
                    analysis_id,
                    sequence_index,
                },
            payload,
            ..
        }) = action
        {
            if let Some(record) = payload.record() {
                next.blast.insert(
                    Self::blast_key(analysis_id.as_str(), *sequence_index),
                    record.clone(),
                );
            }
        }

        if let Action::Succeeded(Succeeded {
            request: Request::RemoveAnalysis { analysis_id },
            ..
        }) = action
        {
            let prefix = format!("{analysis_id}/");
            let stale: Vec<String> = next
                .blast
                .keys()
                .filter(|key| key.starts_with(&prefix))
                .cloned()
                .collect();
            for key in stale {
                next.blast.remove(&key);
            }
        }

        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::{domain::AnalysisId, Payload};

    use super::*;

    fn blast(index: u32) -> Action {
        Action::succeeded(
            Request::BlastNuvs {
                analysis_id: AnalysisId::from("a1"),
                sequence_index: index,
            },
            Payload::Record(Record::from_value(json!({"rid": format!("R{index}")})).expect("object")),
        )
    }

    #[test]
    fn blast_results_are_keyed_by_sequence_and_dropped_with_the_analysis() {
        let state = AnalysesState::default()
            .reduce(&blast(3))
            .and_then(|state| state.reduce(&blast(5)))
            .expect("changed");
        assert_eq!(
            state.blast_for("a1", 3).and_then(|r| r.get("rid")),
            Some(&json!("R3"))
        );
        assert_eq!(state.blast.len(), 2);

        let removed = state
            .reduce(&Action::succeeded(
                Request::RemoveAnalysis {
                    analysis_id: AnalysisId::from("a1"),
                },
                Payload::Empty,
            ))
            .expect("changed");
        assert!(removed.blast.is_empty());
    }
}
