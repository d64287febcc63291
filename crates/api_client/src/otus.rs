//! OTU, isolate and sequence endpoints.

use serde_json::{json, Value};
use shared::{
    domain::{ChangeId, IsolateId, OtuId, ReferenceId, SequenceId},
    protocol::SequenceFields,
};

use crate::{term, ApiRequest};

/// A page of OTUs in a reference. `verified` is only sent when filtering on
/// it; the API treats its absence as "any".
pub fn find(ref_id: &ReferenceId, find: &str, verified: bool, page: u64) -> ApiRequest {
    ApiRequest::get(&["refs", ref_id.as_str(), "otus"])
        .query_opt("find", term(find))
        .query("page", page)
        .query_opt("verified", verified.then_some(true))
}

pub fn get(otu_id: &OtuId) -> ApiRequest {
    ApiRequest::get(&["otus", otu_id.as_str()])
}

pub fn get_history(otu_id: &OtuId) -> ApiRequest {
    ApiRequest::get(&["otus", otu_id.as_str(), "history"])
}

pub fn get_genbank(accession: &str) -> ApiRequest {
    ApiRequest::get(&["genbank", accession])
}

pub fn create(ref_id: &ReferenceId, name: &str, abbreviation: &str) -> ApiRequest {
    ApiRequest::post(&["refs", ref_id.as_str(), "otus"]).send(json!({
        "name": name,
        "abbreviation": abbreviation,
    }))
}

pub fn edit(otu_id: &OtuId, name: &str, abbreviation: &str, schema: &[Value]) -> ApiRequest {
    ApiRequest::patch(&["otus", otu_id.as_str()]).send(json!({
        "name": name,
        "abbreviation": abbreviation,
        "schema": schema,
    }))
}

pub fn remove(otu_id: &OtuId) -> ApiRequest {
    ApiRequest::delete(&["otus", otu_id.as_str()])
}

pub fn add_isolate(otu_id: &OtuId, source_type: &str, source_name: &str) -> ApiRequest {
    ApiRequest::post(&["otus", otu_id.as_str(), "isolates"]).send(json!({
        "source_type": source_type,
        "source_name": source_name,
    }))
}

pub fn edit_isolate(
    otu_id: &OtuId,
    isolate_id: &IsolateId,
    source_type: &str,
    source_name: &str,
) -> ApiRequest {
    ApiRequest::patch(&["otus", otu_id.as_str(), "isolates", isolate_id.as_str()]).send(json!({
        "source_type": source_type,
        "source_name": source_name,
    }))
}

pub fn set_isolate_as_default(otu_id: &OtuId, isolate_id: &IsolateId) -> ApiRequest {
    ApiRequest::put(&["otus", otu_id.as_str(), "isolates", isolate_id.as_str(), "default"])
}

pub fn remove_isolate(otu_id: &OtuId, isolate_id: &IsolateId) -> ApiRequest {
    ApiRequest::delete(&["otus", otu_id.as_str(), "isolates", isolate_id.as_str()])
}

pub fn add_sequence(
    otu_id: &OtuId,
    isolate_id: &IsolateId,
    fields: &SequenceFields,
) -> ApiRequest {
    ApiRequest::post(&["otus", otu_id.as_str(), "isolates", isolate_id.as_str(), "sequences"])
        .send(sequence_body(fields))
}

pub fn edit_sequence(
    otu_id: &OtuId,
    isolate_id: &IsolateId,
    sequence_id: &SequenceId,
    fields: &SequenceFields,
) -> ApiRequest {
    ApiRequest::patch(&[
        "otus",
        otu_id.as_str(),
        "isolates",
        isolate_id.as_str(),
        "sequences",
        sequence_id.as_str(),
    ])
    .send(sequence_body(fields))
}

pub fn remove_sequence(
    otu_id: &OtuId,
    isolate_id: &IsolateId,
    sequence_id: &SequenceId,
) -> ApiRequest {
    ApiRequest::delete(&[
        "otus",
        otu_id.as_str(),
        "isolates",
        isolate_id.as_str(),
        "sequences",
        sequence_id.as_str(),
    ])
}

/// Undoes a history change (and every later change to the same OTU).
pub fn revert(change_id: &ChangeId) -> ApiRequest {
    ApiRequest::delete(&["history", change_id.as_str()])
}

fn sequence_body(fields: &SequenceFields) -> Value {
    json!({
        "accession": fields.accession,
        "definition": fields.definition,
        "host": fields.host,
        "sequence": fields.sequence,
        "segment": fields.segment,
        "target": fields.target,
    })
}
