use serde_json::json;
use shared::domain::{AnalysisId, ReferenceId, SampleId, SubtractionId};

use crate::{term, ApiRequest};

/// A page of analyses belonging to one sample.
pub fn find(sample_id: &SampleId, find: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["samples", sample_id.as_str(), "analyses"])
        .query_opt("find", term(find))
        .query("page", page)
}

pub fn get(analysis_id: &AnalysisId) -> ApiRequest {
    ApiRequest::get(&["analyses", analysis_id.as_str()])
}

pub fn analyze(
    sample_id: &SampleId,
    ref_id: &ReferenceId,
    subtraction_ids: &[SubtractionId],
    workflow: &str,
) -> ApiRequest {
    ApiRequest::post(&["samples", sample_id.as_str(), "analyses"]).send(json!({
        "ref_id": ref_id,
        "subtractions": subtraction_ids,
        "workflow": workflow,
    }))
}

pub fn remove(analysis_id: &AnalysisId) -> ApiRequest {
    ApiRequest::delete(&["analyses", analysis_id.as_str()])
}

/// Starts a BLAST search for one NuVs sequence of an analysis.
pub fn blast_nuvs(analysis_id: &AnalysisId, sequence_index: u32) -> ApiRequest {
    ApiRequest::put(&["analyses", analysis_id.as_str(), &sequence_index.to_string(), "blast"])
}
