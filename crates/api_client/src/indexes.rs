use shared::domain::{IndexId, ReferenceId};

use crate::ApiRequest;

pub fn find(ref_id: &ReferenceId, page: u64) -> ApiRequest {
    ApiRequest::get(&["refs", ref_id.as_str(), "indexes"]).query("page", page)
}

pub fn get(index_id: &IndexId) -> ApiRequest {
    ApiRequest::get(&["indexes", index_id.as_str()])
}

pub fn create(ref_id: &ReferenceId) -> ApiRequest {
    ApiRequest::post(&["refs", ref_id.as_str(), "indexes"])
}

/// Reference changes not yet included in a built index.
pub fn get_unbuilt(ref_id: &ReferenceId) -> ApiRequest {
    ApiRequest::get(&["refs", ref_id.as_str(), "history"]).query("unbuilt", true)
}
