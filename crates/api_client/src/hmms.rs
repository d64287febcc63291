use shared::domain::HmmId;

use crate::{term, ApiRequest};

pub fn find(find: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["hmms"])
        .query_opt("find", term(find))
        .query("page", page)
}

pub fn get(hmm_id: &HmmId) -> ApiRequest {
    ApiRequest::get(&["hmms", hmm_id.as_str()])
}

/// Asks the server to install the latest official HMM release.
pub fn install() -> ApiRequest {
    ApiRequest::post(&["hmms", "status", "updates"])
}
