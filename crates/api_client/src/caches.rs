use shared::domain::{CacheId, SampleId};

use crate::ApiRequest;

pub fn get(sample_id: &SampleId, cache_id: &CacheId) -> ApiRequest {
    ApiRequest::get(&["samples", sample_id.as_str(), "caches", cache_id.as_str()])
}
