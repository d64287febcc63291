use serde_json::{json, Value};
use shared::{
    domain::{LabelId, SampleId},
    protocol::{Fields, NewSample},
};

use crate::{term, ApiRequest};

pub fn find(find: &str, page: u64, labels: &[LabelId]) -> ApiRequest {
    ApiRequest::get(&["samples"])
        .query_opt("find", term(find))
        .query("page", page)
        .query_each("label", labels)
}

pub fn get(sample_id: &SampleId) -> ApiRequest {
    ApiRequest::get(&["samples", sample_id.as_str()])
}

pub fn create(sample: &NewSample) -> ApiRequest {
    ApiRequest::post(&["samples"]).send(json!({
        "name": sample.name,
        "isolate": sample.isolate,
        "host": sample.host,
        "locale": sample.locale,
        "library_type": sample.library_type,
        "subtractions": sample.subtractions,
        "files": sample.files,
        "labels": sample.labels,
        "group": sample.group,
    }))
}

pub fn update(sample_id: &SampleId, update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["samples", sample_id.as_str()]).send(Value::Object(update.clone()))
}

pub fn update_rights(sample_id: &SampleId, update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["samples", sample_id.as_str(), "rights"])
        .send(Value::Object(update.clone()))
}

pub fn remove(sample_id: &SampleId) -> ApiRequest {
    ApiRequest::delete(&["samples", sample_id.as_str()])
}
