use serde_json::{json, Value};
use shared::{domain::ReferenceId, protocol::Fields};

use crate::{term, ApiRequest};

pub fn find(find: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["refs"])
        .query_opt("find", term(find))
        .query("page", page)
}

pub fn get(ref_id: &ReferenceId) -> ApiRequest {
    ApiRequest::get(&["refs", ref_id.as_str()])
}

/// Creates an empty reference.
pub fn create(name: &str, description: &str, data_type: &str, organism: &str) -> ApiRequest {
    ApiRequest::post(&["refs"]).send(json!({
        "name": name,
        "description": description,
        "data_type": data_type,
        "organism": organism,
    }))
}

pub fn edit(ref_id: &ReferenceId, update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["refs", ref_id.as_str()]).send(Value::Object(update.clone()))
}

pub fn remove(ref_id: &ReferenceId) -> ApiRequest {
    ApiRequest::delete(&["refs", ref_id.as_str()])
}
