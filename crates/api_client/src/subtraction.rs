use serde_json::json;
use shared::domain::{FileId, SubtractionId};

use crate::{term, ApiRequest};

pub fn find(find: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["subtractions"])
        .query_opt("find", term(find))
        .query("page", page)
}

pub fn get(subtraction_id: &SubtractionId) -> ApiRequest {
    ApiRequest::get(&["subtractions", subtraction_id.as_str()])
}

/// Creates a subtraction from a previously uploaded FASTA file.
pub fn create(name: &str, nickname: &str, upload_id: &FileId) -> ApiRequest {
    ApiRequest::post(&["subtractions"]).send(json!({
        "name": name,
        "nickname": nickname,
        "upload_id": upload_id,
    }))
}

pub fn edit(subtraction_id: &SubtractionId, name: &str, nickname: &str) -> ApiRequest {
    ApiRequest::patch(&["subtractions", subtraction_id.as_str()]).send(json!({
        "name": name,
        "nickname": nickname,
    }))
}

pub fn remove(subtraction_id: &SubtractionId) -> ApiRequest {
    ApiRequest::delete(&["subtractions", subtraction_id.as_str()])
}
