use shared::domain::FileId;

use crate::{term, ApiRequest};

pub fn find(file_type: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["uploads"])
        .query_opt("type", term(file_type))
        .query("page", page)
}

pub fn remove(file_id: &FileId) -> ApiRequest {
    ApiRequest::delete(&["uploads", file_id.as_str()])
}
