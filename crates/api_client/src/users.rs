use serde_json::{json, Value};
use shared::{domain::UserId, protocol::Fields};

use crate::{term, ApiRequest};

pub fn find(find: &str, page: u64) -> ApiRequest {
    ApiRequest::get(&["users"])
        .query_opt("find", term(find))
        .query("page", page)
}

pub fn get(user_id: &UserId) -> ApiRequest {
    ApiRequest::get(&["users", user_id.as_str()])
}

pub fn create(handle: &str, password: &str, force_reset: bool) -> ApiRequest {
    ApiRequest::post(&["users"]).send(json!({
        "handle": handle,
        "password": password,
        "force_reset": force_reset,
    }))
}

/// Only available before any user exists.
pub fn create_first(handle: &str, password: &str) -> ApiRequest {
    ApiRequest::put(&["users", "first"]).send(json!({
        "handle": handle,
        "password": password,
    }))
}

pub fn edit(user_id: &UserId, update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["users", user_id.as_str()]).send(Value::Object(update.clone()))
}
