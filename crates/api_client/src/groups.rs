use serde_json::{json, Map, Value};
use shared::domain::GroupId;

use crate::ApiRequest;

pub fn list() -> ApiRequest {
    ApiRequest::get(&["groups"])
}

pub fn get(group_id: &GroupId) -> ApiRequest {
    ApiRequest::get(&["groups", group_id.as_str()])
}

pub fn create(name: &str) -> ApiRequest {
    ApiRequest::post(&["groups"]).send(json!({ "name": name }))
}

pub fn set_permission(group_id: &GroupId, permission: &str, value: bool) -> ApiRequest {
    let mut permissions = Map::new();
    permissions.insert(permission.to_string(), Value::Bool(value));
    ApiRequest::patch(&["groups", group_id.as_str()]).send(json!({ "permissions": permissions }))
}

pub fn remove(group_id: &GroupId) -> ApiRequest {
    ApiRequest::delete(&["groups", group_id.as_str()])
}
