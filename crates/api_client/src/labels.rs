use serde_json::json;
use shared::domain::LabelId;

use crate::ApiRequest;

pub fn list() -> ApiRequest {
    ApiRequest::get(&["labels"])
}

pub fn create(name: &str, color: &str, description: &str) -> ApiRequest {
    ApiRequest::post(&["labels"]).send(json!({
        "name": name,
        "color": color,
        "description": description,
    }))
}

pub fn update(label_id: &LabelId, name: &str, color: &str, description: &str) -> ApiRequest {
    ApiRequest::patch(&["labels", label_id.as_str()]).send(json!({
        "name": name,
        "color": color,
        "description": description,
    }))
}

pub fn remove(label_id: &LabelId) -> ApiRequest {
    ApiRequest::delete(&["labels", label_id.as_str()])
}
