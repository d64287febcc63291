use serde_json::Value;
use shared::protocol::Fields;

use crate::ApiRequest;

pub fn get() -> ApiRequest {
    ApiRequest::get(&["settings"])
}

pub fn update(update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["settings"]).send(Value::Object(update.clone()))
}
