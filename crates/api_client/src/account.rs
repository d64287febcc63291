use serde_json::{json, Value};
use shared::{domain::KeyId, protocol::Fields};

use crate::ApiRequest;

pub fn login(username: &str, password: &str, remember: bool) -> ApiRequest {
    ApiRequest::post(&["account", "login"]).send(json!({
        "username": username,
        "password": password,
        "remember": remember,
    }))
}

pub fn logout() -> ApiRequest {
    ApiRequest::delete(&["account", "logout"])
}

pub fn reset_password(password: &str, reset_code: &str) -> ApiRequest {
    ApiRequest::post(&["account", "reset"]).send(json!({
        "password": password,
        "reset_code": reset_code,
    }))
}

pub fn get() -> ApiRequest {
    ApiRequest::get(&["account"])
}

pub fn update(email: &str) -> ApiRequest {
    ApiRequest::patch(&["account"]).send(json!({ "email": email }))
}

pub fn update_settings(update: &Fields) -> ApiRequest {
    ApiRequest::patch(&["account", "settings"]).send(Value::Object(update.clone()))
}

pub fn change_password(old_password: &str, password: &str) -> ApiRequest {
    ApiRequest::patch(&["account"]).send(json!({
        "old_password": old_password,
        "password": password,
    }))
}

pub fn get_api_keys() -> ApiRequest {
    ApiRequest::get(&["account", "keys"])
}

pub fn create_api_key(name: &str, permissions: &Fields) -> ApiRequest {
    ApiRequest::post(&["account", "keys"]).send(json!({
        "name": name,
        "permissions": permissions,
    }))
}

pub fn update_api_key(key_id: &KeyId, permissions: &Fields) -> ApiRequest {
    ApiRequest::patch(&["account", "keys", key_id.as_str()])
        .send(json!({ "permissions": permissions }))
}

pub fn remove_api_key(key_id: &KeyId) -> ApiRequest {
    ApiRequest::delete(&["account", "keys", key_id.as_str()])
}
