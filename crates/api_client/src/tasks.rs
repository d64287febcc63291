use shared::domain::TaskId;

use crate::ApiRequest;

pub fn list() -> ApiRequest {
    ApiRequest::get(&["tasks"])
}

pub fn get(task_id: &TaskId) -> ApiRequest {
    ApiRequest::get(&["tasks", task_id.as_str()])
}
