use shared::domain::JobId;

use crate::ApiRequest;

pub fn find(page: u64, states: &[String]) -> ApiRequest {
    ApiRequest::get(&["jobs"])
        .query("page", page)
        .query_each("state", states)
}

pub fn get(job_id: &JobId) -> ApiRequest {
    ApiRequest::get(&["jobs", job_id.as_str()])
}

pub fn cancel(job_id: &JobId) -> ApiRequest {
    ApiRequest::put(&["jobs", job_id.as_str(), "cancel"])
}

pub fn archive(job_id: &JobId) -> ApiRequest {
    ApiRequest::patch(&["jobs", job_id.as_str(), "archive"])
}
