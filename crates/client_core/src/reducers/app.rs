use serde::Serialize;
use serde_json::Value;
use shared::{
    protocol::{Failed, Succeeded},
    Action, Request,
};

use super::Reducer;

/// Authentication flow flags driving which top-level screen is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    /// Show the login form.
    pub login: bool,
    /// Show the forced password reset form.
    pub reset: bool,
    pub reset_code: Option<String>,
    pub reset_error: Option<String>,
    /// No user exists yet; show first-user setup.
    pub first: bool,
    pub dev: bool,
}

impl Reducer for AppState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let mut next = self.clone();
        match action {
            Action::SetInitialState { dev, first } => {
                next.dev = *dev;
                next.first = *first;
            }
            Action::Succeeded(Succeeded {
                request, payload, ..
            }) => match request {
                Request::Login { .. } => {
                    let record = payload.record();
                    let reset = record
                        .and_then(|record| record.get("reset"))
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    next.login = false;
                    next.reset = reset;
                    if reset {
                        next.reset_code = record
                            .and_then(|record| record.get("reset_code"))
                            .and_then(Value::as_str)
                            .map(str::to_string);
                    }
                }
                Request::Logout => next.login = true,
                Request::ResetPassword { .. } => {
                    next.login = false;
                    next.reset = false;
                    next.reset_code = None;
                    next.reset_error = None;
                }
                Request::CreateFirstUser { .. } => {
                    next.login = false;
                    next.first = false;
                }
                _ => return None,
            },
            Action::Failed(Failed {
                request, failure, ..
            }) => match request {
                Request::Login { .. } => next.login = true,
                Request::ResetPassword { reset_code, .. } => {
                    // The server may rotate the code when it rejects a reset.
                    next.login = false;
                    next.reset = true;
                    next.reset_code = Some(
                        failure
                            .body
                            .get("reset_code")
                            .and_then(Value::as_str)
                            .unwrap_or(reset_code.as_str())
                            .to_string(),
                    );
                    next.reset_error = Some(
                        failure
                            .body
                            .get("error")
                            .and_then(Value::as_str)
                            .unwrap_or(failure.message.as_str())
                            .to_string(),
                    );
                }
                _ => return None,
            },
            _ => return None,
        }
        Some(next)
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
