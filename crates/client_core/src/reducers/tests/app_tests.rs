use serde_json::json;
use shared::{error::Failure, Payload, Record};

use super::*;

fn login() -> Request {
    Request::Login {
        username: "bob".to_string(),
        password: "pw".to_string(),
        remember: true,
    }
}

fn reset() -> Request {
    Request::ResetPassword {
        password: "new".to_string(),
        reset_code: "code-1".to_string(),
    }
}

fn record(value: serde_json::Value) -> Payload {
    Payload::Record(Record::from_value(value).expect("object"))
}

#[test]
fn initial_state_sets_dev_and_first() {
    let next = AppState::default()
        .reduce(&Action::SetInitialState {
            dev: true,
            first: true,
        })
        .expect("changed");
    assert!(next.dev);
    assert!(next.first);
}

#[test]
fn login_failure_shows_the_login_form() {
    let next = AppState::default()
        .reduce(&Action::failed(login(), Failure::new(401, "Invalid credentials")))
        .expect("changed");
    assert!(next.login);
}

#[test]
fn login_success_may_demand_a_password_reset() {
    let state = AppState {
        login: true,
        ..AppState::default()
    };

    let plain = state
        .reduce(&Action::succeeded(login(), record(json!({"reset": false}))))
        .expect("changed");
    assert!(!plain.login);
    assert!(!plain.reset);

    let forced = state
        .reduce(&Action::succeeded(
            login(),
            record(json!({"reset": true, "reset_code": "abc"})),
        ))
        .expect("changed");
    assert!(forced.reset);
    assert_eq!(forced.reset_code.as_deref(), Some("abc"));
}

#[test]
fn rejected_reset_keeps_the_form_open_with_the_server_error() {
    let failure = Failure::from_response(
        400,
        json!({"error": "Password too short", "reset_code": "code-2"}),
        "Bad Request",
    );
    let next = AppState::default()
        .reduce(&Action::failed(reset(), failure))
        .expect("changed");
    assert!(next.reset);
    assert_eq!(next.reset_code.as_deref(), Some("code-2"));
    assert_eq!(next.reset_error.as_deref(), Some("Password too short"));

    let done = next
        .reduce(&Action::succeeded(reset(), record(json!({}))))
        .expect("changed");
    assert!(!done.reset);
    assert_eq!(done.reset_code, None);
    assert_eq!(done.reset_error, None);
}

#[test]
fn logout_and_first_user_flip_screens() {
    let logged_out = AppState::default()
        .reduce(&Action::succeeded(Request::Logout, Payload::Empty))
        .expect("changed");
    assert!(logged_out.login);

    let first = AppState {
        first: true,
        ..AppState::default()
    };
    let created = first
        .reduce(&Action::succeeded(
            Request::CreateFirstUser {
                handle: "admin".to_string(),
                password: "pw".to_string(),
            },
            record(json!({"id": "admin"})),
        ))
        .expect("changed");
    assert!(!created.first);
}

#[test]
fn unrelated_actions_are_ignored() {
    let state = AppState::default();
    assert!(state.reduce(&Action::Requested(login())).is_none());
    assert!(state
        .reduce(&Action::succeeded(Request::GetAccount, Payload::Empty))
        .is_none());
}
