use serde::Serialize;
use serde_json::Value;
use shared::{domain::Domain, protocol::Succeeded, Action, Record, Request};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountState {
    pub account: Option<Record>,
    /// Set once the first `GET_ACCOUNT` completes.
    pub ready: bool,
    /// API keys, reduced with the generic resource policy.
    pub keys: ResourceState,
    /// Secret of the most recently created API key. The server only returns
    /// it once.
    pub new_key: Option<String>,
}

impl Reducer for AccountState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        if let Action::Succeeded(Succeeded {
            request: Request::Logout,
            ..
        }) = action
        {
            return Some(Self::default());
        }

        // Every account-domain action touches `keys` (at least its pending
        // counts), so `None` here means the action is irrelevant.
        let keys = self.keys.reduce(action, Domain::Account, Membership::Append)?;
        let mut next = self.clone();
        next.keys = keys;

        if let Action::Succeeded(Succeeded {
            request, payload, ..
        }) = action
        {
            let record = payload.record();
            match (request, record) {
                (Request::GetAccount, Some(record)) => {
                    next.account = Some(record.clone());
                    next.ready = true;
                }
                (
                    Request::UpdateAccount { .. } | Request::ChangeAccountPassword { .. },
                    Some(record),
                ) => {
                    let mut account = next.account.take().unwrap_or_default();
                    account.merge(record);
                    next.account = Some(account);
                }
                (Request::UpdateAccountSettings { .. }, Some(record)) => {
                    let mut account = next.account.take().unwrap_or_default();
                    account.set("settings", record.clone().into_value());
                    next.account = Some(account);
                }
                (Request::CreateApiKey { .. }, Some(record)) => {
                    next.new_key = record
                        .get("key")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                }
                _ => {}
            }
        }

        Some(next)
    }
}

#[cfg(test)]
#[path = "tests/account_tests.rs"]
mod tests;
