use serde::Serialize;
use shared::{protocol::Succeeded, Action, Record, Request};

use super::Reducer;

/// Server-wide administration settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsState {
    pub data: Option<Record>,
}

impl Reducer for SettingsState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let Action::Succeeded(Succeeded {
            request, payload, ..
        }) = action
        else {
            return None;
        };
        let record = payload.record()?;
        match request {
            Request::GetSettings => Some(Self {
                data: Some(record.clone()),
            }),
            Request::UpdateSettings { .. } => {
                let mut data = self.data.clone().unwrap_or_default();
                data.merge(record);
                Some(Self { data: Some(data) })
            }
            _ => None,
        }
    }
}
