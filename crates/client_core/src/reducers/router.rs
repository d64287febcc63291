use serde::Serialize;
use shared::{domain::Location, Action};

use super::Reducer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    Push,
    Pop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterState {
    pub location: Location,
    pub action: HistoryAction,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            location: Location::new("/"),
            action: HistoryAction::Pop,
        }
    }
}

impl Reducer for RouterState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let (location, history_action) = match action {
            Action::Navigate(location) => (location, HistoryAction::Push),
            Action::LocationChanged(location) => (location, HistoryAction::Pop),
            _ => return None,
        };
        Some(Self {
            location: location.clone(),
            action: history_action,
        })
    }
}
