use serde::Serialize;
use shared::{domain::Domain, protocol::Succeeded, Action, Record, Request};

use super::{
    resource::{Membership, ResourceState},
    Reducer,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HmmsState {
    #[serde(flatten)]
    pub resource: ResourceState,
    /// Installation status, refreshed by listings and install requests.
    pub status: Option<Record>,
}

impl Reducer for HmmsState {
    fn reduce(&self, action: &Action) -> Option<Self> {
        let resource = self.resource.reduce(action, Domain::Hmms, Membership::Refetch)?;
        let mut status = self.status.clone();

        if let Action::Succeeded(Succeeded {
            request, payload, ..
        }) = action
        {
            match request {
                Request::InstallHmms => {
                    if let Some(record) = payload.record() {
                        status = Some(record.clone());
                    }
                }
                Request::FindHmms { .. } => {
                    if let Some(listed) = resource
                        .listing
                        .as_ref()
                        .and_then(|page| page.extra.get("status"))
                        .and_then(|value| Record::from_value(value.clone()))
                    {
                        status = Some(listed);
                    }
                }
                _ => {}
            }
        }

        Some(Self { resource, status })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::{Page, Payload};

    use super::*;

    #[test]
    fn status_comes_from_listings_and_installs() {
        let page: Page = serde_json::from_value(json!({
            "documents": [],
            "status": {"installed": false, "task": null}
        }))
        .expect("page");
        let listed = HmmsState::default()
            .reduce(&Action::succeeded(
                Request::FindHmms {
                    term: String::new(),
                    page: 1,
                },
                Payload::Page(page),
            ))
            .expect("changed");
        assert_eq!(
            listed.status.as_ref().and_then(|s| s.get("installed")),
            Some(&json!(false))
        );

        let installing = listed
            .reduce(&Action::succeeded(
                Request::InstallHmms,
                Payload::Record(Record::from_value(json!({"task": {"id": 4}})).expect("object")),
            ))
            .expect("changed");
        assert_eq!(
            installing.status.and_then(|s| s.get("task").cloned()),
            Some(json!({"id": 4}))
        );
    }
}
