//! The generalized resource slice shared by every domain.

use im::OrdMap;
use serde::Serialize;
use shared::{
    domain::Domain,
    protocol::{Failed, Succeeded},
    Action, Category, Mode, Page, Record, Verb,
};

/// What a `Create` success does to the current listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Append the new record to the listed page.
    Append,
    /// Leave the listing alone; the server decides placement and the next
    /// list fetch picks the record up.
    Refetch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceState {
    /// Last fetched page, replaced wholesale by every list success.
    pub listing: Option<Page>,
    /// Detail records keyed by id.
    pub documents: OrdMap<String, Record>,
    /// Requests awaiting a completion, per category.
    pub pending: OrdMap<Category, usize>,
}

impl ResourceState {
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.documents.get(id)
    }

    pub fn is_pending(&self, category: Category) -> bool {
        self.pending.get(&category).is_some_and(|count| *count > 0)
    }

    pub fn listed_ids(&self) -> Vec<String> {
        self.listing
            .as_ref()
            .map(|page| page.documents.iter().filter_map(Record::id).collect())
            .unwrap_or_default()
    }

    pub fn reduce(&self, action: &Action, domain: Domain, membership: Membership) -> Option<Self> {
        match action {
            Action::Requested(request) if request.domain() == domain => {
                let mut next = self.clone();
                next.begin(request.category());
                Some(next)
            }
            Action::Succeeded(succeeded) if succeeded.request.domain() == domain => {
                let mut next = self.clone();
                next.finish(succeeded.request.category());
                next.apply_success(succeeded, membership);
                Some(next)
            }
            Action::Failed(Failed { request, .. }) if request.domain() == domain => {
                // A failure leaves cached records untouched.
                let mut next = self.clone();
                next.finish(request.category());
                Some(next)
            }
            _ => None,
        }
    }

    fn begin(&mut self, category: Category) {
        match category.mode() {
            // Superseded requests never complete, so latest-wins categories
            // count at most one outstanding request.
            Mode::LatestWins => {
                self.pending.insert(category, 1);
            }
            Mode::AllConcurrent => {
                let outstanding = self.pending.get(&category).copied().unwrap_or(0);
                self.pending.insert(category, outstanding + 1);
            }
        }
    }

    fn finish(&mut self, category: Category) {
        let remaining = self
            .pending
            .get(&category)
            .map(|count| count.saturating_sub(1))
            .unwrap_or(0);
        if remaining == 0 {
            self.pending.remove(&category);
        } else {
            self.pending.insert(category, remaining);
        }
    }

    fn apply_success(&mut self, succeeded: &Succeeded, membership: Membership) {
        let request = &succeeded.request;
        match request.category().verb() {
            Verb::List => {
                if let Some(page) = succeeded.payload.page() {
                    self.listing = Some(page);
                }
            }
            Verb::Get => {
                if let Some(record) = succeeded.payload.record() {
                    self.upsert(record);
                }
            }
            Verb::Create => {
                if let Some(record) = succeeded.payload.record() {
                    self.upsert(record);
                    if membership == Membership::Append {
                        if let Some(listing) = self.listing.as_mut() {
                            listing.append(record);
                        }
                    }
                }
            }
            Verb::Edit => {
                if let Some(record) = succeeded.payload.record() {
                    self.upsert(record);
                    if let Some(listing) = self.listing.as_mut() {
                        listing.replace(record);
                    }
                }
            }
            Verb::Remove => {
                if let Some(id) = request.target_id() {
                    self.evict(id);
                }
            }
            Verb::Other => {}
        }
    }

    pub fn upsert(&mut self, record: &Record) {
        if let Some(id) = record.id() {
            self.documents.insert(id, record.clone());
        }
    }

    pub fn evict(&mut self, id: &str) {
        self.documents.remove(id);
        if let Some(listing) = self.listing.as_mut() {
            listing.remove(id);
        }
    }
}

#[cfg(test)]
#[path = "tests/resource_tests.rs"]
mod tests;
