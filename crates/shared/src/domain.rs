use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(AnalysisId);
id_newtype!(CacheId);
id_newtype!(ChangeId);
id_newtype!(FileId);
id_newtype!(GroupId);
id_newtype!(HmmId);
id_newtype!(IndexId);
id_newtype!(IsolateId);
id_newtype!(JobId);
id_newtype!(KeyId);
id_newtype!(LabelId);
id_newtype!(OtuId);
id_newtype!(ReferenceId);
id_newtype!(SampleId);
id_newtype!(SequenceId);
id_newtype!(SubtractionId);
id_newtype!(TaskId);
id_newtype!(UserId);

/// Owner of a group of categories. Each domain has one effect watcher and,
/// apart from `App`, one resource slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    App,
    Account,
    Analyses,
    Caches,
    Files,
    Groups,
    Hmms,
    Indexes,
    Jobs,
    Labels,
    Otus,
    References,
    Samples,
    Settings,
    Subtraction,
    Tasks,
    Users,
}

impl Domain {
    pub const ALL: [Domain; 17] = [
        Domain::App,
        Domain::Account,
        Domain::Analyses,
        Domain::Caches,
        Domain::Files,
        Domain::Groups,
        Domain::Hmms,
        Domain::Indexes,
        Domain::Jobs,
        Domain::Labels,
        Domain::Otus,
        Domain::References,
        Domain::Samples,
        Domain::Settings,
        Domain::Subtraction,
        Domain::Tasks,
        Domain::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::App => "app",
            Domain::Account => "account",
            Domain::Analyses => "analyses",
            Domain::Caches => "caches",
            Domain::Files => "files",
            Domain::Groups => "groups",
            Domain::Hmms => "hmms",
            Domain::Indexes => "indexes",
            Domain::Jobs => "jobs",
            Domain::Labels => "labels",
            Domain::Otus => "otus",
            Domain::References => "references",
            Domain::Samples => "samples",
            Domain::Settings => "settings",
            Domain::Subtraction => "subtraction",
            Domain::Tasks => "tasks",
            Domain::Users => "users",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A history entry as seen by the router slice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            f.write_str(&self.pathname)
        } else {
            write!(f, "{}?{}", self.pathname, self.search.trim_start_matches('?'))
        }
    }
}
