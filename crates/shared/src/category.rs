//! The fixed catalog of request categories.
//!
//! Every category owns a REQUESTED / SUCCEEDED / FAILED triple. The table
//! below is the single place that decides which slice a category belongs to,
//! how its successes are reduced, whether a newer request supersedes an
//! in-flight one, and how its failures are recorded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// How a resource slice reduces a successful response of this category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Get,
    Create,
    Edit,
    Remove,
    /// Handled by slice-specific code (nested OTU edits, auth flows, ...).
    Other,
}

/// Concurrency policy applied by the effect orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A newer request of the same category cancels the in-flight one and the
    /// store drops any completion that is not the latest.
    LatestWins,
    /// Every request runs to completion and every completion is applied.
    AllConcurrent,
}

/// What the error slice keeps when a request of this category fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorShape {
    /// `{status, message}` rendered inline next to the relevant form.
    StatusMessage,
    /// The raw response body. Only `CREATE_FIRST_USER` uses this; the
    /// asymmetry is inherited from the API contract and kept as-is until the
    /// server side confirms which shape it intends.
    RawBody,
    /// Not rendered inline; forwarded to the error reporter instead.
    Reported,
}

macro_rules! categories {
    ($($variant:ident => $name:literal, $domain:ident, $verb:ident, $mode:ident, $shape:ident;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Category {
            $($variant,)+
        }

        impl Category {
            pub const ALL: &'static [Category] = &[$(Category::$variant,)+];

            /// Stable action-type stem, e.g. `CREATE_SAMPLE`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Category::$variant => $name,)+
                }
            }

            pub const fn domain(self) -> Domain {
                match self {
                    $(Category::$variant => Domain::$domain,)+
                }
            }

            pub const fn verb(self) -> Verb {
                match self {
                    $(Category::$variant => Verb::$verb,)+
                }
            }

            pub const fn mode(self) -> Mode {
                match self {
                    $(Category::$variant => Mode::$mode,)+
                }
            }

            pub const fn error_shape(self) -> ErrorShape {
                match self {
                    $(Category::$variant => ErrorShape::$shape,)+
                }
            }
        }
    };
}

categories! {
    Login                 => "LOGIN",                   App,         Other,  AllConcurrent, StatusMessage;
    Logout                => "LOGOUT",                  App,         Other,  AllConcurrent, Reported;
    ResetPassword         => "RESET_PASSWORD",          App,         Other,  AllConcurrent, Reported;
    CreateFirstUser       => "CREATE_FIRST_USER",       App,         Other,  AllConcurrent, RawBody;

    GetAccount            => "GET_ACCOUNT",             Account,     Other,  LatestWins,    Reported;
    UpdateAccount         => "UPDATE_ACCOUNT",          Account,     Other,  AllConcurrent, StatusMessage;
    UpdateAccountSettings => "UPDATE_ACCOUNT_SETTINGS", Account,     Other,  AllConcurrent, Reported;
    ChangeAccountPassword => "CHANGE_ACCOUNT_PASSWORD", Account,     Other,  AllConcurrent, StatusMessage;
    GetApiKeys            => "GET_API_KEYS",            Account,     List,   LatestWins,    Reported;
    CreateApiKey          => "CREATE_API_KEY",          Account,     Create, AllConcurrent, Reported;
    UpdateApiKey          => "UPDATE_API_KEY",          Account,     Edit,   AllConcurrent, Reported;
    RemoveApiKey          => "REMOVE_API_KEY",          Account,     Remove, AllConcurrent, Reported;

    FindAnalyses          => "FIND_ANALYSES",           Analyses,    List,   LatestWins,    Reported;
    GetAnalysis           => "GET_ANALYSIS",            Analyses,    Get,    LatestWins,    StatusMessage;
    Analyze               => "ANALYZE",                 Analyses,    Create, AllConcurrent, Reported;
    RemoveAnalysis        => "REMOVE_ANALYSIS",         Analyses,    Remove, AllConcurrent, Reported;
    BlastNuvs             => "BLAST_NUVS",              Analyses,    Other,  AllConcurrent, Reported;

    GetCache              => "GET_CACHE",               Caches,      Get,    LatestWins,    Reported;

    FindFiles             => "FIND_FILES",              Files,       List,   LatestWins,    Reported;
    RemoveFile            => "REMOVE_FILE",             Files,       Remove, AllConcurrent, Reported;

    ListGroups            => "LIST_GROUPS",             Groups,      List,   LatestWins,    Reported;
    GetGroup              => "GET_GROUP",               Groups,      Get,    LatestWins,    Reported;
    CreateGroup           => "CREATE_GROUP",            Groups,      Create, AllConcurrent, StatusMessage;
    SetGroupPermission    => "SET_GROUP_PERMISSION",    Groups,      Edit,   AllConcurrent, Reported;
    RemoveGroup           => "REMOVE_GROUP",            Groups,      Remove, AllConcurrent, Reported;

    FindHmms              => "FIND_HMMS",               Hmms,        List,   LatestWins,    Reported;
    GetHmm                => "GET_HMM",                 Hmms,        Get,    LatestWins,    StatusMessage;
    InstallHmms           => "INSTALL_HMMS",            Hmms,        Other,  AllConcurrent, Reported;

    FindIndexes           => "FIND_INDEXES",            Indexes,     List,   LatestWins,    Reported;
    GetIndex              => "GET_INDEX",               Indexes,     Get,    LatestWins,    StatusMessage;
    CreateIndex           => "CREATE_INDEX",            Indexes,     Create, AllConcurrent, StatusMessage;
    GetUnbuiltChanges     => "GET_UNBUILT_CHANGES",     Indexes,     Other,  LatestWins,    Reported;

    FindJobs              => "FIND_JOBS",               Jobs,        List,   LatestWins,    Reported;
    GetJob                => "GET_JOB",                 Jobs,        Get,    LatestWins,    StatusMessage;
    CancelJob             => "CANCEL_JOB",              Jobs,        Edit,   AllConcurrent, Reported;
    ArchiveJob            => "ARCHIVE_JOB",             Jobs,        Edit,   AllConcurrent, Reported;

    ListLabels            => "LIST_LABELS",             Labels,      List,   LatestWins,    Reported;
    CreateLabel           => "CREATE_LABEL",            Labels,      Create, AllConcurrent, Reported;
    UpdateLabel           => "UPDATE_LABEL",            Labels,      Edit,   AllConcurrent, Reported;
    RemoveLabel           => "REMOVE_LABEL",            Labels,      Remove, AllConcurrent, Reported;

    ListOtus              => "LIST_OTUS",               Otus,        List,   LatestWins,    Reported;
    GetOtu                => "GET_OTU",                 Otus,        Get,    LatestWins,    StatusMessage;
    GetOtuHistory         => "GET_OTU_HISTORY",         Otus,        Other,  LatestWins,    Reported;
    GetGenbank            => "GET_GENBANK",             Otus,        Other,  LatestWins,    Reported;
    CreateOtu             => "CREATE_OTU",              Otus,        Create, AllConcurrent, StatusMessage;
    EditOtu               => "EDIT_OTU",                Otus,        Edit,   AllConcurrent, StatusMessage;
    RemoveOtu             => "REMOVE_OTU",              Otus,        Remove, AllConcurrent, Reported;
    AddIsolate            => "ADD_ISOLATE",             Otus,        Other,  AllConcurrent, StatusMessage;
    EditIsolate           => "EDIT_ISOLATE",            Otus,        Other,  AllConcurrent, StatusMessage;
    SetIsolateAsDefault   => "SET_ISOLATE_AS_DEFAULT",  Otus,        Other,  AllConcurrent, Reported;
    RemoveIsolate         => "REMOVE_ISOLATE",          Otus,        Other,  AllConcurrent, Reported;
    AddSequence           => "ADD_SEQUENCE",            Otus,        Other,  AllConcurrent, StatusMessage;
    EditSequence          => "EDIT_SEQUENCE",           Otus,        Other,  AllConcurrent, StatusMessage;
    RemoveSequence        => "REMOVE_SEQUENCE",         Otus,        Other,  AllConcurrent, Reported;
    Revert                => "REVERT",                  Otus,        Other,  AllConcurrent, Reported;

    FindReferences        => "FIND_REFERENCES",         References,  List,   LatestWins,    Reported;
    GetReference          => "GET_REFERENCE",           References,  Get,    LatestWins,    StatusMessage;
    CreateReference       => "CREATE_REFERENCE",        References,  Create, AllConcurrent, Reported;
    EditReference         => "EDIT_REFERENCE",          References,  Edit,   AllConcurrent, Reported;
    RemoveReference       => "REMOVE_REFERENCE",        References,  Remove, AllConcurrent, Reported;

    FindSamples           => "FIND_SAMPLES",            Samples,     List,   LatestWins,    Reported;
    GetSample             => "GET_SAMPLE",              Samples,     Get,    LatestWins,    StatusMessage;
    CreateSample          => "CREATE_SAMPLE",           Samples,     Create, AllConcurrent, StatusMessage;
    UpdateSample          => "UPDATE_SAMPLE",           Samples,     Edit,   AllConcurrent, StatusMessage;
    UpdateSampleRights    => "UPDATE_SAMPLE_RIGHTS",    Samples,     Edit,   AllConcurrent, Reported;
    RemoveSample          => "REMOVE_SAMPLE",           Samples,     Remove, AllConcurrent, Reported;

    GetSettings           => "GET_SETTINGS",            Settings,    Other,  LatestWins,    Reported;
    UpdateSettings        => "UPDATE_SETTINGS",         Settings,    Other,  AllConcurrent, StatusMessage;

    FindSubtractions      => "FIND_SUBTRACTIONS",       Subtraction, List,   LatestWins,    Reported;
    GetSubtraction        => "GET_SUBTRACTION",         Subtraction, Get,    LatestWins,    StatusMessage;
    CreateSubtraction     => "CREATE_SUBTRACTION",      Subtraction, Create, AllConcurrent, StatusMessage;
    EditSubtraction       => "EDIT_SUBTRACTION",        Subtraction, Edit,   AllConcurrent, Reported;
    RemoveSubtraction     => "REMOVE_SUBTRACTION",      Subtraction, Remove, AllConcurrent, Reported;

    ListTasks             => "LIST_TASKS",              Tasks,       List,   LatestWins,    Reported;
    GetTask               => "GET_TASK",                Tasks,       Get,    LatestWins,    Reported;

    FindUsers             => "FIND_USERS",              Users,       List,   LatestWins,    StatusMessage;
    GetUser               => "GET_USER",                Users,       Get,    LatestWins,    StatusMessage;
    CreateUser            => "CREATE_USER",             Users,       Create, AllConcurrent, StatusMessage;
    EditUser              => "EDIT_USER",               Users,       Edit,   AllConcurrent, StatusMessage;
}

impl Category {
    /// Key under which the error slice records failures, e.g. `LOGIN_ERROR`.
    pub fn error_key(self) -> String {
        format!("{}_ERROR", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|category| category.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
