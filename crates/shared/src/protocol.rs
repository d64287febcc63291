use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    category::{Category, Verb},
    domain::{
        AnalysisId, CacheId, ChangeId, Domain, FileId, GroupId, HmmId, IndexId, IsolateId, JobId,
        KeyId, LabelId, Location, OtuId, ReferenceId, SampleId, SequenceId, SubtractionId, TaskId,
        UserId,
    },
    error::{DecodeError, Failure},
    record::{Page, Record},
};

/// Free-form PATCH body, forwarded to the API as-is.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SequenceFields {
    pub accession: String,
    pub definition: String,
    pub host: String,
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewSample {
    pub name: String,
    pub isolate: String,
    pub host: String,
    pub locale: String,
    pub library_type: String,
    pub subtractions: Vec<SubtractionId>,
    pub files: Vec<FileId>,
    pub labels: Vec<LabelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
}

/// Payload of a `*_REQUESTED` action. One variant per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Login {
        username: String,
        password: String,
        remember: bool,
    },
    Logout,
    ResetPassword {
        password: String,
        reset_code: String,
    },
    CreateFirstUser {
        handle: String,
        password: String,
    },

    GetAccount,
    UpdateAccount {
        email: String,
    },
    UpdateAccountSettings {
        update: Fields,
    },
    ChangeAccountPassword {
        old_password: String,
        password: String,
    },
    GetApiKeys,
    CreateApiKey {
        name: String,
        permissions: Fields,
    },
    UpdateApiKey {
        key_id: KeyId,
        permissions: Fields,
    },
    RemoveApiKey {
        key_id: KeyId,
    },

    FindAnalyses {
        sample_id: SampleId,
        term: String,
        page: u64,
    },
    GetAnalysis {
        analysis_id: AnalysisId,
    },
    Analyze {
        sample_id: SampleId,
        ref_id: ReferenceId,
        subtraction_ids: Vec<SubtractionId>,
        workflow: String,
    },
    RemoveAnalysis {
        analysis_id: AnalysisId,
    },
    BlastNuvs {
        analysis_id: AnalysisId,
        sequence_index: u32,
    },

    GetCache {
        sample_id: SampleId,
        cache_id: CacheId,
    },

    FindFiles {
        file_type: String,
        page: u64,
    },
    RemoveFile {
        file_id: FileId,
    },

    ListGroups,
    GetGroup {
        group_id: GroupId,
    },
    CreateGroup {
        name: String,
    },
    SetGroupPermission {
        group_id: GroupId,
        permission: String,
        value: bool,
    },
    RemoveGroup {
        group_id: GroupId,
    },

    FindHmms {
        term: String,
        page: u64,
    },
    GetHmm {
        hmm_id: HmmId,
    },
    InstallHmms,

    FindIndexes {
        ref_id: ReferenceId,
        page: u64,
    },
    GetIndex {
        index_id: IndexId,
    },
    CreateIndex {
        ref_id: ReferenceId,
    },
    GetUnbuiltChanges {
        ref_id: ReferenceId,
    },

    FindJobs {
        page: u64,
        states: Vec<String>,
    },
    GetJob {
        job_id: JobId,
    },
    CancelJob {
        job_id: JobId,
    },
    ArchiveJob {
        job_id: JobId,
    },

    ListLabels,
    CreateLabel {
        name: String,
        color: String,
        description: String,
    },
    UpdateLabel {
        label_id: LabelId,
        name: String,
        color: String,
        description: String,
    },
    RemoveLabel {
        label_id: LabelId,
    },

    ListOtus {
        ref_id: ReferenceId,
        term: String,
        verified: bool,
        page: u64,
    },
    GetOtu {
        otu_id: OtuId,
    },
    GetOtuHistory {
        otu_id: OtuId,
    },
    GetGenbank {
        accession: String,
    },
    CreateOtu {
        ref_id: ReferenceId,
        name: String,
        abbreviation: String,
    },
    EditOtu {
        otu_id: OtuId,
        name: String,
        abbreviation: String,
        schema: Vec<Value>,
    },
    RemoveOtu {
        otu_id: OtuId,
        ref_id: ReferenceId,
    },
    AddIsolate {
        otu_id: OtuId,
        source_type: String,
        source_name: String,
    },
    EditIsolate {
        otu_id: OtuId,
        isolate_id: IsolateId,
        source_type: String,
        source_name: String,
    },
    SetIsolateAsDefault {
        otu_id: OtuId,
        isolate_id: IsolateId,
    },
    RemoveIsolate {
        otu_id: OtuId,
        isolate_id: IsolateId,
    },
    AddSequence {
        otu_id: OtuId,
        isolate_id: IsolateId,
        fields: SequenceFields,
    },
    EditSequence {
        otu_id: OtuId,
        isolate_id: IsolateId,
        sequence_id: SequenceId,
        fields: SequenceFields,
    },
    RemoveSequence {
        otu_id: OtuId,
        isolate_id: IsolateId,
        sequence_id: SequenceId,
    },
    Revert {
        otu_id: OtuId,
        change_id: ChangeId,
    },

    FindReferences {
        term: String,
        page: u64,
    },
    GetReference {
        ref_id: ReferenceId,
    },
    CreateReference {
        name: String,
        description: String,
        data_type: String,
        organism: String,
    },
    EditReference {
        ref_id: ReferenceId,
        update: Fields,
    },
    RemoveReference {
        ref_id: ReferenceId,
    },

    FindSamples {
        term: String,
        page: u64,
        labels: Vec<LabelId>,
    },
    GetSample {
        sample_id: SampleId,
    },
    CreateSample {
        sample: NewSample,
    },
    UpdateSample {
        sample_id: SampleId,
        update: Fields,
    },
    UpdateSampleRights {
        sample_id: SampleId,
        update: Fields,
    },
    RemoveSample {
        sample_id: SampleId,
    },

    GetSettings,
    UpdateSettings {
        update: Fields,
    },

    FindSubtractions {
        term: String,
        page: u64,
    },
    GetSubtraction {
        subtraction_id: SubtractionId,
    },
    CreateSubtraction {
        name: String,
        nickname: String,
        upload_id: FileId,
    },
    EditSubtraction {
        subtraction_id: SubtractionId,
        name: String,
        nickname: String,
    },
    RemoveSubtraction {
        subtraction_id: SubtractionId,
    },

    ListTasks,
    GetTask {
        task_id: TaskId,
    },

    FindUsers {
        term: String,
        page: u64,
    },
    GetUser {
        user_id: UserId,
    },
    CreateUser {
        handle: String,
        password: String,
        force_reset: bool,
    },
    EditUser {
        user_id: UserId,
        update: Fields,
    },
}

impl Request {
    pub fn category(&self) -> Category {
        match self {
            Request::Login { .. } => Category::Login,
            Request::Logout => Category::Logout,
            Request::ResetPassword { .. } => Category::ResetPassword,
            Request::CreateFirstUser { .. } => Category::CreateFirstUser,
            Request::GetAccount => Category::GetAccount,
            Request::UpdateAccount { .. } => Category::UpdateAccount,
            Request::UpdateAccountSettings { .. } => Category::UpdateAccountSettings,
            Request::ChangeAccountPassword { .. } => Category::ChangeAccountPassword,
            Request::GetApiKeys => Category::GetApiKeys,
            Request::CreateApiKey { .. } => Category::CreateApiKey,
            Request::UpdateApiKey { .. } => Category::UpdateApiKey,
            Request::RemoveApiKey { .. } => Category::RemoveApiKey,
            Request::FindAnalyses { .. } => Category::FindAnalyses,
            Request::GetAnalysis { .. } => Category::GetAnalysis,
            Request::Analyze { .. } => Category::Analyze,
            Request::RemoveAnalysis { .. } => Category::RemoveAnalysis,
            Request::BlastNuvs { .. } => Category::BlastNuvs,
            Request::GetCache { .. } => Category::GetCache,
            Request::FindFiles { .. } => Category::FindFiles,
            Request::RemoveFile { .. } => Category::RemoveFile,
            Request::ListGroups => Category::ListGroups,
            Request::GetGroup { .. } => Category::GetGroup,
            Request::CreateGroup { .. } => Category::CreateGroup,
            Request::SetGroupPermission { .. } => Category::SetGroupPermission,
            Request::RemoveGroup { .. } => Category::RemoveGroup,
            Request::FindHmms { .. } => Category::FindHmms,
            Request::GetHmm { .. } => Category::GetHmm,
            Request::InstallHmms => Category::InstallHmms,
            Request::FindIndexes { .. } => Category::FindIndexes,
            Request::GetIndex { .. } => Category::GetIndex,
            Request::CreateIndex { .. } => Category::CreateIndex,
            Request::GetUnbuiltChanges { .. } => Category::GetUnbuiltChanges,
            Request::FindJobs { .. } => Category::FindJobs,
            Request::GetJob { .. } => Category::GetJob,
            Request::CancelJob { .. } => Category::CancelJob,
            Request::ArchiveJob { .. } => Category::ArchiveJob,
            Request::ListLabels => Category::ListLabels,
            Request::CreateLabel { .. } => Category::CreateLabel,
            Request::UpdateLabel { .. } => Category::UpdateLabel,
            Request::RemoveLabel { .. } => Category::RemoveLabel,
            Request::ListOtus { .. } => Category::ListOtus,
            Request::GetOtu { .. } => Category::GetOtu,
            Request::GetOtuHistory { .. } => Category::GetOtuHistory,
            Request::GetGenbank { .. } => Category::GetGenbank,
            Request::CreateOtu { .. } => Category::CreateOtu,
            Request::EditOtu { .. } => Category::EditOtu,
            Request::RemoveOtu { .. } => Category::RemoveOtu,
            Request::AddIsolate { .. } => Category::AddIsolate,
            Request::EditIsolate { .. } => Category::EditIsolate,
            Request::SetIsolateAsDefault { .. } => Category::SetIsolateAsDefault,
            Request::RemoveIsolate { .. } => Category::RemoveIsolate,
            Request::AddSequence { .. } => Category::AddSequence,
            Request::EditSequence { .. } => Category::EditSequence,
            Request::RemoveSequence { .. } => Category::RemoveSequence,
            Request::Revert { .. } => Category::Revert,
            Request::FindReferences { .. } => Category::FindReferences,
            Request::GetReference { .. } => Category::GetReference,
            Request::CreateReference { .. } => Category::CreateReference,
            Request::EditReference { .. } => Category::EditReference,
            Request::RemoveReference { .. } => Category::RemoveReference,
            Request::FindSamples { .. } => Category::FindSamples,
            Request::GetSample { .. } => Category::GetSample,
            Request::CreateSample { .. } => Category::CreateSample,
            Request::UpdateSample { .. } => Category::UpdateSample,
            Request::UpdateSampleRights { .. } => Category::UpdateSampleRights,
            Request::RemoveSample { .. } => Category::RemoveSample,
            Request::GetSettings => Category::GetSettings,
            Request::UpdateSettings { .. } => Category::UpdateSettings,
            Request::FindSubtractions { .. } => Category::FindSubtractions,
            Request::GetSubtraction { .. } => Category::GetSubtraction,
            Request::CreateSubtraction { .. } => Category::CreateSubtraction,
            Request::EditSubtraction { .. } => Category::EditSubtraction,
            Request::RemoveSubtraction { .. } => Category::RemoveSubtraction,
            Request::ListTasks => Category::ListTasks,
            Request::GetTask { .. } => Category::GetTask,
            Request::FindUsers { .. } => Category::FindUsers,
            Request::GetUser { .. } => Category::GetUser,
            Request::CreateUser { .. } => Category::CreateUser,
            Request::EditUser { .. } => Category::EditUser,
        }
    }

    pub fn domain(&self) -> Domain {
        self.category().domain()
    }

    /// Identifier of the resource the request acts on, if it names one.
    /// Remove successes use it to evict the record.
    pub fn target_id(&self) -> Option<&str> {
        let id = match self {
            Request::UpdateApiKey { key_id, .. } | Request::RemoveApiKey { key_id } => {
                key_id.as_str()
            }
            Request::GetAnalysis { analysis_id }
            | Request::RemoveAnalysis { analysis_id }
            | Request::BlastNuvs { analysis_id, .. } => analysis_id.as_str(),
            Request::GetCache { cache_id, .. } => cache_id.as_str(),
            Request::RemoveFile { file_id } => file_id.as_str(),
            Request::GetGroup { group_id }
            | Request::SetGroupPermission { group_id, .. }
            | Request::RemoveGroup { group_id } => group_id.as_str(),
            Request::GetHmm { hmm_id } => hmm_id.as_str(),
            Request::GetIndex { index_id } => index_id.as_str(),
            Request::GetJob { job_id }
            | Request::CancelJob { job_id }
            | Request::ArchiveJob { job_id } => job_id.as_str(),
            Request::UpdateLabel { label_id, .. } | Request::RemoveLabel { label_id } => {
                label_id.as_str()
            }
            Request::GetOtu { otu_id }
            | Request::GetOtuHistory { otu_id }
            | Request::EditOtu { otu_id, .. }
            | Request::RemoveOtu { otu_id, .. }
            | Request::AddIsolate { otu_id, .. }
            | Request::EditIsolate { otu_id, .. }
            | Request::SetIsolateAsDefault { otu_id, .. }
            | Request::RemoveIsolate { otu_id, .. }
            | Request::AddSequence { otu_id, .. }
            | Request::EditSequence { otu_id, .. }
            | Request::RemoveSequence { otu_id, .. }
            | Request::Revert { otu_id, .. } => otu_id.as_str(),
            Request::GetReference { ref_id }
            | Request::EditReference { ref_id, .. }
            | Request::RemoveReference { ref_id }
            | Request::GetUnbuiltChanges { ref_id } => ref_id.as_str(),
            Request::GetSample { sample_id }
            | Request::UpdateSample { sample_id, .. }
            | Request::UpdateSampleRights { sample_id, .. }
            | Request::RemoveSample { sample_id } => sample_id.as_str(),
            Request::GetSubtraction { subtraction_id }
            | Request::EditSubtraction { subtraction_id, .. }
            | Request::RemoveSubtraction { subtraction_id } => subtraction_id.as_str(),
            Request::GetTask { task_id } => task_id.as_str(),
            Request::GetUser { user_id } | Request::EditUser { user_id, .. } => user_id.as_str(),
            _ => return None,
        };
        Some(id)
    }

    /// The JSON shape a successful response must have.
    pub fn response_kind(&self) -> ResponseKind {
        let category = self.category();
        match category {
            Category::GetApiKeys
            | Category::ListGroups
            | Category::ListLabels
            | Category::ListTasks
            | Category::GetOtuHistory => ResponseKind::Records,
            Category::GetUnbuiltChanges => ResponseKind::Page,
            Category::Logout
            | Category::RemoveIsolate
            | Category::RemoveSequence
            | Category::Revert => ResponseKind::Empty,
            _ => match category.verb() {
                Verb::List => ResponseKind::Page,
                Verb::Remove => ResponseKind::Empty,
                Verb::Get | Verb::Create | Verb::Edit | Verb::Other => ResponseKind::Record,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Record,
    Records,
    Page,
    Empty,
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Record(Record),
    Records(Vec<Record>),
    Page(Page),
    Empty,
}

impl Payload {
    pub fn decode(kind: ResponseKind, body: Value) -> Result<Self, DecodeError> {
        match kind {
            ResponseKind::Empty => Ok(Payload::Empty),
            ResponseKind::Record => match body {
                Value::Object(fields) => Ok(Payload::Record(Record::new(fields))),
                other => Err(DecodeError::NotAnObject(json_kind(&other))),
            },
            ResponseKind::Records => match body {
                Value::Array(items) => items
                    .into_iter()
                    .map(Record::from_value)
                    .collect::<Option<Vec<_>>>()
                    .map(Payload::Records)
                    .ok_or(DecodeError::NotAnArray),
                _ => Err(DecodeError::NotAnArray),
            },
            ResponseKind::Page => Ok(Payload::Page(serde_json::from_value(body)?)),
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Payload::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Pages as-is; plain record arrays as a single page.
    pub fn page(&self) -> Option<Page> {
        match self {
            Payload::Page(page) => Some(page.clone()),
            Payload::Records(records) => Some(Page::single(records.clone())),
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sequence number the store stamps on every dispatched action. Completions
/// carry the ticket of the request that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Ticket(pub u64);

impl Ticket {
    /// For completions built outside the orchestrator (tests, replays).
    pub const UNTRACKED: Ticket = Ticket(0);
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Succeeded {
    pub ticket: Ticket,
    pub request: Request,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failed {
    pub ticket: Ticket,
    pub request: Request,
    pub failure: Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Requested(Request),
    Succeeded(Succeeded),
    Failed(Failed),
    ClearError(Category),
    SetInitialState { dev: bool, first: bool },
    /// Push a new history entry (routing middleware forwards it to the
    /// history collaborator).
    Navigate(Location),
    /// The history collaborator moved (back/forward, external navigation).
    LocationChanged(Location),
}

impl Action {
    pub fn succeeded(request: Request, payload: Payload) -> Self {
        Action::Succeeded(Succeeded {
            ticket: Ticket::UNTRACKED,
            request,
            payload,
        })
    }

    pub fn failed(request: Request, failure: Failure) -> Self {
        Action::Failed(Failed {
            ticket: Ticket::UNTRACKED,
            request,
            failure,
        })
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Action::Requested(request) => Some(request.category()),
            Action::Succeeded(succeeded) => Some(succeeded.request.category()),
            Action::Failed(failed) => Some(failed.request.category()),
            Action::ClearError(category) => Some(*category),
            _ => None,
        }
    }

    /// Ticket of the originating request for completions.
    pub fn completion_ticket(&self) -> Option<Ticket> {
        match self {
            Action::Succeeded(succeeded) => Some(succeeded.ticket),
            Action::Failed(failed) => Some(failed.ticket),
            _ => None,
        }
    }

    /// Stable action-type string, e.g. `CREATE_SAMPLE_REQUESTED`.
    pub fn type_name(&self) -> String {
        match self {
            Action::Requested(request) => format!("{}_REQUESTED", request.category().name()),
            Action::Succeeded(succeeded) => {
                format!("{}_SUCCEEDED", succeeded.request.category().name())
            }
            Action::Failed(failed) => format!("{}_FAILED", failed.request.category().name()),
            Action::ClearError(_) => "CLEAR_ERROR".to_string(),
            Action::SetInitialState { .. } => "SET_INITIAL_STATE".to_string(),
            Action::Navigate(_) => "NAVIGATE".to_string(),
            Action::LocationChanged(_) => "LOCATION_CHANGE".to_string(),
        }
    }
}

/// An applied action as published on the store's action bus.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub ticket: Ticket,
    pub action: Arc<Action>,
}
