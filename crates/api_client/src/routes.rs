//! Maps every request payload onto its REST wrapper.

use shared::protocol::Request;

use crate::{
    account, analyses, caches, files, groups, hmms, indexes, jobs, labels, otus, references,
    samples, settings, subtraction, tasks, users, ApiRequest,
};

pub fn build(request: &Request) -> ApiRequest {
    match request {
        Request::Login {
            username,
            password,
            remember,
        } => account::login(username, password, *remember),
        Request::Logout => account::logout(),
        Request::ResetPassword {
            password,
            reset_code,
        } => account::reset_password(password, reset_code),
        Request::CreateFirstUser { handle, password } => users::create_first(handle, password),

        Request::GetAccount => account::get(),
        Request::UpdateAccount { email } => account::update(email),
        Request::UpdateAccountSettings { update } => account::update_settings(update),
        Request::ChangeAccountPassword {
            old_password,
            password,
        } => account::change_password(old_password, password),
        Request::GetApiKeys => account::get_api_keys(),
        Request::CreateApiKey { name, permissions } => account::create_api_key(name, permissions),
        Request::UpdateApiKey {
            key_id,
            permissions,
        } => account::update_api_key(key_id, permissions),
        Request::RemoveApiKey { key_id } => account::remove_api_key(key_id),

        Request::FindAnalyses {
            sample_id,
            term,
            page,
        } => analyses::find(sample_id, term, *page),
        Request::GetAnalysis { analysis_id } => analyses::get(analysis_id),
        Request::Analyze {
            sample_id,
            ref_id,
            subtraction_ids,
            workflow,
        } => analyses::analyze(sample_id, ref_id, subtraction_ids, workflow),
        Request::RemoveAnalysis { analysis_id } => analyses::remove(analysis_id),
        Request::BlastNuvs {
            analysis_id,
            sequence_index,
        } => analyses::blast_nuvs(analysis_id, *sequence_index),

        Request::GetCache {
            sample_id,
            cache_id,
        } => caches::get(sample_id, cache_id),

        Request::FindFiles { file_type, page } => files::find(file_type, *page),
        Request::RemoveFile { file_id } => files::remove(file_id),

        Request::ListGroups => groups::list(),
        Request::GetGroup { group_id } => groups::get(group_id),
        Request::CreateGroup { name } => groups::create(name),
        Request::SetGroupPermission {
            group_id,
            permission,
            value,
        } => groups::set_permission(group_id, permission, *value),
        Request::RemoveGroup { group_id } => groups::remove(group_id),

        Request::FindHmms { term, page } => hmms::find(term, *page),
        Request::GetHmm { hmm_id } => hmms::get(hmm_id),
        Request::InstallHmms => hmms::install(),

        Request::FindIndexes { ref_id, page } => indexes::find(ref_id, *page),
        Request::GetIndex { index_id } => indexes::get(index_id),
        Request::CreateIndex { ref_id } => indexes::create(ref_id),
        Request::GetUnbuiltChanges { ref_id } => indexes::get_unbuilt(ref_id),

        Request::FindJobs { page, states } => jobs::find(*page, states),
        Request::GetJob { job_id } => jobs::get(job_id),
        Request::CancelJob { job_id } => jobs::cancel(job_id),
        Request::ArchiveJob { job_id } => jobs::archive(job_id),

        Request::ListLabels => labels::list(),
        Request::CreateLabel {
            name,
            color,
            description,
        } => labels::create(name, color, description),
        Request::UpdateLabel {
            label_id,
            name,
            color,
            description,
        } => labels::update(label_id, name, color, description),
        Request::RemoveLabel { label_id } => labels::remove(label_id),

        Request::ListOtus {
            ref_id,
            term,
            verified,
            page,
        } => otus::find(ref_id, term, *verified, *page),
        Request::GetOtu { otu_id } => otus::get(otu_id),
        Request::GetOtuHistory { otu_id } => otus::get_history(otu_id),
        Request::GetGenbank { accession } => otus::get_genbank(accession),
        Request::CreateOtu {
            ref_id,
            name,
            abbreviation,
        } => otus::create(ref_id, name, abbreviation),
        Request::EditOtu {
            otu_id,
            name,
            abbreviation,
            schema,
        } => otus::edit(otu_id, name, abbreviation, schema),
        Request::RemoveOtu { otu_id, .. } => otus::remove(otu_id),
        Request::AddIsolate {
            otu_id,
            source_type,
            source_name,
        } => otus::add_isolate(otu_id, source_type, source_name),
        Request::EditIsolate {
            otu_id,
            isolate_id,
            source_type,
            source_name,
        } => otus::edit_isolate(otu_id, isolate_id, source_type, source_name),
        Request::SetIsolateAsDefault { otu_id, isolate_id } => {
            otus::set_isolate_as_default(otu_id, isolate_id)
        }
        Request::RemoveIsolate { otu_id, isolate_id } => otus::remove_isolate(otu_id, isolate_id),
        Request::AddSequence {
            otu_id,
            isolate_id,
            fields,
        } => otus::add_sequence(otu_id, isolate_id, fields),
        Request::EditSequence {
            otu_id,
            isolate_id,
            sequence_id,
            fields,
        } => otus::edit_sequence(otu_id, isolate_id, sequence_id, fields),
        Request::RemoveSequence {
            otu_id,
            isolate_id,
            sequence_id,
        } => otus::remove_sequence(otu_id, isolate_id, sequence_id),
        Request::Revert { change_id, .. } => otus::revert(change_id),

        Request::FindReferences { term, page } => references::find(term, *page),
        Request::GetReference { ref_id } => references::get(ref_id),
        Request::CreateReference {
            name,
            description,
            data_type,
            organism,
        } => references::create(name, description, data_type, organism),
        Request::EditReference { ref_id, update } => references::edit(ref_id, update),
        Request::RemoveReference { ref_id } => references::remove(ref_id),

        Request::FindSamples { term, page, labels } => samples::find(term, *page, labels),
        Request::GetSample { sample_id } => samples::get(sample_id),
        Request::CreateSample { sample } => samples::create(sample),
        Request::UpdateSample { sample_id, update } => samples::update(sample_id, update),
        Request::UpdateSampleRights { sample_id, update } => {
            samples::update_rights(sample_id, update)
        }
        Request::RemoveSample { sample_id } => samples::remove(sample_id),

        Request::GetSettings => settings::get(),
        Request::UpdateSettings { update } => settings::update(update),

        Request::FindSubtractions { term, page } => subtraction::find(term, *page),
        Request::GetSubtraction { subtraction_id } => subtraction::get(subtraction_id),
        Request::CreateSubtraction {
            name,
            nickname,
            upload_id,
        } => subtraction::create(name, nickname, upload_id),
        Request::EditSubtraction {
            subtraction_id,
            name,
            nickname,
        } => subtraction::edit(subtraction_id, name, nickname),
        Request::RemoveSubtraction { subtraction_id } => subtraction::remove(subtraction_id),

        Request::ListTasks => tasks::list(),
        Request::GetTask { task_id } => tasks::get(task_id),

        Request::FindUsers { term, page } => users::find(term, *page),
        Request::GetUser { user_id } => users::get(user_id),
        Request::CreateUser {
            handle,
            password,
            force_reset,
        } => users::create(handle, password, *force_reset),
        Request::EditUser { user_id, update } => users::edit(user_id, update),
    }
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
