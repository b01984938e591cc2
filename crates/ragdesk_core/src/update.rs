use std::path::PathBuf;

use crate::{
    AppState, BackendStatus, ChatReply, Effect, EntryBody, Msg, RejectedFile, Role, UploadResult,
    UploadStatus, INDEXED_STATUS, LOADING_PLACEHOLDER,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started | Msg::RefreshRequested => refresh_status(),
        Msg::HealthChecked(result) => {
            let backend = match result {
                Ok(index_size) => BackendStatus::Online { index_size },
                Err(_) => BackendStatus::Offline,
            };
            state.set_backend(backend);
            Vec::new()
        }
        Msg::FilesListed(result) => {
            // A failed listing shows the empty placeholder rather than a stale list.
            state.replace_files(result.unwrap_or_default());
            Vec::new()
        }
        Msg::DragEntered => {
            state.set_drop_zone_highlighted(true);
            Vec::new()
        }
        Msg::DragLeft => {
            state.set_drop_zone_highlighted(false);
            Vec::new()
        }
        Msg::FilesDropped(files) => {
            state.set_drop_zone_highlighted(false);
            submit_files(&mut state, files)
        }
        Msg::FilesChosen(files) => submit_files(&mut state, files),
        Msg::UploadFinished { submitted, result } => match result {
            Ok(results) => {
                state.set_upload(summarize_upload(submitted, results));
                refresh_status()
            }
            Err(_) => {
                state.set_upload(UploadStatus::Failed);
                Vec::new()
            }
        },
        Msg::InputChanged(text) => {
            state.set_draft(text);
            Vec::new()
        }
        Msg::SendClicked | Msg::EnterPressed { shift: false } => send_message(&mut state),
        Msg::EnterPressed { shift: true } => {
            state.push_draft_newline();
            Vec::new()
        }
        Msg::ChatAnswered { loading_id, result } => {
            state.remove_entry(loading_id);
            match result {
                Ok(reply) => push_reply(&mut state, reply),
                Err(message) => {
                    state.push_entry(
                        Role::Bot,
                        EntryBody::Text(format!("Connection Error: {message}")),
                        Vec::new(),
                        false,
                    );
                }
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn refresh_status() -> Vec<Effect> {
    vec![Effect::CheckHealth, Effect::ListFiles]
}

fn submit_files(state: &mut AppState, files: Vec<PathBuf>) -> Vec<Effect> {
    if files.is_empty() {
        return Vec::new();
    }
    state.set_upload(UploadStatus::InProgress {
        submitted: files.len(),
    });
    vec![Effect::UploadFiles { files }]
}

fn summarize_upload(submitted: usize, results: Vec<UploadResult>) -> UploadStatus {
    let indexed = results
        .iter()
        .filter(|result| result.status == INDEXED_STATUS)
        .count();
    let rejected = results
        .into_iter()
        .filter(|result| result.status != INDEXED_STATUS)
        .map(|result| RejectedFile {
            filename: result.filename.unwrap_or_else(|| "<unnamed>".to_string()),
            detail: result.detail.or(Some(result.status)),
        })
        .collect();
    UploadStatus::Finished {
        indexed,
        submitted,
        rejected,
    }
}

fn send_message(state: &mut AppState) -> Vec<Effect> {
    let question = state.draft().trim().to_string();
    if question.is_empty() {
        return Vec::new();
    }

    state.push_entry(
        Role::User,
        EntryBody::Text(question.clone()),
        Vec::new(),
        false,
    );
    state.set_draft(String::new());

    let loading_id = state.push_entry(
        Role::Bot,
        EntryBody::Text(LOADING_PLACEHOLDER.to_string()),
        Vec::new(),
        true,
    );

    vec![Effect::AskQuestion {
        loading_id,
        question,
    }]
}

fn push_reply(state: &mut AppState, reply: ChatReply) {
    let ChatReply {
        answer,
        error,
        sources,
    } = reply;

    match (error.filter(|error| !error.is_empty()), answer) {
        (Some(error), _) => {
            state.push_entry(
                Role::Bot,
                EntryBody::Text(format!("Error: {error}")),
                Vec::new(),
                false,
            );
        }
        (None, Some(answer)) => {
            state.push_entry(Role::Bot, EntryBody::markdown(answer), sources, false);
        }
        (None, None) => {
            state.push_entry(
                Role::Bot,
                EntryBody::Text("Error: empty answer".to_string()),
                Vec::new(),
                false,
            );
        }
    }
}
