//! RagDesk core: pure state machine, view model and markup helpers.
mod effect;
mod export;
mod markup;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use export::{render_entry_html, render_transcript_document};
pub use markup::{escape_html, is_safe_url, render_markdown};
pub use msg::Msg;
pub use state::{
    AppState, BackendStatus, ChatReply, EntryBody, EntryId, RejectedFile, Role, SourceCitation,
    TranscriptEntry, UploadResult, UploadStatus, INDEXED_STATUS, LOADING_PLACEHOLDER,
};
pub use update::update;
pub use view_model::{AppViewModel, FileRow, NO_FILES_PLACEHOLDER};
