use std::path::PathBuf;

/// IO requested by [`crate::update`]; executed by the app's effect runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth,
    ListFiles,
    /// One batched multipart request carrying every file.
    UploadFiles { files: Vec<PathBuf> },
    /// `loading_id` identifies the placeholder entry to remove once answered.
    AskQuestion {
        loading_id: crate::EntryId,
        question: String,
    },
}
