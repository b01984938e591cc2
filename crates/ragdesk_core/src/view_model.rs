use crate::{BackendStatus, EntryId, TranscriptEntry, UploadStatus};

/// Text of the single row shown when the backend reports no files.
pub const NO_FILES_PLACEHOLDER: &str = "No files loaded.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRow {
    File(String),
    Placeholder,
}

impl FileRow {
    pub fn label(&self) -> &str {
        match self {
            FileRow::File(name) => name,
            FileRow::Placeholder => NO_FILES_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub backend: BackendStatus,
    pub files: Vec<FileRow>,
    pub upload: UploadStatus,
    pub drop_zone_highlighted: bool,
    pub draft: String,
    pub transcript: Vec<TranscriptEntry>,
    /// Most recently appended entry still present; renderers keep it in view.
    pub scroll_anchor: Option<EntryId>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn status_line(&self) -> String {
        match self.backend {
            BackendStatus::Unknown => "Backend: Checking...".to_string(),
            BackendStatus::Online { index_size } => {
                format!("Backend: Online (Docs: {index_size})")
            }
            BackendStatus::Offline => "Backend: Offline".to_string(),
        }
    }

    pub fn upload_line(&self) -> Option<String> {
        match &self.upload {
            UploadStatus::Idle => None,
            UploadStatus::InProgress { .. } => Some("Uploading & Indexing...".to_string()),
            UploadStatus::Finished {
                indexed, submitted, ..
            } => Some(format!("Success: {indexed}/{submitted}")),
            UploadStatus::Failed => Some("Upload Failed".to_string()),
        }
    }

    pub fn loading_count(&self) -> usize {
        self.transcript.iter().filter(|entry| entry.loading).count()
    }
}
