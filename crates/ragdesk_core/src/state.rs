use crate::markup::render_markdown;
use crate::view_model::{AppViewModel, FileRow};

pub type EntryId = u64;

/// Body shown while a chat answer is pending.
pub const LOADING_PLACEHOLDER: &str = "Analyzing vehicle data...";

/// Upload result status the backend reports for a successfully ingested file.
pub const INDEXED_STATUS: &str = "indexed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryBody {
    /// Shown verbatim (escaped when exported).
    Text(String),
    /// Markdown source with its sanitized HTML rendering.
    Markdown { source: String, html: String },
}

impl EntryBody {
    pub fn markdown(source: impl Into<String>) -> Self {
        let source = source.into();
        let html = render_markdown(&source);
        Self::Markdown { source, html }
    }

    /// The text the entry was created from.
    pub fn source_text(&self) -> &str {
        match self {
            EntryBody::Text(text) => text,
            EntryBody::Markdown { source, .. } => source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCitation {
    pub filename: String,
    pub page: Option<u32>,
    /// Type label, e.g. `text` or `image_description`.
    pub kind: String,
    pub content_preview: Option<String>,
}

impl SourceCitation {
    /// `filename` with a ` (p.N)` suffix when a page is known. Page 0 counts as unknown.
    pub fn display_name(&self) -> String {
        match self.page {
            Some(page) if page > 0 => format!("{} (p.{})", self.filename, page),
            _ => self.filename.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub role: Role,
    pub body: EntryBody,
    pub sources: Vec<SourceCitation>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub answer: Option<String>,
    pub error: Option<String>,
    pub sources: Vec<SourceCitation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub filename: Option<String>,
    pub status: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// No health response seen yet.
    #[default]
    Unknown,
    Online {
        index_size: u64,
    },
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub filename: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    InProgress {
        submitted: usize,
    },
    Finished {
        indexed: usize,
        submitted: usize,
        rejected: Vec<RejectedFile>,
    },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    backend: BackendStatus,
    files: Vec<String>,
    upload: UploadStatus,
    drop_zone_highlighted: bool,
    draft: String,
    transcript: Vec<TranscriptEntry>,
    next_entry_id: EntryId,
    scroll_anchor: Option<EntryId>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            backend: BackendStatus::Unknown,
            files: Vec::new(),
            upload: UploadStatus::Idle,
            drop_zone_highlighted: false,
            draft: String::new(),
            transcript: Vec::new(),
            next_entry_id: 1,
            scroll_anchor: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let files = if self.files.is_empty() {
            vec![FileRow::Placeholder]
        } else {
            self.files.iter().cloned().map(FileRow::File).collect()
        };
        AppViewModel {
            backend: self.backend,
            files,
            upload: self.upload.clone(),
            drop_zone_highlighted: self.drop_zone_highlighted,
            draft: self.draft.clone(),
            transcript: self.transcript.clone(),
            scroll_anchor: self.scroll_anchor,
            dirty: self.dirty,
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_backend(&mut self, backend: BackendStatus) {
        self.backend = backend;
        self.mark_dirty();
    }

    pub(crate) fn replace_files(&mut self, files: Vec<String>) {
        self.files = files;
        self.mark_dirty();
    }

    pub(crate) fn set_upload(&mut self, upload: UploadStatus) {
        self.upload = upload;
        self.mark_dirty();
    }

    pub(crate) fn set_drop_zone_highlighted(&mut self, highlighted: bool) {
        if self.drop_zone_highlighted != highlighted {
            self.drop_zone_highlighted = highlighted;
            self.mark_dirty();
        }
    }

    pub(crate) fn draft(&self) -> &str {
        &self.draft
    }

    pub(crate) fn set_draft(&mut self, draft: String) {
        if self.draft != draft {
            self.draft = draft;
            self.mark_dirty();
        }
    }

    pub(crate) fn push_draft_newline(&mut self) {
        self.draft.push('\n');
        self.mark_dirty();
    }

    /// Appends an entry and moves the scroll anchor to it.
    pub(crate) fn push_entry(
        &mut self,
        role: Role,
        body: EntryBody,
        sources: Vec<SourceCitation>,
        loading: bool,
    ) -> EntryId {
        let id = self.next_entry_id;
        self.next_entry_id += 1;
        self.transcript.push(TranscriptEntry {
            id,
            role,
            body,
            sources,
            loading,
        });
        self.scroll_anchor = Some(id);
        self.mark_dirty();
        id
    }

    /// Removes the entry with `id`. Returns false when it was already gone.
    pub(crate) fn remove_entry(&mut self, id: EntryId) -> bool {
        let before = self.transcript.len();
        self.transcript.retain(|entry| entry.id != id);
        let removed = self.transcript.len() != before;
        if removed {
            if self.scroll_anchor == Some(id) {
                self.scroll_anchor = self.transcript.last().map(|entry| entry.id);
            }
            self.mark_dirty();
        }
        removed
    }
}
