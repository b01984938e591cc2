use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Client finished start-up; triggers the first status refresh.
    Started,
    /// User asked for a manual status refresh.
    RefreshRequested,
    /// Health probe finished. `Ok` carries the backend index size.
    HealthChecked(Result<u64, String>),
    /// File listing finished.
    FilesListed(Result<Vec<String>, String>),
    /// Files are being dragged over the drop target.
    DragEntered,
    /// The drag left the drop target without dropping.
    DragLeft,
    /// Files were dropped on the drop target.
    FilesDropped(Vec<PathBuf>),
    /// Files were picked through the browse path.
    FilesChosen(Vec<PathBuf>),
    /// Upload request finished.
    UploadFinished {
        submitted: usize,
        result: Result<Vec<crate::UploadResult>, String>,
    },
    /// User edited the chat input.
    InputChanged(String),
    /// User clicked Send.
    SendClicked,
    /// User pressed Enter in the chat input.
    EnterPressed { shift: bool },
    /// Chat request finished. `Err` means the request never completed.
    ChatAnswered {
        loading_id: crate::EntryId,
        result: Result<crate::ChatReply, String>,
    },
}
