//! RagDesk engine: backend client, request execution and file output.
mod client;
mod engine;
mod persist;
mod types;
mod upload;

pub use client::{ApiSettings, Backend, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use persist::{ensure_parent_dir, write_atomically, PersistError};
pub use types::{
    ApiError, ChatResponse, Citation, EngineEvent, FailureKind, FileListing, HealthReport,
    UploadFileResult, UploadReport,
};
pub use upload::{build_upload_form, UPLOAD_FIELD};
