use std::fmt;

use serde::Deserialize;

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub faiss_index_size: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ollama: Option<String>,
    #[serde(default)]
    pub google_genai: Option<String>,
}

/// `GET /list_uploaded`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileListing {
    pub files: Vec<String>,
}

/// `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReport {
    pub results: Vec<UploadFileResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadFileResult {
    #[serde(default)]
    pub filename: Option<String>,
    pub status: String,
    #[serde(default)]
    pub chunks: Option<u64>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<Citation>>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content_preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    HealthChecked(Result<HealthReport, ApiError>),
    FilesListed(Result<FileListing, ApiError>),
    UploadCompleted {
        submitted: usize,
        result: Result<UploadReport, ApiError>,
    },
    ChatAnswered {
        loading_id: u64,
        result: Result<ChatResponse, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    Decode,
    LocalFile,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::LocalFile => write!(f, "unreadable file"),
        }
    }
}
