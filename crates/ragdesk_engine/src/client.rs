use std::path::PathBuf;
use std::time::Duration;

use desk_logging::{desk_debug, desk_warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::upload::build_upload_form;
use crate::{ApiError, ChatResponse, FailureKind, FileListing, HealthReport, UploadReport};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    /// `None` lets a request wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

/// The question-answering backend. Every call is independent and stateless.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<HealthReport, ApiError>;

    async fn list_uploaded(&self) -> Result<FileListing, ApiError>;

    /// Sends every file in one multipart request.
    async fn upload(&self, files: &[PathBuf]) -> Result<UploadReport, ApiError>;

    async fn chat(&self, question: &str) -> Result<ChatResponse, ApiError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

/// Error bodies of failed chat requests; FastAPI reports `detail`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base = parse_base_url(&settings.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        desk_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        decode_body(response).await
    }
}

/// Parses the configured base address so that endpoint paths resolve below it.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw}: expected an http or https address"),
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json("health").await
    }

    async fn list_uploaded(&self) -> Result<FileListing, ApiError> {
        self.get_json("list_uploaded").await
    }

    async fn upload(&self, files: &[PathBuf]) -> Result<UploadReport, ApiError> {
        let url = self.endpoint("upload")?;
        let form = build_upload_form(files).await?;
        desk_debug!("POST {} with {} file(s)", url, files.len());

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        decode_body(response).await
    }

    async fn chat(&self, question: &str) -> Result<ChatResponse, ApiError> {
        let url = self.endpoint("chat")?;
        desk_debug!("POST {} question_len={}", url, question.len());

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { question })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return decode_body(response).await;
        }

        // A failed request that still explains itself is surfaced as a backend error payload.
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(ErrorBody {
                error: Some(error), ..
            }) => Ok(error_reply(error)),
            Ok(ErrorBody {
                detail: Some(detail),
                ..
            }) => {
                let text = match detail {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                Ok(error_reply(text))
            }
            _ => {
                desk_warn!("chat failed with {} and no error body", status);
                Err(status_error(status))
            }
        }
    }
}

fn error_reply(error: String) -> ChatResponse {
    ChatResponse {
        error: Some(error),
        ..ChatResponse::default()
    }
}

async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn status_error(status: StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
