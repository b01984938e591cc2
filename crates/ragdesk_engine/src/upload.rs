use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use reqwest::multipart::{Form, Part};

use crate::{ApiError, FailureKind};

/// Multipart field name shared by every uploaded file.
pub const UPLOAD_FIELD: &str = "files";

/// Reads every file and packages them into one form, in selection order.
pub async fn build_upload_form(files: &[PathBuf]) -> Result<Form, ApiError> {
    let parts = try_join_all(files.iter().map(|path| file_part(path))).await?;
    Ok(parts
        .into_iter()
        .fold(Form::new(), |form, part| form.part(UPLOAD_FIELD, part)))
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        ApiError::new(FailureKind::LocalFile, format!("{}: {err}", path.display()))
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|err| ApiError::new(FailureKind::LocalFile, err.to_string()))
}
