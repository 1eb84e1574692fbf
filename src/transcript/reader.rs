use super::document::TranscriptDocument;
use crate::error::ApiError;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Read and parse the sidecar at `path`.
pub async fn read(path: &Path) -> Result<TranscriptDocument, ApiError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| ApiError::from_io(e, "File"))?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound("File"));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ApiError::from_io(e, "File"))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let document = TranscriptDocument::from_value(value);

    debug!(
        "Loaded transcript {} ({} bytes, shape {:?})",
        path.display(),
        content.len(),
        document.shape()
    );

    Ok(document)
}
