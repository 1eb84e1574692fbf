use super::range::{parse_range, ByteRange, RangeRequest};
use crate::error::ApiError;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use futures::stream::{BoxStream, StreamExt};
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// MIME type served for an audio file, by extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

/// A file body ready to send, whole or as one byte range
///
/// The body reads lazily from an open file handle; dropping it (for example
/// when the client disconnects) closes the file.
pub struct MediaStream {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub content_length: u64,
    pub file_size: u64,
    pub range: Option<ByteRange>,
    pub body: BoxStream<'static, io::Result<Bytes>>,
}

/// Open `path` and prepare a full (200) or ranged (206) response.
pub async fn stream(path: &Path, range_header: Option<&str>) -> Result<MediaStream, ApiError> {
    let mut file = File::open(path)
        .await
        .map_err(|e| ApiError::from_io(e, "File"))?;
    let metadata = file.metadata().await.map_err(ApiError::Io)?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound("File"));
    }

    let file_size = metadata.len();
    let content_type = content_type_for(path);

    match parse_range(range_header, file_size) {
        RangeRequest::Full => {
            debug!("Streaming {} ({} bytes)", path.display(), file_size);
            Ok(MediaStream {
                status: StatusCode::OK,
                content_type,
                content_length: file_size,
                file_size,
                range: None,
                body: ReaderStream::with_capacity(file, READ_CHUNK_SIZE).boxed(),
            })
        }
        RangeRequest::Partial(range) => {
            debug!(
                "Streaming {} bytes {}-{}/{}",
                path.display(),
                range.start,
                range.end,
                file_size
            );
            file.seek(SeekFrom::Start(range.start))
                .await
                .map_err(ApiError::Io)?;
            let limited = file.take(range.len());
            Ok(MediaStream {
                status: StatusCode::PARTIAL_CONTENT,
                content_type,
                content_length: range.len(),
                file_size,
                range: Some(range),
                body: ReaderStream::with_capacity(limited, READ_CHUNK_SIZE).boxed(),
            })
        }
        RangeRequest::Unsatisfiable => {
            debug!(
                "Unsatisfiable range {:?} for {} ({} bytes)",
                range_header,
                path.display(),
                file_size
            );
            Err(ApiError::RangeNotSatisfiable { size: file_size })
        }
    }
}

impl MediaStream {
    pub fn content_range(&self) -> Option<String> {
        self.range
            .map(|r| format!("bytes {}-{}/{}", r.start, r.end, self.file_size))
    }
}

impl IntoResponse for MediaStream {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.content_length));
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        if let Some(value) = self
            .content_range()
            .and_then(|range| HeaderValue::from_str(&range).ok())
        {
            headers.insert(header::CONTENT_RANGE, value);
        }

        (self.status, headers, Body::from_stream(self.body)).into_response()
    }
}
