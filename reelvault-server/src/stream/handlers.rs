use std::io::SeekFrom;
use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use super::range::{RangeError, parse_range};
use crate::infra::{AppError, AppResult, AppState};

fn content_type_for(path: &str) -> &'static str {
    match FsPath::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

/// Serve a catalog entry's backing file, honoring single byte ranges.
pub async fn stream_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let record = state
        .movies
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("movie {id}")))?;

    let mut file = tokio::fs::File::open(&record.file_path)
        .await
        .map_err(|_| AppError::not_found("Media file is missing"))?;

    let file_size = file
        .metadata()
        .await
        .map_err(|e| AppError::internal(format!("failed to stat media file: {e}")))?
        .len();

    let content_type = content_type_for(&record.file_path);

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let Some(range_header) = range_header else {
        // No range requested, stream the whole file
        let stream = ReaderStream::new(file);
        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_LENGTH, file_size.to_string()),
                (header::ACCEPT_RANGES, "bytes".to_string()),
            ],
            Body::from_stream(stream),
        )
            .into_response());
    };

    let range = match parse_range(range_header, file_size) {
        Ok(range) => range,
        Err(RangeError::Malformed | RangeError::Unsatisfiable) => {
            debug!(header = range_header, "unusable range header");
            return Ok((
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{file_size}"))],
            )
                .into_response());
        }
    };

    file.seek(SeekFrom::Start(range.start))
        .await
        .map_err(|e| AppError::internal(format!("failed to seek media file: {e}")))?;

    let stream = ReaderStream::new(file.take(range.length()));

    Ok((
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, range.length().to_string()),
            (
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{file_size}", range.start, range.end),
            ),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
