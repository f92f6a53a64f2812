//! Multipart image uploads

use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};
use moodmap::blob::Upload;

use crate::error::{ServerError, ServerResult, bad_request};

/// Read the first file field of a multipart form.
///
/// Size and content type are checked by the blob store when the upload is
/// written.
pub async fn read_image(multipart: &mut Multipart) -> ServerResult<Upload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(file_name, content_type, size = bytes.len(), "Received upload");
        return Ok(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(bad_request("No file uploaded. Send the image as a multipart file field"))
}

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(err.body_text())
    } else {
        bad_request(&err.body_text())
    }
}
