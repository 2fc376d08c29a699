use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::{process_file, ProcessedFile};
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

/// POST /api/v1/files/process
///
/// Accepts one uploaded document and returns it as extracted text or as a
/// base64 PDF part, ready to be sent back with a create/enhance request.
pub async fn handle_process_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        let size = data.len();
        if size > state.config.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "File {file_name} quá lớn ({size} bytes). Giới hạn là {} bytes.",
                state.config.max_upload_bytes
            )));
        }

        let name = file_name.clone();
        // Zip inflation for DOCX is CPU-bound; keep it off the async workers.
        let processed = tokio::task::spawn_blocking(move || {
            process_file(&name, content_type.as_deref(), &data)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("File processing task failed: {e}")))??;

        info!(file_name = %file_name, size, kind = processed_kind(&processed), "File processed");
        return Ok(Json(processed));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

fn processed_kind(processed: &ProcessedFile) -> &'static str {
    match processed {
        ProcessedFile::Text { .. } => "text",
        ProcessedFile::PdfPart { .. } => "pdf_part",
    }
}
