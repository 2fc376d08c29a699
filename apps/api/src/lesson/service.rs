//! Lesson pipeline: the submit flow behind both forms.
//!
//! Flow: merge uploaded file into the input → validate → compose prompt →
//!       take the in-flight slot → one generation call → response.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::ProcessedFile;
use crate::lesson::composer::{compose_create_prompt, compose_enhance_prompt, fill_template};
use crate::lesson::models::LessonPlanInput;
use crate::lesson::prompts::PDF_CONTENT_PLACEHOLDER;
use crate::llm_client::{Attachment, TextGenerator};

const BUSY_MESSAGE: &str = "Đang có một yêu cầu soạn giáo án khác đang xử lý.";
const ENHANCE_EMPTY_MESSAGE: &str = "Vui lòng dán nội dung giáo án hoặc tải file lên.";

/// Single in-flight generation per instance. A second submit is rejected,
/// never queued, and the running call is never cancelled.
#[derive(Clone, Default)]
pub struct GenerationSlot {
    lock: Arc<Mutex<()>>,
}

impl GenerationSlot {
    pub fn try_acquire(&self) -> Result<OwnedMutexGuard<()>, AppError> {
        self.lock
            .clone()
            .try_lock_owned()
            .map_err(|_| AppError::Conflict(BUSY_MESSAGE.to_string()))
    }
}

/// A composed prompt plus the optional binary part, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub prompt: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanResponse {
    pub id: Uuid,
    pub model: String,
    /// Markdown document, trimmed.
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

/// Create mode: text files are appended to the typed content, a PDF rides along
/// as the attachment.
pub fn prepare_create(
    input: LessonPlanInput,
    file: Option<ProcessedFile>,
) -> Result<PreparedRequest, AppError> {
    let mut input = input.validated()?;

    let attachment = match file {
        Some(ProcessedFile::Text { content, .. }) => {
            input.content.push('\n');
            input.content.push_str(&content);
            None
        }
        Some(pdf @ ProcessedFile::PdfPart { .. }) => Some(checked_attachment(&pdf)?),
        None => None,
    };

    Ok(PreparedRequest {
        prompt: compose_create_prompt(&input),
        attachment,
    })
}

/// Enhance mode: a text file replaces the pasted content; a PDF replaces it with
/// a placeholder telling the model to read the attachment.
pub fn prepare_enhance(
    content: String,
    file: Option<ProcessedFile>,
) -> Result<PreparedRequest, AppError> {
    let (content, attachment) = match file {
        Some(ProcessedFile::Text { content, .. }) => (content, None),
        Some(pdf @ ProcessedFile::PdfPart { .. }) => {
            let placeholder =
                fill_template(PDF_CONTENT_PLACEHOLDER, &[("file_name", pdf.file_name())]);
            (placeholder, Some(checked_attachment(&pdf)?))
        }
        None => (content, None),
    };

    if content.trim().is_empty() && attachment.is_none() {
        return Err(AppError::Validation(ENHANCE_EMPTY_MESSAGE.to_string()));
    }

    Ok(PreparedRequest {
        prompt: compose_enhance_prompt(&content),
        attachment,
    })
}

/// Clients hand the PDF part back to us, so its base64 is checked before it goes upstream.
fn checked_attachment(pdf: &ProcessedFile) -> Result<Attachment, AppError> {
    let attachment = pdf
        .attachment()
        .ok_or_else(|| AppError::Validation("Expected a PDF part".to_string()))?;

    if attachment.data.is_empty() || STANDARD.decode(&attachment.data).is_err() {
        return Err(AppError::Validation(format!(
            "Tệp PDF đính kèm không hợp lệ: {}",
            pdf.file_name()
        )));
    }

    Ok(attachment)
}

/// Runs exactly one generation while holding the slot. The slot is released on
/// success and on failure alike.
pub async fn run_generation(
    generator: &dyn TextGenerator,
    slot: &GenerationSlot,
    model_id: String,
    prepared: PreparedRequest,
) -> Result<LessonPlanResponse, AppError> {
    let _guard = slot.try_acquire()?;
    let id = Uuid::new_v4();

    info!(
        %id,
        model = %model_id,
        has_attachment = prepared.attachment.is_some(),
        "Starting lesson plan generation"
    );

    let content = generator
        .generate(&prepared.prompt, prepared.attachment.as_ref(), &model_id)
        .await?;

    info!(%id, chars = content.chars().count(), "Lesson plan generated");

    Ok(LessonPlanResponse {
        id,
        model: model_id,
        content,
        generated_at: Utc::now(),
    })
}
