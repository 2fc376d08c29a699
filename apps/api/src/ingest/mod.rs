//! File Ingestion: turns an uploaded reference document into something the model can read.
//!
//! Plain text and DOCX are reduced to text locally. PDF is never parsed here:
//! the raw bytes are base64-encoded and forwarded to the model as an inline
//! attachment, since local extraction is unreliable for scanned or complex layouts.

pub mod docx;
pub mod handlers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::Attachment;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv"];

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Extraction(String),
}

/// Result of ingesting one uploaded file.
///
/// Serialized with a `type` tag so a browser client can hold on to it between
/// the upload call and the form submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessedFile {
    Text {
        content: String,
        #[serde(rename = "fileName")]
        file_name: String,
    },
    /// `content` is standard base64 of the original PDF bytes.
    PdfPart {
        content: String,
        #[serde(rename = "fileName")]
        file_name: String,
    },
}

impl ProcessedFile {
    pub fn file_name(&self) -> &str {
        match self {
            ProcessedFile::Text { file_name, .. } | ProcessedFile::PdfPart { file_name, .. } => {
                file_name
            }
        }
    }

    /// The inline attachment to forward to the model, if this file is one.
    pub fn attachment(&self) -> Option<Attachment> {
        match self {
            ProcessedFile::PdfPart { content, .. } => Some(Attachment {
                mime_type: PDF_MIME_TYPE.to_string(),
                data: content.clone(),
            }),
            ProcessedFile::Text { .. } => None,
        }
    }
}

/// Supported upload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    Docx,
    Pdf,
}

/// Resolves the kind of an upload. The filename extension wins; the MIME type
/// is only consulted when the extension says nothing.
pub fn detect_kind(file_name: &str, content_type: Option<&str>) -> Result<FileKind, IngestError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    if let Some(ext) = extension.as_deref() {
        match ext {
            "docx" => return Ok(FileKind::Docx),
            "pdf" => return Ok(FileKind::Pdf),
            e if TEXT_EXTENSIONS.contains(&e) => return Ok(FileKind::PlainText),
            _ => {}
        }
    }

    let mime = content_type
        .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        PDF_MIME_TYPE => Ok(FileKind::Pdf),
        DOCX_MIME_TYPE => Ok(FileKind::Docx),
        m if m.starts_with("text/") => Ok(FileKind::PlainText),
        _ => Err(IngestError::UnsupportedFormat(format!(
            "Định dạng file không được hỗ trợ: {file_name}. Chỉ chấp nhận .txt, .docx hoặc .pdf."
        ))),
    }
}

/// Normalizes an uploaded file into extracted text or a PDF attachment descriptor.
pub fn process_file(
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ProcessedFile, IngestError> {
    let kind = detect_kind(file_name, content_type)?;

    debug!(file_name, ?kind, size = bytes.len(), "Processing uploaded file");

    let processed = match kind {
        FileKind::PlainText => ProcessedFile::Text {
            content: decode_text(bytes),
            file_name: file_name.to_string(),
        },
        FileKind::Docx => ProcessedFile::Text {
            content: docx::extract_text(bytes).map_err(|detail| {
                IngestError::Extraction(format!(
                    "Không thể đọc nội dung file {file_name}: {detail:#}"
                ))
            })?,
            file_name: file_name.to_string(),
        },
        FileKind::Pdf => ProcessedFile::PdfPart {
            content: STANDARD.encode(bytes),
            file_name: file_name.to_string(),
        },
    };

    Ok(processed)
}

/// Lenient UTF-8 decoding with a leading byte-order mark dropped, the way a
/// browser's `readAsText` reads the same file.
fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}
