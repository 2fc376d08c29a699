//! Model selection: the one piece of durable state.
//!
//! Loaded once at startup, written whenever the user switches models, and
//! read by the lesson pipeline on every request.

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Models the generation client may be pointed at.
pub const MODELS: &[ModelOption] = &[
    ModelOption {
        id: "gemini-3-flash-preview",
        name: "Gemini 3 Flash Preview",
        description: "Tốc độ cao, mặc định",
    },
    ModelOption {
        id: "gemini-3-pro-preview",
        name: "Gemini 3 Pro Preview",
        description: "Cân bằng tốt",
    },
    ModelOption {
        id: "gemini-2.5-flash-latest",
        name: "Gemini 2.5 Flash",
        description: "Ổn định, nhanh",
    },
];

pub fn is_supported_model(id: &str) -> bool {
    MODELS.iter().any(|m| m.id == id)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSelection {
    model: String,
    updated_at: DateTime<Utc>,
}

/// File-backed holder of the selected model id.
#[derive(Clone)]
pub struct ModelStore {
    path: PathBuf,
    current: Arc<RwLock<String>>,
}

impl ModelStore {
    /// Reads the stored selection. A missing, unreadable or unknown value falls
    /// back to `DEFAULT_MODEL`; startup never fails on this file.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let model = match read_selection(&path).await {
            Ok(Some(stored)) if is_supported_model(&stored.model) => stored.model,
            Ok(Some(stored)) => {
                warn!(
                    "Stored model '{}' is no longer supported, using {DEFAULT_MODEL}",
                    stored.model
                );
                DEFAULT_MODEL.to_string()
            }
            Ok(None) => DEFAULT_MODEL.to_string(),
            Err(e) => {
                warn!("Could not read model selection from {}: {e:#}", path.display());
                DEFAULT_MODEL.to_string()
            }
        };

        info!("Model selection loaded: {model}");

        Self {
            path,
            current: Arc::new(RwLock::new(model)),
        }
    }

    pub async fn current(&self) -> String {
        self.current.read().await.clone()
    }

    /// Persists the new selection, then updates memory. On a write failure the
    /// in-memory value is left as it was.
    pub async fn set(&self, model: &str) -> Result<(), AppError> {
        let model = model.trim();
        if !is_supported_model(model) {
            return Err(AppError::Validation(format!("Unsupported model: '{model}'")));
        }

        let mut current = self.current.write().await;
        write_selection(
            &self.path,
            &StoredSelection {
                model: model.to_string(),
                updated_at: Utc::now(),
            },
        )
        .await?;
        *current = model.to_string();

        info!("Model selection changed to {model}");
        Ok(())
    }
}

async fn read_selection(path: &Path) -> anyhow::Result<Option<StoredSelection>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("failed to read model selection file"),
    };
    let stored = serde_json::from_slice(&raw).context("model selection file is not valid JSON")?;
    Ok(Some(stored))
}

/// Writes through a temp file and rename so a crash never leaves half a file.
async fn write_selection(path: &Path, selection: &StoredSelection) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(selection)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to move model selection into {}", path.display()))?;
    Ok(())
}
