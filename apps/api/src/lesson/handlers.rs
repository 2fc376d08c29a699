//! Axum route handlers for the Lesson Plan API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ingest::ProcessedFile;
use crate::lesson::models::{CompetencyDomain, LessonPlanInput, Subject, GRADES, NLS_FRAMEWORK};
use crate::lesson::service::{prepare_create, prepare_enhance, run_generation, LessonPlanResponse};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub input: LessonPlanInput,
    /// Output of `/api/v1/files/process`, if a reference file was attached.
    #[serde(default)]
    pub file: Option<ProcessedFile>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceLessonRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file: Option<ProcessedFile>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub subjects: Vec<&'static str>,
    pub grades: &'static [&'static str],
    pub defaults: LessonPlanInput,
    pub competencies: &'static [CompetencyDomain],
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
///
/// Everything the form needs to render its pickers.
pub async fn handle_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        subjects: Subject::ALL.iter().map(Subject::label).collect(),
        grades: GRADES,
        defaults: LessonPlanInput::default(),
        competencies: NLS_FRAMEWORK,
    })
}

/// POST /api/v1/lesson-plans
///
/// Builds a full lesson plan from the structured form.
pub async fn handle_create(
    State(state): State<AppState>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<Json<LessonPlanResponse>, AppError> {
    let prepared = prepare_create(request.input, request.file)?;
    let model = state.models.current().await;
    let response = run_generation(state.generator.as_ref(), &state.slot, model, prepared).await?;
    Ok(Json(response))
}

/// POST /api/v1/lesson-plans/enhance
///
/// Rewrites a legacy lesson plan into the 5512 layout with competency codes.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(request): Json<EnhanceLessonRequest>,
) -> Result<Json<LessonPlanResponse>, AppError> {
    let prepared = prepare_enhance(request.content, request.file)?;
    let model = state.models.current().await;
    let response = run_generation(state.generator.as_ref(), &state.slot, model, prepared).await?;
    Ok(Json(response))
}
