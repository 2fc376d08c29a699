use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::settings::{ModelOption, MODELS};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ModelSettingsResponse {
    pub current: String,
    pub available: &'static [ModelOption],
}

#[derive(Debug, Deserialize)]
pub struct UpdateModelRequest {
    pub model: String,
}

/// GET /api/v1/settings/model
pub async fn handle_get_model(State(state): State<AppState>) -> Json<ModelSettingsResponse> {
    Json(ModelSettingsResponse {
        current: state.models.current().await,
        available: MODELS,
    })
}

/// PUT /api/v1/settings/model
pub async fn handle_set_model(
    State(state): State<AppState>,
    Json(req): Json<UpdateModelRequest>,
) -> Result<Json<ModelSettingsResponse>, AppError> {
    state.models.set(&req.model).await?;
    Ok(Json(ModelSettingsResponse {
        current: state.models.current().await,
        available: MODELS,
    }))
}
