//! Read-only template catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{process_template, RenderedEmail, Template, TemplateSummary};

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateSummary>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// GET /api/v1/templates - List the catalog
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.templates.summaries();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    state
        .templates
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template '{}' not found", id)))
}

/// POST /api/v1/templates/{id}/preview - Render with the given variables
#[tracing::instrument(name = "http.preview_template", skip(state, request))]
pub async fn preview_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<RenderedEmail>> {
    let template = state
        .templates
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Template '{}' not found", id)))?;

    Ok(Json(process_template(template, &request.variables)))
}
