// src/handlers/workspaces.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::workspace::Workspace};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspacePayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    pub name: String,
}

// GET /api/workspaces (cria a padrão se não houver nenhuma)
pub async fn list_workspaces(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Workspace>>, AppError> {
    let workspaces = app_state.workspace_service.list().await?;
    Ok(Json(workspaces))
}

pub async fn create_workspace(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateWorkspacePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workspace = app_state.workspace_service.create(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

pub async fn delete_workspace(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.workspace_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
