// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::workspace::WorkspaceContext,
    models::{
        stats::{GlobalStats, SupplierStats},
        view::{InvoiceSummary, ViewQuery},
    },
    services::stats_service,
};

// Totais da visão filtrada (barra lateral)
pub async fn summary(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Query(query): Query<ViewQuery>,
) -> Result<Json<InvoiceSummary>, AppError> {
    let view = app_state.invoice_service.view(workspace.id(), &query).await?;
    Ok(Json(view.summary))
}

// Estatísticas de toda a área de trabalho, ignorando os filtros
pub async fn global(
    State(app_state): State<AppState>,
    WorkspaceContext(workspace): WorkspaceContext,
) -> Result<Json<GlobalStats>, AppError> {
    let invoices = app_state.invoice_service.list(workspace.id).await?;
    Ok(Json(stats_service::global_stats(&workspace.name, &invoices)))
}

pub async fn supplier(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Path(name): Path<String>,
) -> Result<Json<SupplierStats>, AppError> {
    let invoices = app_state.invoice_service.list(workspace.id()).await?;
    Ok(Json(stats_service::supplier_stats(&name, &invoices)))
}
