// src/handlers/transfer.rs

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{i18n::Locale, workspace::WorkspaceContext},
    models::{
        transfer::{ImportFormat, ImportSummary},
        view::ViewQuery,
    },
    services::csv_service,
};

fn attachment(content_type: &'static str, file_name: String, body: Vec<u8>) -> Response {
    // Configura os Headers para o navegador baixar o arquivo
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

// GET /api/export/csv: exporta a visão filtrada atual
pub async fn export_csv(
    State(app_state): State<AppState>,
    WorkspaceContext(workspace): WorkspaceContext,
    Query(query): Query<ViewQuery>,
) -> Result<Response, AppError> {
    let view = app_state.invoice_service.view(workspace.id, &query).await?;
    let bytes = csv_service::export_csv(&view.invoices)?;

    tracing::info!("📤 CSV exportado: {} faturas de '{}'", view.invoices.len(), workspace.name);
    let file_name = workspace.export_file_name("csv", Utc::now().date_naive());
    Ok(attachment("text/csv; charset=utf-8", file_name, bytes))
}

pub async fn export_pdf(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    WorkspaceContext(workspace): WorkspaceContext,
    Query(query): Query<ViewQuery>,
) -> Result<Response, AppError> {
    let view = app_state.invoice_service.view(workspace.id, &query).await?;
    let file_name = workspace.export_file_name("pdf", Utc::now().date_naive());
    let count = view.invoices.len();

    // Renderização pesada (fontes + layout) fora do runtime assíncrono
    let documents = app_state.document_service.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        documents.invoice_report(&workspace, &view.invoices, &view.summary, &lang)
    })
    .await
    .map_err(|e| anyhow::anyhow!("Falha na task de renderização do PDF: {}", e))??;

    tracing::info!("📤 PDF exportado: {} faturas", count);
    Ok(attachment("application/pdf", file_name, bytes))
}

// POST /api/import: o corpo é o próprio arquivo; o Content-Type decide o leitor
pub async fn import(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ImportSummary>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let format = ImportFormat::from_content_type(content_type).ok_or_else(|| {
        AppError::UnsupportedFileType(if content_type.is_empty() {
            "sem Content-Type".to_string()
        } else {
            content_type.to_string()
        })
    })?;

    let summary = app_state
        .import_service
        .import(workspace.id(), format, &body)
        .await?;

    Ok(Json(summary))
}
