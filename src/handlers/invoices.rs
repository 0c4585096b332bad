// src/handlers/invoices.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{validate_not_blank, validate_positive},
    middleware::workspace::WorkspaceContext,
    models::{
        invoice::{Category, Invoice, InvoiceDraft, InvoiceStatus},
        view::{InvoiceView, ViewQuery},
    },
};

// ---
// Payload: o formulário de fatura (criação e edição)
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub supplier: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub invoice_number: String,

    #[validate(required(message = "A data é obrigatória."))]
    pub date: Option<NaiveDate>,

    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: Category,

    pub status: Option<InvoiceStatus>,

    // Grava mesmo com número repetido (o usuário confirmou o aviso)
    #[serde(default)]
    pub allow_duplicate: bool,
}

impl InvoicePayload {
    // Só chamado depois de validate(): a data existe
    fn into_draft(self) -> Result<(InvoiceDraft, bool), AppError> {
        let date = self.date.ok_or_else(|| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("date", validator::ValidationError::new("required"));
            AppError::ValidationError(errors)
        })?;

        let draft = InvoiceDraft {
            supplier: self.supplier.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            date,
            amount: self.amount,
            description: self.description.trim().to_string(),
            category: self.category,
            status: self.status.unwrap_or(InvoiceStatus::Pending),
        };
        Ok((draft, self.allow_duplicate))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateQuery {
    pub invoice_number: String,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateResponse {
    pub duplicate_id: Option<Uuid>,
}

// GET /api/invoices?search=&from=&to=&category=&status=&sort=
pub async fn list_invoices(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Query(query): Query<ViewQuery>,
) -> Result<Json<InvoiceView>, AppError> {
    let view = app_state.invoice_service.view(workspace.id(), &query).await?;
    Ok(Json(view))
}

pub async fn create_invoice(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Json(payload): Json<InvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (draft, allow_duplicate) = payload.into_draft()?;

    let invoice = app_state
        .invoice_service
        .create(workspace.id(), draft, allow_duplicate)
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn update_invoice(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoicePayload>,
) -> Result<Json<Invoice>, AppError> {
    payload.validate()?;
    let (draft, allow_duplicate) = payload.into_draft()?;

    let invoice = app_state
        .invoice_service
        .update(workspace.id(), id, draft, allow_duplicate)
        .await?;

    Ok(Json(invoice))
}

pub async fn delete_invoice(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.invoice_service.delete(workspace.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/invoices/duplicate?invoiceNumber=..&excludeId=..
pub async fn check_duplicate(
    State(app_state): State<AppState>,
    workspace: WorkspaceContext,
    Query(query): Query<DuplicateQuery>,
) -> Result<Json<DuplicateResponse>, AppError> {
    let duplicate_id = app_state
        .invoice_service
        .duplicate_of(workspace.id(), &query.invoice_number, query.exclude_id)
        .await?;

    Ok(Json(DuplicateResponse { duplicate_id }))
}
