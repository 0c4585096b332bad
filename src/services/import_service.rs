// src/services/import_service.rs

use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceStore,
    models::transfer::{ImportFormat, ImportSummary, ImportedInvoice},
    services::{csv_service, extraction_service::InvoiceExtractor},
};

#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn InvoiceStore>,
    extractor: Arc<dyn InvoiceExtractor>,
}

impl ImportService {
    pub fn new(store: Arc<dyn InvoiceStore>, extractor: Arc<dyn InvoiceExtractor>) -> Self {
        Self { store, extractor }
    }

    /// Lê o arquivo, descarta números já existentes na área de trabalho (e repetidos
    /// dentro do próprio arquivo) e grava o resto num único lote, como pendentes.
    /// Qualquer erro de leitura aborta tudo antes de gravar.
    pub async fn import(
        &self,
        workspace_id: Uuid,
        format: ImportFormat,
        bytes: &[u8],
    ) -> Result<ImportSummary, AppError> {
        let parsed = match format {
            ImportFormat::Csv => csv_service::import_csv(bytes)?,
            ImportFormat::Pdf => self.extractor.extract(bytes).await?,
        };

        let existing = self.store.list_invoices(workspace_id).await?;
        let mut seen: HashSet<String> = existing
            .iter()
            .map(|inv| normalize_number(&inv.invoice_number))
            .collect();

        let (fresh, skipped) = dedupe(parsed, &mut seen);

        let added = if fresh.is_empty() {
            0
        } else {
            let invoices = fresh
                .into_iter()
                .map(|row| row.into_draft().into_invoice(workspace_id))
                .collect();
            self.store.batch_add_invoices(invoices).await? as usize
        };

        tracing::info!(
            "📥 Importação ({:?}) na área {}: {} adicionadas, {} ignoradas",
            format,
            workspace_id,
            added,
            skipped
        );

        Ok(ImportSummary { added, skipped })
    }
}

fn normalize_number(number: &str) -> String {
    number.trim().to_lowercase()
}

// Mantém só a primeira ocorrência de cada número (sem diferenciar maiúsculas).
fn dedupe(
    rows: Vec<ImportedInvoice>,
    seen: &mut HashSet<String>,
) -> (Vec<ImportedInvoice>, usize) {
    let mut skipped = 0;
    let fresh = rows
        .into_iter()
        .filter(|row| {
            let fresh = seen.insert(normalize_number(&row.invoice_number));
            if !fresh {
                skipped += 1;
            }
            fresh
        })
        .collect();
    (fresh, skipped)
}
