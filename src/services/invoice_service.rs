// src/services/invoice_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceStore,
    models::{
        invoice::{Invoice, InvoiceDraft},
        view::{InvoiceView, ViewQuery},
    },
    services::{duplicates::find_duplicate, invoice_view::build_view},
};

#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Lista completa da área de trabalho, da mais recente para a mais antiga.
    pub async fn list(&self, workspace_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        self.store.list_invoices(workspace_id).await
    }

    pub async fn view(&self, workspace_id: Uuid, query: &ViewQuery) -> Result<InvoiceView, AppError> {
        let invoices = self.store.list_invoices(workspace_id).await?;
        Ok(build_view(&invoices, query))
    }

    /// Verificação ao vivo do formulário: id da primeira fatura com o mesmo número.
    pub async fn duplicate_of(
        &self,
        workspace_id: Uuid,
        invoice_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Uuid>, AppError> {
        let invoices = self.store.list_invoices(workspace_id).await?;
        Ok(find_duplicate(&invoices, invoice_number, exclude).map(|inv| inv.id))
    }

    pub async fn create(
        &self,
        workspace_id: Uuid,
        draft: InvoiceDraft,
        allow_duplicate: bool,
    ) -> Result<Invoice, AppError> {
        if !allow_duplicate {
            self.reject_duplicate(workspace_id, &draft.invoice_number, None).await?;
        }

        let invoice = self.store.add_invoice(draft.into_invoice(workspace_id)).await?;
        tracing::info!(
            "🧾 Fatura {} ({}) criada na área {}",
            invoice.invoice_number,
            invoice.id,
            workspace_id
        );
        Ok(invoice)
    }

    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        draft: InvoiceDraft,
        allow_duplicate: bool,
    ) -> Result<Invoice, AppError> {
        let current = self
            .store
            .find_invoice(workspace_id, id)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        if !allow_duplicate {
            self.reject_duplicate(workspace_id, &draft.invoice_number, Some(id)).await?;
        }

        let updated = self
            .store
            .update_invoice(draft.apply_to(&current))
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        tracing::info!("✏️ Fatura {} atualizada", id);
        Ok(updated)
    }

    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_invoice(workspace_id, id).await? {
            return Err(AppError::InvoiceNotFound);
        }
        tracing::info!("🗑️ Fatura {} removida", id);
        Ok(())
    }

    async fn reject_duplicate(
        &self,
        workspace_id: Uuid,
        invoice_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        match self.duplicate_of(workspace_id, invoice_number, exclude).await? {
            Some(existing_id) => {
                tracing::warn!("⚠️ Número de fatura repetido: '{}'", invoice_number.trim());
                Err(AppError::DuplicateInvoiceNumber { existing_id })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::InMemoryInvoiceStore,
        models::{
            invoice::{Category, InvoiceStatus},
            view::SortOption,
            workspace::Workspace,
        },
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn draft(number: &str, amount: i64) -> InvoiceDraft {
        InvoiceDraft {
            supplier: "Office Supplies Inc.".into(),
            invoice_number: number.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            amount: Decimal::from(amount),
            description: "Chairs".into(),
            category: Category::Materials,
            status: InvoiceStatus::Pending,
        }
    }

    async fn setup() -> (InvoiceService, Uuid, Uuid) {
        let store: Arc<dyn InvoiceStore> = Arc::new(InMemoryInvoiceStore::new());
        let a = store.create_workspace(Workspace::new("A")).await.unwrap();
        let b = store.create_workspace(Workspace::new("B")).await.unwrap();
        (InvoiceService::new(store), a.id, b.id)
    }

    #[tokio::test]
    async fn duplicates_block_creation_unless_allowed() {
        let (service, ws, _) = setup().await;
        let first = service.create(ws, draft("OS-1", 10), false).await.unwrap();

        let err = service.create(ws, draft(" os-1 ", 20), false).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateInvoiceNumber { existing_id } if existing_id == first.id));

        service.create(ws, draft("OS-1", 20), true).await.unwrap();
        assert_eq!(service.list(ws).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicates_are_scoped_to_the_workspace() {
        let (service, a, b) = setup().await;
        service.create(a, draft("SHARED-1", 10), false).await.unwrap();
        assert!(service.create(b, draft("SHARED-1", 10), false).await.is_ok());
    }

    #[tokio::test]
    async fn update_ignores_its_own_number_and_keeps_identity() {
        let (service, ws, _) = setup().await;
        let created = service.create(ws, draft("OS-7", 10), false).await.unwrap();

        let mut edit = draft("os-7", 99);
        edit.status = InvoiceStatus::Paid;
        let updated = service.update(ws, created.id, edit, false).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.amount, Decimal::from(99));
        assert_eq!(updated.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn other_workspaces_cannot_touch_an_invoice() {
        let (service, a, b) = setup().await;
        let created = service.create(a, draft("OS-9", 10), false).await.unwrap();

        assert!(matches!(
            service.update(b, created.id, draft("OS-9", 1), false).await,
            Err(AppError::InvoiceNotFound)
        ));
        assert!(matches!(service.delete(b, created.id).await, Err(AppError::InvoiceNotFound)));

        service.delete(a, created.id).await.unwrap();
        assert!(service.list(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn view_filters_and_summarizes() {
        let (service, ws, _) = setup().await;
        service.create(ws, draft("V-1", 10), false).await.unwrap();
        service.create(ws, draft("V-2", 30), false).await.unwrap();

        let query = ViewQuery { sort: SortOption::AmountDesc, ..Default::default() };
        let view = service.view(ws, &query).await.unwrap();
        assert_eq!(view.invoices[0].invoice_number, "V-2");
        assert_eq!(view.summary.total_amount, Decimal::from(40));
        assert_eq!(view.summary.pending_count, 2);
        assert_eq!(
            service.duplicate_of(ws, "v-1", None).await.unwrap(),
            Some(view.invoices[1].id)
        );
    }
}
