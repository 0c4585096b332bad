//! Backend em memória, para desenvolvimento local e testes

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::InvoiceStore;
use crate::{
    common::error::AppError,
    models::{invoice::Invoice, workspace::Workspace},
};

#[derive(Default)]
struct Collections {
    workspaces: HashMap<Uuid, Workspace>,
    invoices: HashMap<Uuid, Invoice>,
}

/// Usa RwLock para acesso seguro entre threads. Nada é persistido.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    data: Arc<RwLock<Collections>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, AppError> {
        self.data
            .read()
            .map_err(|e| anyhow::anyhow!("Failed to acquire read lock: {}", e).into())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collections>, AppError> {
        self.data
            .write()
            .map_err(|e| anyhow::anyhow!("Failed to acquire write lock: {}", e).into())
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_workspaces(&self) -> Result<Vec<Workspace>, AppError> {
        let data = self.read()?;
        let mut workspaces: Vec<Workspace> = data.workspaces.values().cloned().collect();
        workspaces.sort_by_key(|w| w.created_at);
        Ok(workspaces)
    }

    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError> {
        Ok(self.read()?.workspaces.get(&id).cloned())
    }

    async fn create_workspace(&self, workspace: Workspace) -> Result<Workspace, AppError> {
        self.write()?.workspaces.insert(workspace.id, workspace.clone());
        Ok(workspace)
    }

    async fn delete_workspace(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        let mut data = self.write()?;
        if data.workspaces.remove(&id).is_none() {
            return Ok(None);
        }

        let before = data.invoices.len();
        data.invoices.retain(|_, inv| inv.workspace_id != id);
        Ok(Some((before - data.invoices.len()) as u64))
    }

    async fn list_invoices(&self, workspace_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        let data = self.read()?;
        let mut invoices: Vec<Invoice> = data
            .invoices
            .values()
            .filter(|inv| inv.workspace_id == workspace_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }

    async fn find_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<Invoice>, AppError> {
        Ok(self
            .read()?
            .invoices
            .get(&id)
            .filter(|inv| inv.workspace_id == workspace_id)
            .cloned())
    }

    async fn add_invoice(&self, invoice: Invoice) -> Result<Invoice, AppError> {
        let mut data = self.write()?;
        if !data.workspaces.contains_key(&invoice.workspace_id) {
            return Err(AppError::WorkspaceNotFound);
        }
        data.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn batch_add_invoices(&self, invoices: Vec<Invoice>) -> Result<u64, AppError> {
        let mut data = self.write()?;
        // Tudo ou nada, como a transação do Postgres
        if let Some(orphan) = invoices
            .iter()
            .find(|inv| !data.workspaces.contains_key(&inv.workspace_id))
        {
            tracing::warn!("Lote rejeitado: área {} inexistente", orphan.workspace_id);
            return Err(AppError::WorkspaceNotFound);
        }

        let count = invoices.len() as u64;
        for invoice in invoices {
            data.invoices.insert(invoice.id, invoice);
        }
        Ok(count)
    }

    async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, AppError> {
        let mut data = self.write()?;
        match data.invoices.get_mut(&invoice.id) {
            Some(existing) if existing.workspace_id == invoice.workspace_id => {
                *existing = invoice.clone();
                Ok(Some(invoice))
            }
            _ => Ok(None),
        }
    }

    async fn delete_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.write()?;
        let belongs = data
            .invoices
            .get(&id)
            .is_some_and(|inv| inv.workspace_id == workspace_id);
        if belongs {
            data.invoices.remove(&id);
        }
        Ok(belongs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{Category, InvoiceDraft, InvoiceStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn invoice_in(workspace_id: Uuid, number: &str, day: u32) -> Invoice {
        InvoiceDraft {
            supplier: "Cloud Services Ltd.".into(),
            invoice_number: number.into(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            amount: Decimal::new(5000, 2),
            description: String::new(),
            category: Category::Services,
            status: InvoiceStatus::Pending,
        }
        .into_invoice(workspace_id)
    }

    #[tokio::test]
    async fn delete_workspace_cascades_only_to_its_invoices() {
        let store = InMemoryInvoiceStore::new();
        let a = store.create_workspace(Workspace::new("A")).await.unwrap();
        let b = store.create_workspace(Workspace::new("B")).await.unwrap();
        store
            .batch_add_invoices(vec![invoice_in(a.id, "1", 1), invoice_in(a.id, "2", 2)])
            .await
            .unwrap();
        store.add_invoice(invoice_in(b.id, "3", 3)).await.unwrap();

        assert_eq!(store.delete_workspace(a.id).await.unwrap(), Some(2));
        assert!(store.list_invoices(a.id).await.unwrap().is_empty());
        assert_eq!(store.list_invoices(b.id).await.unwrap().len(), 1);
        assert_eq!(store.delete_workspace(a.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invoices_are_listed_newest_first() {
        let store = InMemoryInvoiceStore::new();
        let ws = store.create_workspace(Workspace::new("A")).await.unwrap();
        for (n, day) in [("a", 5), ("b", 20), ("c", 1)] {
            store.add_invoice(invoice_in(ws.id, n, day)).await.unwrap();
        }

        let numbers: Vec<String> = store
            .list_invoices(ws.id)
            .await
            .unwrap()
            .into_iter()
            .map(|inv| inv.invoice_number)
            .collect();
        assert_eq!(numbers, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn invoices_from_another_workspace_are_invisible() {
        let store = InMemoryInvoiceStore::new();
        let a = store.create_workspace(Workspace::new("A")).await.unwrap();
        let b = store.create_workspace(Workspace::new("B")).await.unwrap();
        let inv = store.add_invoice(invoice_in(a.id, "1", 1)).await.unwrap();

        assert!(store.find_invoice(b.id, inv.id).await.unwrap().is_none());
        assert!(!store.delete_invoice(b.id, inv.id).await.unwrap());
        assert!(store.delete_invoice(a.id, inv.id).await.unwrap());
    }
}
