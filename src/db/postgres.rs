// src/db/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{InvoiceRepository, InvoiceStore, WorkspaceRepository};
use crate::{
    common::error::AppError,
    models::{invoice::Invoice, workspace::Workspace},
};

// O backend de produção: os dois repositórios sobre a mesma pool.
#[derive(Clone)]
pub struct PgInvoiceStore {
    pool: PgPool,
    workspace_repo: WorkspaceRepository,
    invoice_repo: InvoiceRepository,
}

impl PgInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            workspace_repo: WorkspaceRepository::new(pool.clone()),
            invoice_repo: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_workspaces(&self) -> Result<Vec<Workspace>, AppError> {
        self.workspace_repo.list().await
    }

    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError> {
        self.workspace_repo.find_by_id(id).await
    }

    async fn create_workspace(&self, workspace: Workspace) -> Result<Workspace, AppError> {
        self.workspace_repo.create(&self.pool, &workspace).await
    }

    async fn delete_workspace(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        // 1. Inicia a transação: ou some tudo, ou nada
        let mut tx = self.pool.begin().await?;

        // 2. Apaga as faturas da área
        let removed = self.invoice_repo.delete_by_workspace(&mut *tx, id).await?;

        // 3. Apaga a própria área. Se não existia, o drop do tx faz rollback.
        if !self.workspace_repo.delete(&mut *tx, id).await? {
            return Ok(None);
        }

        // 4. Commit
        tx.commit().await?;

        Ok(Some(removed))
    }

    async fn list_invoices(&self, workspace_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        self.invoice_repo.list_by_workspace(workspace_id).await
    }

    async fn find_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<Invoice>, AppError> {
        self.invoice_repo.find(workspace_id, id).await
    }

    async fn add_invoice(&self, invoice: Invoice) -> Result<Invoice, AppError> {
        self.invoice_repo.insert(&self.pool, &invoice).await
    }

    async fn batch_add_invoices(&self, invoices: Vec<Invoice>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        for invoice in &invoices {
            self.invoice_repo.insert(&mut *tx, invoice).await?;
        }

        tx.commit().await?;
        Ok(invoices.len() as u64)
    }

    async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, AppError> {
        self.invoice_repo.update(&invoice).await
    }

    async fn delete_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.invoice_repo.delete(workspace_id, id).await
    }
}
