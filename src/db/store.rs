// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{invoice::Invoice, workspace::Workspace},
};

/// O armazenamento remoto das duas coleções: áreas de trabalho e faturas.
///
/// Todas as operações são chamadas diretas, sem cache local nem novas tentativas.
/// Só `batch_add_invoices` e `delete_workspace` são atômicas.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Nome do backend, exibido nas informações do sistema.
    fn backend_name(&self) -> &'static str;

    // --- Áreas de trabalho ---

    /// Ordenadas pela data de criação (mais antiga primeiro).
    async fn list_workspaces(&self) -> Result<Vec<Workspace>, AppError>;

    async fn find_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError>;

    async fn create_workspace(&self, workspace: Workspace) -> Result<Workspace, AppError>;

    /// Remove a área e todas as suas faturas. Retorna quantas faturas foram apagadas,
    /// ou `None` se a área não existia.
    async fn delete_workspace(&self, id: Uuid) -> Result<Option<u64>, AppError>;

    // --- Faturas ---

    async fn list_invoices(&self, workspace_id: Uuid) -> Result<Vec<Invoice>, AppError>;

    async fn find_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<Invoice>, AppError>;

    async fn add_invoice(&self, invoice: Invoice) -> Result<Invoice, AppError>;

    async fn batch_add_invoices(&self, invoices: Vec<Invoice>) -> Result<u64, AppError>;

    /// Retorna `None` se a fatura não existe naquela área de trabalho.
    async fn update_invoice(&self, invoice: Invoice) -> Result<Option<Invoice>, AppError>;

    async fn delete_invoice(&self, workspace_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}
