// src/services/workspace_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceStore,
    models::workspace::{Workspace, DEFAULT_WORKSPACE_NAME},
};

#[derive(Clone)]
pub struct WorkspaceService {
    store: Arc<dyn InvoiceStore>,
}

impl WorkspaceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store }
    }

    /// Lista as áreas de trabalho. Se não houver nenhuma, cria a padrão e a retorna,
    /// para que sempre exista uma selecionável.
    pub async fn list(&self) -> Result<Vec<Workspace>, AppError> {
        let workspaces = self.store.list_workspaces().await?;
        if !workspaces.is_empty() {
            return Ok(workspaces);
        }

        let default = self
            .store
            .create_workspace(Workspace::new(DEFAULT_WORKSPACE_NAME))
            .await?;
        tracing::info!("🗂️ Área de trabalho padrão criada: {}", default.id);
        Ok(vec![default])
    }

    pub async fn create(&self, name: &str) -> Result<Workspace, AppError> {
        let workspace = self.store.create_workspace(Workspace::new(name.trim())).await?;
        tracing::info!("🗂️ Área de trabalho '{}' criada ({})", workspace.name, workspace.id);
        Ok(workspace)
    }

    /// Remove a área e todas as faturas dela. A última área nunca é removida.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let workspaces = self.store.list_workspaces().await?;
        if !workspaces.iter().any(|w| w.id == id) {
            return Err(AppError::WorkspaceNotFound);
        }
        if workspaces.len() <= 1 {
            return Err(AppError::LastWorkspace);
        }

        let removed = self
            .store
            .delete_workspace(id)
            .await?
            .ok_or(AppError::WorkspaceNotFound)?;

        tracing::info!("🗑️ Área de trabalho {} removida com {} faturas", id, removed);
        Ok(())
    }

    /// Garante que a área existe antes de qualquer operação sobre faturas.
    pub async fn require(&self, id: Uuid) -> Result<Workspace, AppError> {
        self.store
            .find_workspace(id)
            .await?
            .ok_or(AppError::WorkspaceNotFound)
    }
}
