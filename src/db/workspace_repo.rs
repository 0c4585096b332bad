// src/db/workspace_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::workspace::Workspace};

// Repositório da tabela 'workspaces'
#[derive(Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Workspace>, AppError> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            "SELECT id, name, created_at FROM workspaces ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(workspaces)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Workspace>, AppError> {
        let workspace = sqlx::query_as::<_, Workspace>(
            "SELECT id, name, created_at FROM workspaces WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace)
    }

    pub async fn create<'e, E>(&self, executor: E, workspace: &Workspace) -> Result<Workspace, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(workspace.id)
        .bind(&workspace.name)
        .bind(workspace.created_at)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Apaga só a linha da área de trabalho. As faturas são removidas antes,
    /// na mesma transação, por quem chama.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
