// src/db/invoice_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::invoice::Invoice};

const INVOICE_COLUMNS: &str = "id, workspace_id, supplier, invoice_number, date, amount, \
                               description, category, status, created_at";

// Repositório da tabela 'invoices'. Toda consulta é filtrada pela área de trabalho.
#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Ordem padrão da listagem: data mais recente primeiro
    pub async fn list_by_workspace(&self, workspace_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE workspace_id = $1 ORDER BY date DESC",
            INVOICE_COLUMNS
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE workspace_id = $1 AND id = $2",
            INVOICE_COLUMNS
        );
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn insert<'e, E>(&self, executor: E, invoice: &Invoice) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO invoices (
                id, workspace_id, supplier, invoice_number, date,
                amount, description, category, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            INVOICE_COLUMNS
        );
        let created = sqlx::query_as::<_, Invoice>(&sql)
            .bind(invoice.id)
            .bind(invoice.workspace_id)
            .bind(&invoice.supplier)
            .bind(&invoice.invoice_number)
            .bind(invoice.date)
            .bind(invoice.amount)
            .bind(&invoice.description)
            .bind(invoice.category)
            .bind(invoice.status)
            .bind(invoice.created_at)
            .fetch_one(executor)
            .await?;

        Ok(created)
    }

    pub async fn update(&self, invoice: &Invoice) -> Result<Option<Invoice>, AppError> {
        let sql = format!(
            r#"
            UPDATE invoices
            SET supplier = $3, invoice_number = $4, date = $5, amount = $6,
                description = $7, category = $8, status = $9
            WHERE workspace_id = $1 AND id = $2
            RETURNING {}
            "#,
            INVOICE_COLUMNS
        );
        let updated = sqlx::query_as::<_, Invoice>(&sql)
            .bind(invoice.workspace_id)
            .bind(invoice.id)
            .bind(&invoice.supplier)
            .bind(&invoice.invoice_number)
            .bind(invoice.date)
            .bind(invoice.amount)
            .bind(&invoice.description)
            .bind(invoice.category)
            .bind(invoice.status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_workspace<'e, E>(&self, executor: E, workspace_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM invoices WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
