// src/models/workspace.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Nome da área de trabalho criada quando nenhuma existe.
pub const DEFAULT_WORKSPACE_NAME: &str = "Κύρια Βάση Δεδομένων";

// ---
// Workspace (a "base de dados" da interface)
// ---
// Partição lógica das faturas. Sempre existe pelo menos uma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Nome seguro para arquivos: tudo fora de [a-z0-9] vira '_', em minúsculas.
    pub fn file_slug(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }

    /// Ex.: `invoices_main_2025-03-01.csv`
    pub fn export_file_name(&self, extension: &str, day: NaiveDate) -> String {
        format!("invoices_{}_{}.{}", self.file_slug(), day.format("%Y-%m-%d"), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_slug_replaces_everything_outside_ascii_alphanumerics() {
        let ws = Workspace::new("Έξοδα 2025 (Q1)");
        assert_eq!(ws.file_slug(), "______2025__q1_");
    }

    #[test]
    fn export_file_name_uses_slug_and_day() {
        let ws = Workspace::new("Main Books");
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(ws.export_file_name("pdf", day), "invoices_main_books_2025-03-01.pdf");
    }
}
