// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status")]
pub enum InvoiceStatus {
    Pending, // Em aberto
    Paid,    // Quitada
    Overdue, // Vencida
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [Self::Pending, Self::Paid, Self::Overdue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }

    /// Rótulo exibido nos relatórios, conforme o idioma do cliente.
    pub fn label(&self, lang: &str) -> &'static str {
        match (lang, self) {
            ("el", Self::Pending) => "Σε εκκρεμότητα",
            ("el", Self::Paid) => "Πληρωμένο",
            ("el", Self::Overdue) => "Εκπρόθεσμο",
            (_, status) => status.as_str(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

// As categorias são gravadas com o rótulo grego, compatível com os arquivos
// exportados pela ferramenta antiga. O nome em inglês também é aceito na entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_category")]
pub enum Category {
    #[serde(rename = "Υλικά", alias = "Materials")]
    #[sqlx(rename = "Υλικά")]
    Materials,
    #[serde(rename = "Εργατικά", alias = "Labor")]
    #[sqlx(rename = "Εργατικά")]
    Labor,
    #[serde(rename = "Γενικά", alias = "General")]
    #[sqlx(rename = "Γενικά")]
    General,
    #[serde(rename = "Πάγια Έξοδα", alias = "FixedExpenses")]
    #[sqlx(rename = "Πάγια Έξοδα")]
    FixedExpenses,
    #[serde(rename = "Υπηρεσίες", alias = "Services")]
    #[sqlx(rename = "Υπηρεσίες")]
    Services,
    #[serde(rename = "Λογισμικό", alias = "Software")]
    #[sqlx(rename = "Λογισμικό")]
    Software,
    #[serde(rename = "Ταξίδια", alias = "Travel")]
    #[sqlx(rename = "Ταξίδια")]
    Travel,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Materials,
        Self::Labor,
        Self::General,
        Self::FixedExpenses,
        Self::Services,
        Self::Software,
        Self::Travel,
    ];

    /// Categoria usada em importações quando o valor é ausente ou desconhecido.
    pub const IMPORT_DEFAULT: Category = Self::General;

    pub fn label(&self) -> &'static str {
        match self {
            Self::Materials => "Υλικά",
            Self::Labor => "Εργατικά",
            Self::General => "Γενικά",
            Self::FixedExpenses => "Πάγια Έξοδα",
            Self::Services => "Υπηρεσίες",
            Self::Software => "Λογισμικό",
            Self::Travel => "Ταξίδια",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Materials => "Materials",
            Self::Labor => "Labor",
            Self::General => "General",
            Self::FixedExpenses => "FixedExpenses",
            Self::Services => "Services",
            Self::Software => "Software",
            Self::Travel => "Travel",
        }
    }

    /// Aceita o rótulo grego exato ou o nome em inglês (sem diferenciar maiúsculas).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|c| {
            c.label() == value || c.english_name().eq_ignore_ascii_case(value)
        })
    }

    /// Versão tolerante usada pelos importadores.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::IMPORT_DEFAULT)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("categoria desconhecida: {}", s))
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("status desconhecido: {}", s))
    }
}

impl Default for Category {
    // Valor inicial do formulário
    fn default() -> Self {
        Self::Materials
    }
}

// --- Valores ---

/// Maior valor que cabe na coluna NUMERIC(14, 2): 999.999.999.999,99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Valor aceito em formulário e importação: maior que zero e dentro da coluna.
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount <= MAX_AMOUNT
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub supplier: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

// Os dados do formulário: tudo menos id, área de trabalho e data de criação.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub supplier: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    pub fn into_invoice(self, workspace_id: Uuid) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            workspace_id,
            supplier: self.supplier,
            invoice_number: self.invoice_number,
            date: self.date,
            amount: self.amount,
            description: self.description,
            category: self.category,
            status: self.status,
            created_at: Utc::now(),
        }
    }

    /// Aplica os campos editáveis sobre uma fatura existente (id e criação preservados).
    pub fn apply_to(self, invoice: &Invoice) -> Invoice {
        Invoice {
            supplier: self.supplier,
            invoice_number: self.invoice_number,
            date: self.date,
            amount: self.amount,
            description: self.description,
            category: self.category,
            status: self.status,
            ..invoice.clone()
        }
    }
}
