// src/models/transfer.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::invoice::{is_valid_amount, Category, InvoiceDraft, InvoiceStatus};

// Uma fatura lida de um arquivo (CSV ou PDF via IA). O status não vem do arquivo:
// toda fatura importada entra como pendente.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedInvoice {
    pub supplier: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
}

impl ImportedInvoice {
    /// Regras comuns aos importadores: fornecedor, número e data obrigatórios,
    /// valor positivo e dentro do limite da coluna. Linhas que falham são descartadas.
    pub fn accept(
        supplier: &str,
        invoice_number: &str,
        date: Option<NaiveDate>,
        amount: Option<Decimal>,
        description: &str,
        category: Category,
    ) -> Option<Self> {
        let supplier = supplier.trim();
        let invoice_number = invoice_number.trim();
        if supplier.is_empty() || invoice_number.is_empty() {
            return None;
        }
        let amount = amount.filter(|a| is_valid_amount(*a))?;

        Some(Self {
            supplier: supplier.to_string(),
            invoice_number: invoice_number.to_string(),
            date: date?,
            amount,
            description: description.trim().to_string(),
            category,
        })
    }

    pub fn into_draft(self) -> InvoiceDraft {
        InvoiceDraft {
            supplier: self.supplier,
            invoice_number: self.invoice_number,
            date: self.date,
            amount: self.amount,
            description: self.description,
            category: self.category,
            status: InvoiceStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Formatos aceitos na importação, decididos pelo Content-Type da requisição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Pdf,
}

impl ImportFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime.to_ascii_lowercase().as_str() {
            "text/csv" => Some(Self::Csv),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::MAX_AMOUNT;

    #[test]
    fn accept_rejects_incomplete_or_non_positive_rows() {
        let day = NaiveDate::from_ymd_opt(2025, 2, 2);
        let ok = ImportedInvoice::accept(" ACME ", "7", day, Some(Decimal::TEN), "", Category::General);
        assert_eq!(ok.map(|i| i.supplier), Some("ACME".to_string()));

        assert!(ImportedInvoice::accept("", "7", day, Some(Decimal::TEN), "", Category::General).is_none());
        assert!(ImportedInvoice::accept("ACME", " ", day, Some(Decimal::TEN), "", Category::General).is_none());
        assert!(ImportedInvoice::accept("ACME", "7", None, Some(Decimal::TEN), "", Category::General).is_none());
        assert!(ImportedInvoice::accept("ACME", "7", day, Some(Decimal::ZERO), "", Category::General).is_none());
        assert!(ImportedInvoice::accept("ACME", "7", day, None, "", Category::General).is_none());
        assert!(ImportedInvoice::accept("ACME", "7", day, Some(MAX_AMOUNT), "", Category::General).is_some());
        let too_big = MAX_AMOUNT + Decimal::new(1, 2);
        assert!(ImportedInvoice::accept("ACME", "7", day, Some(too_big), "", Category::General).is_none());
    }

    #[test]
    fn import_format_ignores_parameters_and_case() {
        assert_eq!(
            ImportFormat::from_content_type("text/csv; charset=utf-8"),
            Some(ImportFormat::Csv)
        );
        assert_eq!(ImportFormat::from_content_type("Application/PDF"), Some(ImportFormat::Pdf));
        assert_eq!(ImportFormat::from_content_type("application/json"), None);
    }
}
