// src/services/csv_service.rs

use chrono::{DateTime, NaiveDate};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        invoice::{Category, Invoice},
        transfer::ImportedInvoice,
    },
};

/// Ordem fixa das colunas exportadas.
pub const CSV_HEADERS: [&str; 7] = [
    "supplier",
    "invoiceNumber",
    "date",
    "amount",
    "category",
    "status",
    "description",
];

/// Colunas sem as quais o arquivo é recusado.
pub const REQUIRED_HEADERS: [&str; 4] = ["supplier", "invoiceNumber", "date", "amount"];

// =========================================================================
//  EXPORTAÇÃO
// =========================================================================

/// Cabeçalho simples, cada valor entre aspas (aspas internas duplicadas),
/// separados por vírgula, linhas terminadas em CRLF.
pub fn export_csv(invoices: &[Invoice]) -> Result<Vec<u8>, AppError> {
    let mut buffer = CSV_HEADERS.join(",").into_bytes();
    buffer.extend_from_slice(b"\r\n");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(buffer);

    for inv in invoices {
        let date = inv.date.format("%Y-%m-%d").to_string();
        let amount = inv.amount.normalize().to_string();
        writer
            .write_record([
                inv.supplier.as_str(),
                inv.invoice_number.as_str(),
                date.as_str(),
                amount.as_str(),
                inv.category.label(),
                inv.status.as_str(),
                inv.description.as_str(),
            ])
            .map_err(|e| anyhow::anyhow!("Falha ao escrever linha CSV: {}", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Falha ao finalizar o CSV: {}", e).into())
}

// =========================================================================
//  IMPORTAÇÃO
// =========================================================================

/// Lê o CSV exportado (ou um compatível). Linhas inválidas são descartadas; um
/// arquivo sem as colunas obrigatórias ou com data ilegível aborta tudo.
pub fn import_csv(bytes: &[u8]) -> Result<Vec<ImportedInvoice>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::InvalidImport(format!("cabeçalho ilegível: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').replace('"', "").trim().to_string())
        .collect();

    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::InvalidImport(format!("linha ilegível: {}", e)))?;

    // Só o cabeçalho (ou nada): não há o que importar
    if records.is_empty() {
        return Ok(Vec::new());
    }

    if !REQUIRED_HEADERS.iter().all(|r| headers.iter().any(|h| h == r)) {
        return Err(AppError::InvalidImport(
            "o arquivo CSV não tem os cabeçalhos obrigatórios (supplier, invoiceNumber, date, amount)."
                .to_string(),
        ));
    }

    let column = |record: &StringRecord, name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| record.get(idx))
            .unwrap_or("")
            .to_string()
    };

    let mut imported = Vec::new();
    for record in &records {
        let date = parse_import_date(&column(record, "date"))?;
        let amount = column(record, "amount").parse::<Decimal>().ok();
        let category = Category::parse_or_default(&column(record, "category"));

        if let Some(invoice) = ImportedInvoice::accept(
            &column(record, "supplier"),
            &column(record, "invoiceNumber"),
            date,
            amount,
            &column(record, "description"),
            category,
        ) {
            imported.push(invoice);
        }
    }

    Ok(imported)
}

/// Data vazia descarta a linha; data presente mas ilegível é erro de importação.
pub fn parse_import_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| AppError::InvalidImport(format!("data inválida: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{InvoiceDraft, InvoiceStatus};
    use uuid::Uuid;

    fn invoice(supplier: &str, number: &str, cents: i64, description: &str) -> Invoice {
        InvoiceDraft {
            supplier: supplier.into(),
            invoice_number: number.into(),
            date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            amount: Decimal::new(cents, 2),
            description: description.into(),
            category: Category::FixedExpenses,
            status: InvoiceStatus::Overdue,
        }
        .into_invoice(Uuid::nil())
    }

    #[test]
    fn export_quotes_every_value_and_uses_crlf() {
        let bytes = export_csv(&[invoice("Office \"Supplies\" Inc.", "OS-9", 12050, "Paper")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "supplier,invoiceNumber,date,amount,category,status,description\r\n\
             \"Office \"\"Supplies\"\" Inc.\",\"OS-9\",\"2025-04-30\",\"120.5\",\"Πάγια Έξοδα\",\"Overdue\",\"Paper\"\r\n"
        );
    }

    #[test]
    fn export_then_import_round_trips_key_fields() {
        let originals = vec![
            invoice("Web Supplies Co.", "WS-001", 19999, "Toner"),
            invoice("Cloud Services Ltd.", "CS/2025/7", 100, ""),
        ];
        let imported = import_csv(&export_csv(&originals).unwrap()).unwrap();

        assert_eq!(imported.len(), 2);
        for (orig, back) in originals.iter().zip(&imported) {
            assert_eq!(back.supplier, orig.supplier);
            assert_eq!(back.invoice_number, orig.invoice_number);
            assert_eq!(back.date, orig.date);
            assert_eq!(back.amount, orig.amount);
            assert_eq!(back.category, orig.category);
        }
    }

    #[test]
    fn import_requires_the_four_mandatory_headers() {
        let csv = "supplier,date,amount\nACME,2025-01-01,10\n";
        let err = import_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::InvalidImport(_)));
    }

    #[test]
    fn header_only_file_imports_nothing() {
        assert!(import_csv(b"supplier,invoiceNumber\r\n").unwrap().is_empty());
        assert!(import_csv(b"").unwrap().is_empty());
    }

    #[test]
    fn invalid_rows_are_dropped_and_defaults_applied() {
        let csv = "invoiceNumber,supplier,amount,date,category\n\
                   A-1,ACME,10.5,2025-01-02,\n\
                   A-2,ACME,0,2025-01-02,Υλικά\n\
                   A-3,,10,2025-01-02,Υλικά\n\
                   A-4,ACME,-3,2025-01-02,Υλικά\n\
                   A-5,ACME,abc,2025-01-02,Υλικά\n\
                   A-6,ACME,7,,Υλικά\n\
                   \n\
                   A-7,ACME,8,2025-01-03,Unknown\n";
        let imported = import_csv(csv.as_bytes()).unwrap();

        let numbers: Vec<&str> = imported.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["A-1", "A-7"]);
        assert_eq!(imported[0].category, Category::General);
        assert_eq!(imported[0].description, "");
        assert_eq!(imported[1].category, Category::General);
    }

    #[test]
    fn unreadable_date_aborts_the_import() {
        let csv = "supplier,invoiceNumber,date,amount\nACME,1,31/31/2025,10\n";
        assert!(matches!(import_csv(csv.as_bytes()), Err(AppError::InvalidImport(_))));
    }

    #[test]
    fn rfc3339_timestamps_are_reduced_to_dates() {
        assert_eq!(
            parse_import_date("2025-03-04T10:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
    }

    #[test]
    fn amounts_beyond_the_column_limit_are_dropped() {
        let csv = "supplier,invoiceNumber,date,amount\n\
                   ACME,BIG-1,2025-01-01,1000000000000\n\
                   ACME,BIG-2,2025-01-01,79228162514264337593543950335\n\
                   ACME,OK-1,2025-01-01,999999999999.99\n";
        let imported = import_csv(csv.as_bytes()).unwrap();

        let numbers: Vec<&str> = imported.iter().map(|i| i.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["OK-1"]);
    }
}
