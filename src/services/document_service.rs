// src/services/document_service.rs

use chrono::{NaiveDate, Utc};
use genpdf::{elements, style, Alignment, Element};
use std::path::PathBuf;

use crate::{
    common::error::AppError,
    models::{invoice::Invoice, view::InvoiceSummary, workspace::Workspace},
};

const FONT_FAMILY: &str = "Roboto";

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self { fonts_dir: fonts_dir.into() }
    }

    /// Relatório em PDF da visão atual: título, tabela das faturas e bloco de resumo.
    /// `lang` escolhe os rótulos de status ("el" ou "en").
    pub fn invoice_report(
        &self,
        workspace: &Workspace,
        invoices: &[Invoice],
        summary: &InvoiceSummary,
        lang: &str,
    ) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada (precisa cobrir o alfabeto grego)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, FONT_FAMILY, None)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Fonte {} não encontrada em {}: {}",
                    FONT_FAMILY,
                    self.fonts_dir.display(),
                    e
                )
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Invoice Report: {}", workspace.name));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(format!("Invoice Report: {}", workspace.name))
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!(
                "Generated on: {}",
                Utc::now().format("%Y-%m-%d %H:%M UTC")
            ))
            .styled(style::Style::new().with_font_size(9)),
        );
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        // Pesos: Data (2), Fornecedor (4), Nº (2), Categoria (3), Status (2), Valor (2)
        let mut table = elements::TableLayout::new(vec![2, 4, 2, 3, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold().with_font_size(9);
        let mut header = table.row();
        for title in ["Date", "Supplier", "Invoice #", "Category", "Status", "Amount (€)"] {
            header.push_element(elements::Paragraph::new(title).styled(style_bold));
        }
        header.push().map_err(table_error)?;

        let style_cell = style::Style::new().with_font_size(9);
        for inv in invoices {
            let mut amount = elements::Paragraph::new(format!("{:.2}", inv.amount));
            amount.set_alignment(Alignment::Right);

            table
                .row()
                .element(elements::Paragraph::new(inv.date.format("%Y-%m-%d").to_string()).styled(style_cell))
                .element(elements::Paragraph::new(inv.supplier.as_str()).styled(style_cell))
                .element(elements::Paragraph::new(inv.invoice_number.as_str()).styled(style_cell))
                .element(elements::Paragraph::new(inv.category.label()).styled(style_cell))
                .element(elements::Paragraph::new(inv.status.label(lang)).styled(style_cell))
                .element(amount.styled(style_cell))
                .push()
                .map_err(table_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- RESUMO ---
        doc.push(elements::Paragraph::new("Summary").styled(style::Style::new().bold().with_font_size(12)));
        doc.push(elements::Paragraph::new(format!("Total Invoices: {}", summary.total_count)));
        doc.push(elements::Paragraph::new(format!("Total Amount: €{:.2}", summary.total_amount)));
        doc.push(elements::Paragraph::new(format!(
            "Paid: {} | Pending: {} | Overdue: {}",
            summary.paid_count, summary.pending_count, summary.overdue_count
        )));
        if let Some((first, last)) = report_period(invoices) {
            doc.push(elements::Paragraph::new(format!(
                "Period: {} - {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            )));
        }

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Falha ao renderizar o PDF: {}", e))?;

        Ok(buffer)
    }
}

fn table_error(e: genpdf::error::Error) -> AppError {
    anyhow::anyhow!("Falha ao montar a tabela do PDF: {}", e).into()
}

/// Data mais antiga e mais recente da lista (nada se estiver vazia).
pub fn report_period(invoices: &[Invoice]) -> Option<(NaiveDate, NaiveDate)> {
    let first = invoices.iter().map(|inv| inv.date).min()?;
    let last = invoices.iter().map(|inv| inv.date).max()?;
    Some((first, last))
}
