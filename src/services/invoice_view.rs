// src/services/invoice_view.rs
//
// Filtros, ordenação e totais da lista exibida. Funções puras: recebem a lista
// completa da área de trabalho e o estado dos filtros, devolvem a visão derivada.

use rust_decimal::Decimal;

use crate::models::{
    invoice::{Invoice, InvoiceStatus},
    view::{InvoiceSummary, InvoiceView, SortOption, ViewQuery},
};

/// Todos os filtros se combinam com E lógico. A ordenação é estável.
pub fn apply_view(invoices: &[Invoice], query: &ViewQuery) -> Vec<Invoice> {
    let needle = query.search.as_ref().map(|s| s.to_lowercase());

    let mut result: Vec<Invoice> = invoices
        .iter()
        .filter(|inv| query.from.is_none_or(|from| inv.date >= from))
        .filter(|inv| query.to.is_none_or(|to| inv.date <= to))
        .filter(|inv| query.category.is_none_or(|c| inv.category == c))
        .filter(|inv| query.status.is_none_or(|s| inv.status == s))
        .filter(|inv| needle.as_deref().is_none_or(|n| matches_search(inv, n)))
        .cloned()
        .collect();

    sort_invoices(&mut result, query.sort);
    result
}

fn matches_search(invoice: &Invoice, needle: &str) -> bool {
    [
        invoice.supplier.as_str(),
        invoice.invoice_number.as_str(),
        invoice.description.as_str(),
        invoice.category.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

pub fn sort_invoices(invoices: &mut [Invoice], sort: SortOption) {
    match sort {
        SortOption::DateDesc => invoices.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOption::DateAsc => invoices.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOption::AmountDesc => invoices.sort_by(|a, b| b.amount.cmp(&a.amount)),
        SortOption::AmountAsc => invoices.sort_by(|a, b| a.amount.cmp(&b.amount)),
    }
}

pub fn summarize(invoices: &[Invoice]) -> InvoiceSummary {
    invoices.iter().fold(InvoiceSummary::default(), |mut acc, inv| {
        acc.total_amount += inv.amount;
        acc.total_count += 1;
        match inv.status {
            InvoiceStatus::Paid => {
                acc.paid_count += 1;
                acc.paid_amount += inv.amount;
            }
            InvoiceStatus::Pending => {
                acc.pending_count += 1;
                acc.pending_amount += inv.amount;
            }
            InvoiceStatus::Overdue => {
                acc.overdue_count += 1;
                acc.overdue_amount += inv.amount;
            }
        }
        acc
    })
}

pub fn build_view(invoices: &[Invoice], query: &ViewQuery) -> InvoiceView {
    let filtered = apply_view(invoices, query);
    let summary = summarize(&filtered);
    InvoiceView {
        invoices: filtered,
        summary,
        original_count: invoices.len(),
    }
}

/// Percentual com duas casas. Denominador zero resulta em 0, nunca em erro.
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole).round_dp(2)
}
