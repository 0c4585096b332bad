// src/models/view.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use super::invoice::{Category, Invoice, InvoiceStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOption {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

// ---
// Estado dos filtros (vem da query string)
// ---
// Campos vazios ("?category=") valem como "sem filtro".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub to: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub sort: SortOption,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

// Totais da visão filtrada (cards da barra lateral e bloco de resumo do PDF)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub total_amount: Decimal,
    pub total_count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub overdue_amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub invoices: Vec<Invoice>,
    pub summary: InvoiceSummary,
    /// Quantas faturas a área de trabalho tem antes dos filtros.
    pub original_count: usize,
}
