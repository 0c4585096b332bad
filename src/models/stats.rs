// src/models/stats.rs

use rust_decimal::Decimal;
use serde::Serialize;

use super::invoice::{Category, InvoiceStatus};

// 1. Visão geral da área de trabalho (diálogo de estatísticas globais)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub workspace_name: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub overdue_amount: Decimal,
    pub health_score: Decimal, // 0..=100
    pub suppliers: Vec<SupplierShare>,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierShare {
    pub name: String,
    pub amount: Decimal,
    pub percent_of_total: Decimal,
    pub percent_of_max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: Category,
    pub amount: Decimal,
    pub percent: Decimal,
}

// 2. Análise de um fornecedor
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStats {
    pub supplier: String,
    pub total_amount: Decimal,
    pub count: usize,
    pub average_amount: Decimal,
    pub by_status: Vec<StatusBreakdown>,
    pub top_categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub status: InvoiceStatus,
    pub count: usize,
    pub amount: Decimal,
}
