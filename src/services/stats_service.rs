// src/services/stats_service.rs

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::{
    models::{
        invoice::{Category, Invoice, InvoiceStatus},
        stats::{CategoryShare, GlobalStats, StatusBreakdown, SupplierShare, SupplierStats},
    },
    services::invoice_view::{percent, summarize},
};

const HEALTH_BASE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Índice de saúde (0 a 100): parte de 50, sobe com o que está pago e desce com o
/// que está vencido. Sem valor total, as razões valem 0.
pub fn health_score(total: Decimal, paid: Decimal, overdue: Decimal) -> Decimal {
    let (paid_ratio, overdue_ratio) = if total.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (paid / total, overdue / total)
    };

    let score = HEALTH_BASE + paid_ratio * HEALTH_BASE - overdue_ratio * HEALTH_BASE;
    score
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn global_stats(workspace_name: &str, invoices: &[Invoice]) -> GlobalStats {
    let summary = summarize(invoices);
    let total = summary.total_amount;

    GlobalStats {
        workspace_name: workspace_name.to_string(),
        total_amount: total,
        paid_amount: summary.paid_amount,
        pending_amount: summary.pending_amount,
        overdue_amount: summary.overdue_amount,
        health_score: health_score(total, summary.paid_amount, summary.overdue_amount),
        suppliers: supplier_ranking(invoices, total),
        categories: category_ranking(invoices, total),
    }
}

// Agrupa pelo nome normalizado (sem espaços nas pontas, minúsculo). O nome exibido é
// a primeira grafia encontrada. Fornecedores em branco são ignorados.
fn supplier_ranking(invoices: &[Invoice], total: Decimal) -> Vec<SupplierShare> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Decimal)> = Vec::new();

    for inv in invoices {
        let display = inv.supplier.trim();
        let key = display.to_lowercase();
        if key.is_empty() {
            continue;
        }
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((display.to_string(), Decimal::ZERO));
            groups.len() - 1
        });
        groups[slot].1 += inv.amount;
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    let max = groups.first().map(|(_, amount)| *amount).unwrap_or(Decimal::ZERO);

    groups
        .into_iter()
        .map(|(name, amount)| SupplierShare {
            name,
            amount,
            percent_of_total: percent(amount, total),
            percent_of_max: percent(amount, max),
        })
        .collect()
}

fn category_ranking(invoices: &[Invoice], total: Decimal) -> Vec<CategoryShare> {
    let mut groups: Vec<(Category, Decimal)> = Vec::new();
    for inv in invoices {
        match groups.iter_mut().find(|(c, _)| *c == inv.category) {
            Some((_, amount)) => *amount += inv.amount,
            None => groups.push((inv.category, inv.amount)),
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percent: percent(amount, total),
        })
        .collect()
}

/// Análise de um fornecedor: considera as faturas com exatamente esse nome.
pub fn supplier_stats(supplier: &str, invoices: &[Invoice]) -> SupplierStats {
    let own: Vec<Invoice> = invoices
        .iter()
        .filter(|inv| inv.supplier == supplier)
        .cloned()
        .collect();

    let summary = summarize(&own);
    let count = own.len();
    let average_amount = if count == 0 {
        Decimal::ZERO
    } else {
        (summary.total_amount / Decimal::from(count)).round_dp(2)
    };

    let by_status = InvoiceStatus::ALL
        .into_iter()
        .map(|status| {
            let (count, amount) = match status {
                InvoiceStatus::Paid => (summary.paid_count, summary.paid_amount),
                InvoiceStatus::Pending => (summary.pending_count, summary.pending_amount),
                InvoiceStatus::Overdue => (summary.overdue_count, summary.overdue_amount),
            };
            StatusBreakdown { status, count, amount }
        })
        .collect();

    let mut top_categories = category_ranking(&own, summary.total_amount);
    top_categories.truncate(3);

    SupplierStats {
        supplier: supplier.to_string(),
        total_amount: summary.total_amount,
        count,
        average_amount,
        by_status,
        top_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::InvoiceDraft;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn inv(supplier: &str, amount: i64, category: Category, status: InvoiceStatus) -> Invoice {
        InvoiceDraft {
            supplier: supplier.into(),
            invoice_number: Uuid::new_v4().to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            amount: Decimal::from(amount),
            description: String::new(),
            category,
            status,
        }
        .into_invoice(Uuid::nil())
    }

    #[test]
    fn health_score_moves_with_paid_and_overdue_shares() {
        let d = |v: i64| Decimal::from(v);
        assert_eq!(health_score(d(100), d(100), d(0)), d(100));
        assert_eq!(health_score(d(100), d(0), d(100)), d(0));
        assert_eq!(health_score(d(100), d(50), d(25)), Decimal::new(63, 0));
    }

    #[test]
    fn empty_workspace_has_neutral_score_and_zero_percentages() {
        let stats = global_stats("Empty", &[inv("Zero Ltd", 0, Category::General, InvoiceStatus::Paid)]);
        assert_eq!(stats.total_amount, Decimal::ZERO);
        assert_eq!(stats.health_score, Decimal::from(50));
        assert_eq!(stats.suppliers[0].percent_of_total, Decimal::ZERO);
        assert_eq!(stats.suppliers[0].percent_of_max, Decimal::ZERO);
        assert_eq!(stats.categories[0].percent, Decimal::ZERO);
    }

    #[test]
    fn suppliers_are_grouped_by_normalized_name() {
        let invoices = vec![
            inv("Tech Solutions", 100, Category::Software, InvoiceStatus::Paid),
            inv("  tech solutions ", 50, Category::Software, InvoiceStatus::Pending),
            inv("Service Pro", 300, Category::Services, InvoiceStatus::Overdue),
            inv("   ", 10, Category::General, InvoiceStatus::Paid),
        ];
        let stats = global_stats("Main", &invoices);

        assert_eq!(stats.suppliers.len(), 2);
        assert_eq!(stats.suppliers[0].name, "Service Pro");
        assert_eq!(stats.suppliers[0].percent_of_max, Decimal::ONE_HUNDRED);
        assert_eq!(stats.suppliers[1].name, "Tech Solutions");
        assert_eq!(stats.suppliers[1].amount, Decimal::from(150));
        assert_eq!(stats.suppliers[1].percent_of_max, Decimal::from(50));

        assert_eq!(stats.categories[0].category, Category::Services);
        assert_eq!(stats.categories.len(), 3);
    }

    #[test]
    fn supplier_stats_uses_exact_name_and_keeps_three_categories() {
        let invoices = vec![
            inv("Creative Designs", 100, Category::Services, InvoiceStatus::Paid),
            inv("Creative Designs", 40, Category::Software, InvoiceStatus::Pending),
            inv("Creative Designs", 30, Category::Travel, InvoiceStatus::Pending),
            inv("Creative Designs", 10, Category::Labor, InvoiceStatus::Overdue),
            inv("creative designs", 999, Category::Services, InvoiceStatus::Paid),
        ];
        let stats = supplier_stats("Creative Designs", &invoices);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.total_amount, Decimal::from(180));
        assert_eq!(stats.average_amount, Decimal::from(45));
        assert_eq!(stats.top_categories.len(), 3);
        assert_eq!(stats.top_categories[2].category, Category::Travel);
        let pending = stats
            .by_status
            .iter()
            .find(|b| b.status == InvoiceStatus::Pending)
            .unwrap();
        assert_eq!((pending.count, pending.amount), (2, Decimal::from(70)));
    }

    #[test]
    fn unknown_supplier_yields_zero_average() {
        let stats = supplier_stats("Nobody", &[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_amount, Decimal::ZERO);
    }
}
