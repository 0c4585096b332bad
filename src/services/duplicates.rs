// src/services/duplicates.rs
//
// Detector de números de fatura repetidos. É apenas um aviso: compara com a lista
// carregada no momento, não com o banco, e o banco não impõe unicidade.

use uuid::Uuid;

use crate::models::invoice::Invoice;

fn normalize(number: &str) -> String {
    number.trim().to_lowercase()
}

/// Primeira fatura (fora a que está em edição) com o mesmo número,
/// ignorando espaços nas pontas e maiúsculas/minúsculas.
pub fn find_duplicate<'a>(
    invoices: &'a [Invoice],
    candidate: &str,
    exclude: Option<Uuid>,
) -> Option<&'a Invoice> {
    let wanted = normalize(candidate);
    if wanted.is_empty() {
        return None;
    }

    invoices
        .iter()
        .filter(|inv| Some(inv.id) != exclude)
        .find(|inv| normalize(&inv.invoice_number) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{Category, InvoiceDraft, InvoiceStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn invoice(number: &str) -> Invoice {
        InvoiceDraft {
            supplier: "Logistics Hellas".into(),
            invoice_number: number.into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
            amount: Decimal::new(100, 0),
            description: String::new(),
            category: Category::General,
            status: InvoiceStatus::Pending,
        }
        .into_invoice(Uuid::nil())
    }

    #[test]
    fn flags_exactly_the_other_record_with_the_same_number() {
        let list = vec![invoice("A-100"), invoice("b-200"), invoice("C-300")];

        let hit = find_duplicate(&list, "  B-200 ", None).unwrap();
        assert_eq!(hit.id, list[1].id);

        // Editando a própria fatura: não é duplicata de si mesma
        assert!(find_duplicate(&list, "b-200", Some(list[1].id)).is_none());
    }

    #[test]
    fn reports_only_the_first_match() {
        let list = vec![invoice("X-1"), invoice("x-1 ")];
        let hit = find_duplicate(&list, "X-1", None).unwrap();
        assert_eq!(hit.id, list[0].id);

        let hit = find_duplicate(&list, "X-1", Some(list[0].id)).unwrap();
        assert_eq!(hit.id, list[1].id);
    }

    #[test]
    fn blank_candidate_never_matches() {
        let list = vec![invoice(""), invoice("A-1")];
        assert!(find_duplicate(&list, "   ", None).is_none());
        assert!(find_duplicate(&list, "A-2", None).is_none());
    }
}
