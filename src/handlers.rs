pub mod auth;
pub mod invoices;
pub mod reports;
pub mod system;
pub mod transfer;
pub mod workspaces;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::invoice::{is_valid_amount, MAX_AMOUNT};

// ---
// Validações customizadas compartilhadas pelos payloads
// ---
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if !is_valid_amount(*val) {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &MAX_AMOUNT.to_string());
        err.message = Some(format!("O valor deve ser maior que zero e no máximo {}.", MAX_AMOUNT).into());
        return Err(err);
    }
    Ok(())
}
