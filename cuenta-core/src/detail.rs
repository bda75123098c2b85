//! Payment detail: the one-row projection behind the modal dialog.

use serde::{Deserialize, Serialize};

use crate::statement::StatementLine;

/// Detail for a single cleared line plus its externally resolved UUID.
///
/// Built on demand when a row is activated and discarded when the dialog
/// closes; nothing here outlives the dialog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentDetail {
    pub supplier_invoice: String,
    /// Country-specific journal entry reference; empty when the lookup
    /// found nothing (the dialog still opens).
    pub uuid: String,
    pub reference: String,
    /// Clearing creation date, displayed verbatim.
    pub invoice_date: String,
    pub amount: Option<f64>,
    pub currency: String,
}

impl PaymentDetail {
    pub fn from_line(line: &StatementLine, uuid: impl Into<String>) -> Self {
        Self {
            supplier_invoice: line.supplier_invoice.clone(),
            uuid: uuid.into(),
            reference: line.reference.clone(),
            invoice_date: line.clearing_date.clone(),
            amount: line.amount,
            currency: line.transaction_currency.clone(),
        }
    }
}
