//! Outstanding-balance summary derived from a fetched statement window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::statement::StatementLine;

/// Currency shown when the window is empty or the feed omitted one.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Derived header values: balance as of a date, in one currency.
///
/// Recomputed from the full fetched collection after every successful
/// query; view filters never feed into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSummary {
    pub as_of: NaiveDate,
    pub total_outstanding: f64,
    pub currency: String,
}

impl BalanceSummary {
    /// Zero balance in the fallback currency, for the initial view.
    pub fn empty(as_of: NaiveDate, fallback_currency: &str) -> Self {
        Self {
            as_of,
            total_outstanding: 0.0,
            currency: fallback_currency.to_string(),
        }
    }

    /// Sum of amounts over lines that have not cleared; absent amounts
    /// count as zero. Currency comes from the first line when it carries
    /// one, otherwise the fallback.
    pub fn from_lines(lines: &[StatementLine], as_of: NaiveDate, fallback_currency: &str) -> Self {
        let total_outstanding = lines
            .iter()
            .filter(|l| !l.is_cleared)
            .map(|l| l.amount_or_zero())
            .sum();

        let currency = lines
            .first()
            .map(|l| l.document_currency.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(fallback_currency)
            .to_string();

        Self {
            as_of,
            total_outstanding,
            currency,
        }
    }

    /// As-of date the way the header renders it: `dd/mm/yyyy`.
    pub fn as_of_display(&self) -> String {
        self.as_of.format("%d/%m/%Y").to_string()
    }
}
