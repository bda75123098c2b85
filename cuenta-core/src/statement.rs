//! Statement line items as delivered by the accounting-document feed.
//!
//! Field names map 1:1 to the OData properties of the statement service.
//! The feed is lenient about absent values (`null` or missing keys), and
//! the amount arrives as either a JSON number or a decimal string, so the
//! deserializers here normalize all of that instead of failing the fetch.

use serde::{Deserialize, Deserializer, Serialize};

/// One accounting record: an outstanding invoice or a completed payment.
///
/// Immutable once fetched; a new query replaces the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StatementLine {
    /// Supplier invoice document id (shown while the line is pending).
    #[serde(rename = "SupplierInvoice", default, deserialize_with = "null_to_empty")]
    pub supplier_invoice: String,
    /// Clearing document id (shown once the line is paid).
    #[serde(
        rename = "ClearingAccountingDocument",
        default,
        deserialize_with = "null_to_empty"
    )]
    pub clearing_document: String,
    /// True once the payment cleared.
    #[serde(rename = "IsCleared", default, deserialize_with = "null_to_false")]
    pub is_cleared: bool,
    /// Signed amount in transaction currency. The feed emits this as a
    /// string or a number; unparseable or absent values become `None`.
    #[serde(
        rename = "AmountInTransactionCurrency",
        default,
        deserialize_with = "lenient_amount"
    )]
    pub amount: Option<f64>,
    /// Currency of the document (drives the balance summary).
    #[serde(rename = "DocumentCurrency", default, deserialize_with = "null_to_empty")]
    pub document_currency: String,
    /// Currency of the transaction (shown in the payment detail).
    #[serde(rename = "TransactionCurrency", default, deserialize_with = "null_to_empty")]
    pub transaction_currency: String,
    /// Free-form reference id.
    #[serde(rename = "DocumentReferenceID", default, deserialize_with = "null_to_empty")]
    pub reference: String,
    /// Clearing creation date, passed through verbatim for display.
    #[serde(rename = "ClearingCreationDate", default, deserialize_with = "null_to_empty")]
    pub clearing_date: String,
    /// Accounting document type code ("ZP", "KZ", "RE", ...).
    #[serde(
        rename = "AccountingDocumentType",
        default,
        deserialize_with = "null_to_empty"
    )]
    pub document_type: String,
}

/// Visual severity of a line's status, for the shell to map onto styling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl StatementLine {
    /// Amount with the feed's leniency applied: absent counts as zero.
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Status label: "Pagada" for cleared lines, "Pendiente" otherwise.
    pub fn status_label(&self) -> &'static str {
        if self.is_cleared { "Pagada" } else { "Pendiente" }
    }

    /// Visual severity: cleared reads as success, pending as error.
    pub fn status_severity(&self) -> Severity {
        if self.is_cleared {
            Severity::Success
        } else {
            Severity::Error
        }
    }

    /// Document number to display: the clearing document once paid, the
    /// supplier invoice while pending. Empty when the feed omitted the id.
    pub fn display_document_number(&self) -> &str {
        if self.is_cleared {
            &self.clearing_document
        } else {
            &self.supplier_invoice
        }
    }

    /// Normalized document type from the type code: "ZP" and "KZ" are
    /// payments, "RE" is an invoice, anything else passes through.
    pub fn type_label(&self) -> &str {
        match self.document_type.as_str() {
            "ZP" | "KZ" => "PAGO",
            "RE" => "FACTURA",
            other => other,
        }
    }

    /// Coarser type label derived from the cleared flag alone.
    pub fn type_label_by_status(&self) -> &'static str {
        if self.is_cleared { "PAGO" } else { "FACTURA" }
    }

    /// Grouping header the line sorts under: "Pagadas" / "Pendientes".
    pub fn group_label(&self) -> &'static str {
        if self.is_cleared { "Pagadas" } else { "Pendientes" }
    }
}

fn null_to_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

fn null_to_false<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(de)?.unwrap_or_default())
}

fn lenient_amount<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cleared: bool) -> StatementLine {
        StatementLine {
            supplier_invoice: "5105600101".to_string(),
            clearing_document: "1400000023".to_string(),
            is_cleared: cleared,
            amount: Some(150.0),
            document_currency: "MXN".to_string(),
            transaction_currency: "MXN".to_string(),
            reference: "A-778".to_string(),
            clearing_date: "2026-02-10".to_string(),
            document_type: "RE".to_string(),
        }
    }

    #[test]
    fn test_deserialize_number_amount() {
        let json = r#"{
            "SupplierInvoice": "5105600101",
            "IsCleared": false,
            "AmountInTransactionCurrency": 1250.75,
            "DocumentCurrency": "MXN"
        }"#;
        let parsed: StatementLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.amount, Some(1250.75));
        assert_eq!(parsed.document_currency, "MXN");
        assert!(!parsed.is_cleared);
        // omitted keys collapse to empty strings
        assert_eq!(parsed.clearing_document, "");
        assert_eq!(parsed.reference, "");
    }

    #[test]
    fn test_deserialize_string_amount() {
        let json = r#"{"AmountInTransactionCurrency": "99.90"}"#;
        let parsed: StatementLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.amount, Some(99.90));
    }

    #[test]
    fn test_deserialize_null_and_garbage() {
        let json = r#"{
            "SupplierInvoice": null,
            "IsCleared": null,
            "AmountInTransactionCurrency": "n/a",
            "ClearingAccountingDocument": null
        }"#;
        let parsed: StatementLine = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.supplier_invoice, "");
        assert!(!parsed.is_cleared);
        assert_eq!(parsed.amount, None);
        assert_eq!(parsed.amount_or_zero(), 0.0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(line(true).status_label(), "Pagada");
        assert_eq!(line(false).status_label(), "Pendiente");
        assert_eq!(line(true).status_severity(), Severity::Success);
        assert_eq!(line(false).status_severity(), Severity::Error);
        assert_eq!(line(true).group_label(), "Pagadas");
        assert_eq!(line(false).group_label(), "Pendientes");
    }

    #[test]
    fn test_display_document_number_by_status() {
        assert_eq!(line(true).display_document_number(), "1400000023");
        assert_eq!(line(false).display_document_number(), "5105600101");

        let blank = StatementLine {
            is_cleared: true,
            ..StatementLine::default()
        };
        assert_eq!(blank.display_document_number(), "");
    }

    #[test]
    fn test_type_label_mapping() {
        let mut l = line(false);
        l.document_type = "ZP".to_string();
        assert_eq!(l.type_label(), "PAGO");
        l.document_type = "KZ".to_string();
        assert_eq!(l.type_label(), "PAGO");
        l.document_type = "RE".to_string();
        assert_eq!(l.type_label(), "FACTURA");
        l.document_type = "XX".to_string();
        assert_eq!(l.type_label(), "XX");
        l.document_type = String::new();
        assert_eq!(l.type_label(), "");
    }

    #[test]
    fn test_type_label_by_status() {
        assert_eq!(line(true).type_label_by_status(), "PAGO");
        assert_eq!(line(false).type_label_by_status(), "FACTURA");
    }
}
