//! View-side filtering and grouping of the fetched statement window.
//!
//! Filtering is presentation state only: it narrows what is visible but
//! never touches the stored collection or the balance summary.

use serde::{Deserialize, Serialize};

use crate::dates::QueryWindow;
use crate::statement::StatementLine;

/// Three-way visibility toggle over the fetched lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatementView {
    /// Only lines that have not cleared. Spans all time conceptually, so
    /// the date-range control is hidden.
    Pending,
    /// Only cleared lines; date-range control hidden as well.
    Cleared,
    /// Everything fetched; date filtering matters again.
    All,
}

impl StatementView {
    /// Map the shell's radio-button index (0/1/2) onto a mode.
    pub fn from_radio_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(StatementView::Pending),
            1 => Some(StatementView::Cleared),
            2 => Some(StatementView::All),
            _ => None,
        }
    }

    /// Whether a line passes this mode.
    pub fn admits(&self, line: &StatementLine) -> bool {
        match self {
            StatementView::Pending => !line.is_cleared,
            StatementView::Cleared => line.is_cleared,
            StatementView::All => true,
        }
    }

    /// The date-range control only matters when everything is shown.
    pub fn date_range_visible(&self) -> bool {
        matches!(self, StatementView::All)
    }
}

/// Field key the search box matches against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SearchField {
    SupplierInvoice,
    ClearingDocument,
    Reference,
    Currency,
    DocumentType,
}

impl SearchField {
    /// The line's value at this field.
    pub fn value_of<'a>(&self, line: &'a StatementLine) -> &'a str {
        match self {
            SearchField::SupplierInvoice => &line.supplier_invoice,
            SearchField::ClearingDocument => &line.clearing_document,
            SearchField::Reference => &line.reference,
            SearchField::Currency => &line.document_currency,
            SearchField::DocumentType => &line.document_type,
        }
    }
}

/// Mutable view state: mode, field-keyed search, and the active window.
///
/// Mode and search compose as a logical AND; switching mode does not
/// reset the search text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewFilterState {
    pub mode: StatementView,
    pub search_field: SearchField,
    pub search_text: String,
    pub date_range: Option<QueryWindow>,
}

impl Default for ViewFilterState {
    fn default() -> Self {
        Self {
            mode: StatementView::All,
            search_field: SearchField::SupplierInvoice,
            search_text: String::new(),
            date_range: None,
        }
    }
}

impl ViewFilterState {
    /// True when the line is visible under the current mode AND search.
    pub fn matches(&self, line: &StatementLine) -> bool {
        self.mode.admits(line) && self.matches_search(line)
    }

    /// Case-insensitive substring containment on the selected field; an
    /// empty search text matches everything.
    fn matches_search(&self, line: &StatementLine) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let haystack = self.search_field.value_of(line).to_lowercase();
        haystack.contains(&self.search_text.to_lowercase())
    }

    /// Visible subset of a fetched collection, in stored order.
    pub fn visible<'a>(&self, lines: &'a [StatementLine]) -> Vec<&'a StatementLine> {
        lines.iter().filter(|l| self.matches(l)).collect()
    }

    pub fn date_range_visible(&self) -> bool {
        self.mode.date_range_visible()
    }
}

/// One display group of the default sort: a header label plus its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementGroup<'a> {
    /// "Pendientes" or "Pagadas".
    pub label: &'static str,
    pub lines: Vec<&'a StatementLine>,
}

/// Default sort for the bound view: pending lines group before cleared
/// ones, keeping fetch order inside each group. Empty groups are omitted.
/// The stored collection itself is never reordered.
pub fn group_by_status<'a>(visible: &[&'a StatementLine]) -> Vec<StatementGroup<'a>> {
    let pending: Vec<&StatementLine> = visible.iter().copied().filter(|l| !l.is_cleared).collect();
    let cleared: Vec<&StatementLine> = visible.iter().copied().filter(|l| l.is_cleared).collect();

    let mut groups = Vec::new();
    if !pending.is_empty() {
        groups.push(StatementGroup {
            label: "Pendientes",
            lines: pending,
        });
    }
    if !cleared.is_empty() {
        groups.push(StatementGroup {
            label: "Pagadas",
            lines: cleared,
        });
    }
    groups
}
