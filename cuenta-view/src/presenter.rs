//! Screen state for the account statement: the fetched collection, the
//! derived balance header, view filters, and the payment-detail dialog.
//!
//! The presenter is synchronous. It issues fetch requests to the worker
//! over a channel and digests the worker's events; every request gets a
//! fresh generation, and events from superseded generations are dropped
//! so a slow old response can never overwrite a newer one.

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;
use tokio::sync::mpsc;

use cuenta_core::dates::{self, DEFAULT_LOOKBACK_DAYS, QueryWindow};
use cuenta_core::detail::PaymentDetail;
use cuenta_core::statement::StatementLine;
use cuenta_core::summary::{BalanceSummary, DEFAULT_CURRENCY};
use cuenta_core::view::{
    SearchField, StatementGroup, StatementView, ViewFilterState, group_by_status,
};
use cuenta_feed::error::FetchError;

use crate::worker::{FetchEvent, FetchRequest};

/// Toast shown when a row without a payment is tapped.
pub const NOT_PAID_NOTICE: &str =
    "Este documento no está pagado, no hay datos que mostrar.";

/// Presentation knobs: which calendar "today" belongs to, the currency
/// shown before any data arrives, and the default query lookback.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub timezone: Tz,
    pub fallback_currency: String,
    pub lookback_days: i64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Mexico_City,
            fallback_currency: DEFAULT_CURRENCY.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Where the current query stands. `Failed` keeps the previously loaded
/// collection on screen; only a successful load replaces it.
#[derive(Debug)]
pub enum QueryPhase {
    Idle,
    Loading { generation: u64 },
    Ready,
    Failed(QueryError),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("background fetch worker is gone")]
    WorkerGone,
}

/// Outcome of tapping a statement row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowActivation {
    /// Paid line: resolve its detail (UUID lookup included) and open the
    /// dialog with the result.
    Detail(StatementLine),
    /// Unpaid line: nothing to show, surface this notice instead.
    Notice(&'static str),
    /// Tap landed outside the visible rows.
    Ignored,
}

pub struct StatementPresenter {
    config: ViewConfig,
    requests: mpsc::UnboundedSender<FetchRequest>,
    generation: u64,
    phase: QueryPhase,
    lines: Vec<StatementLine>,
    summary: BalanceSummary,
    filter: ViewFilterState,
    dialog: Option<PaymentDetail>,
}

impl StatementPresenter {
    pub fn new(config: ViewConfig, requests: mpsc::UnboundedSender<FetchRequest>) -> Self {
        let today = dates::today_in(config.timezone);
        let summary = BalanceSummary::empty(today, &config.fallback_currency);
        Self {
            config,
            requests,
            generation: 0,
            phase: QueryPhase::Idle,
            lines: Vec::new(),
            summary,
            filter: ViewFilterState::default(),
            dialog: None,
        }
    }

    /// Entering the screen: filters go back to their defaults and a query
    /// for the default trailing window is issued.
    pub fn activate(&mut self) {
        self.activate_on(self.today());
    }

    /// `activate` with an explicit business date, for shells and tests
    /// that pin the calendar.
    pub fn activate_on(&mut self, today: NaiveDate) {
        self.filter = ViewFilterState::default();
        self.dialog = None;
        let window = dates::resolve_with_lookback(None, None, today, self.config.lookback_days);
        self.begin_query(window);
    }

    /// The date-range control changed. A complete pair queries exactly
    /// that window; a half-filled picker is ignored.
    pub fn pick_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        if let (Some(from), Some(to)) = (from, to) {
            self.begin_query(QueryWindow {
                start: from,
                end: to,
            });
        }
    }

    /// The period popover's confirm action: an explicit pair queries that
    /// window, anything less re-queries the default trailing window.
    pub fn consult_period(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.consult_period_on(from, to, self.today());
    }

    pub fn consult_period_on(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) {
        let window = match (from, to) {
            (Some(from), Some(to)) => QueryWindow {
                start: from,
                end: to,
            },
            _ => dates::resolve_with_lookback(None, None, today, self.config.lookback_days),
        };
        self.begin_query(window);
    }

    fn begin_query(&mut self, window: QueryWindow) {
        self.generation += 1;
        self.filter.date_range = Some(window);
        let req = FetchRequest {
            generation: self.generation,
            window,
        };
        if self.requests.send(req).is_err() {
            self.phase = QueryPhase::Failed(QueryError::WorkerGone);
            return;
        }
        self.phase = QueryPhase::Loading {
            generation: self.generation,
        };
    }

    /// Digest one worker event. Events carrying a generation other than
    /// the latest are from superseded queries and are dropped whole.
    pub fn apply_event(&mut self, event: FetchEvent) {
        let generation = event.generation();
        if generation != self.generation {
            log::debug!(
                "dropping stale fetch event (generation {generation}, current {})",
                self.generation
            );
            return;
        }
        match event {
            FetchEvent::Started { .. } => {}
            FetchEvent::Loaded { lines, .. } => {
                // The header is dated the day the data arrived, not the
                // end of the queried window.
                let as_of = self.today();
                self.summary =
                    BalanceSummary::from_lines(&lines, as_of, &self.config.fallback_currency);
                self.lines = lines;
                self.phase = QueryPhase::Ready;
            }
            FetchEvent::Failed { error, .. } => {
                self.phase = QueryPhase::Failed(QueryError::Fetch(error));
            }
        }
    }

    /// Radio selection between pending / paid / everything. The search
    /// text stays; both filters apply together.
    pub fn select_view(&mut self, mode: StatementView) {
        self.filter.mode = mode;
    }

    pub fn search(&mut self, field: SearchField, text: &str) {
        self.filter.search_field = field;
        self.filter.search_text = text.to_string();
    }

    /// Tap on the `index`-th visible row. Paid rows hand back the line so
    /// the caller can resolve and open its detail; unpaid rows produce a
    /// notice; anything out of range is ignored.
    pub fn tap_row(&self, index: usize) -> RowActivation {
        let visible = self.filter.visible(&self.lines);
        let Some(line) = visible.get(index).copied() else {
            return RowActivation::Ignored;
        };
        if line.is_cleared {
            RowActivation::Detail(line.clone())
        } else {
            RowActivation::Notice(NOT_PAID_NOTICE)
        }
    }

    pub fn open_detail(&mut self, detail: PaymentDetail) {
        self.dialog = Some(detail);
    }

    pub fn close_detail(&mut self) {
        self.dialog = None;
    }

    pub fn phase(&self) -> &QueryPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, QueryPhase::Loading { .. })
    }

    /// The full fetched collection, unfiltered.
    pub fn lines(&self) -> &[StatementLine] {
        &self.lines
    }

    /// Rows visible under the current mode and search, in fetch order.
    pub fn visible(&self) -> Vec<&StatementLine> {
        self.filter.visible(&self.lines)
    }

    /// Visible rows grouped for display: pending first, then paid.
    pub fn grouped(&self) -> Vec<StatementGroup<'_>> {
        group_by_status(&self.filter.visible(&self.lines))
    }

    pub fn summary(&self) -> &BalanceSummary {
        &self.summary
    }

    pub fn filter(&self) -> &ViewFilterState {
        &self.filter
    }

    pub fn dialog(&self) -> Option<&PaymentDetail> {
        self.dialog.as_ref()
    }

    pub fn date_range_visible(&self) -> bool {
        self.filter.date_range_visible()
    }

    fn today(&self) -> NaiveDate {
        dates::today_in(self.config.timezone)
    }
}
