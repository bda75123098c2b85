//! cuenta-core: domain types and pure presentation logic for the
//! account-statement viewer. No I/O lives here — fetching and view
//! orchestration are in `cuenta-feed` and `cuenta-view`.

pub mod dates;
pub mod detail;
pub mod statement;
pub mod summary;
pub mod view;

pub use dates::{DEFAULT_LOOKBACK_DAYS, QueryWindow, resolve, resolve_with_lookback, today_in};
pub use detail::PaymentDetail;
pub use statement::{Severity, StatementLine};
pub use summary::{BalanceSummary, DEFAULT_CURRENCY};
pub use view::{SearchField, StatementGroup, StatementView, ViewFilterState, group_by_status};
