//! Date-window resolution for statement queries.
//!
//! Windows are plain calendar dates end to end: serialization is a pure
//! `%Y-%m-%d` format and can never shift a day. "Today" is taken in a
//! configured business timezone rather than whatever the host clock says.

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Trailing window applied when the caller picks no start date.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Inclusive date interval a statement query covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl QueryWindow {
    /// `initDate` request parameter, canonical `YYYY-MM-DD`.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `finalDate` request parameter, canonical `YYYY-MM-DD`.
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Resolve a requested interval with the default lookback.
///
/// A missing end falls back to `today`; a missing start falls back to the
/// trailing lookback window before the end. `start <= end` is deliberately
/// not enforced — an inverted range goes to the provider as-is, which
/// answers it with an empty (or provider-defined) result.
pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> QueryWindow {
    resolve_with_lookback(from, to, today, DEFAULT_LOOKBACK_DAYS)
}

/// Same as [`resolve`] with a caller-chosen lookback.
pub fn resolve_with_lookback(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
    lookback_days: i64,
) -> QueryWindow {
    let end = to.unwrap_or(today);
    let start = from.unwrap_or(end - Duration::days(lookback_days));
    QueryWindow { start, end }
}

/// Today's calendar date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parse an IANA timezone like "America/Mexico_City".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}
