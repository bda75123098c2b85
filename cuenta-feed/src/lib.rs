//! HTTP access to the account-statement backend: the OData v4 statement
//! feed, the OData v2 UUID lookup, and the busy signal raised around
//! in-flight fetches.

pub mod busy;
pub mod client;
pub mod error;

pub use busy::{BusyFlag, BusyGuard};
pub use client::{FeedClient, FeedConfig, StatementFeed};
pub use error::FetchError;
