//! Headless account-statement screen: a synchronous presenter over an
//! async fetch worker, plus the TOML configuration shells wire the two
//! together from.

pub mod config;
pub mod presenter;
pub mod worker;

pub use config::{ViewerConfig, load_config};
pub use presenter::{
    NOT_PAID_NOTICE, QueryError, QueryPhase, RowActivation, StatementPresenter, ViewConfig,
};
pub use worker::{FetchEvent, FetchRequest, resolve_detail, run_fetch_worker, spawn_fetch_worker};
