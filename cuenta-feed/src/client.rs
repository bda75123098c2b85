//! Client for the two backend feeds: the accounting-document statement
//! feed (OData v4) and the UUID lookup feed (OData v2).

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use cuenta_core::dates::QueryWindow;
use cuenta_core::statement::StatementLine;

use crate::busy::BusyFlag;
use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4004";
pub const DEFAULT_STATEMENT_PATH: &str = "/odata/v4/account-statement/AccountStatement";
pub const DEFAULT_UUID_PATH: &str = "/sap/opu/odata/sap/YY1_UUID_CDS/YY1_UUID";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the feeds live and how long a request may take.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub statement_path: String,
    pub uuid_path: String,
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            statement_path: DEFAULT_STATEMENT_PATH.to_string(),
            uuid_path: DEFAULT_UUID_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Read access to the two feeds. `FeedClient` is the production
/// implementation; tests and alternative shells substitute their own.
#[async_trait]
pub trait StatementFeed: Send + Sync {
    /// Statement lines for a date window. Replaces the previous window
    /// wholesale on success.
    async fn fetch_statements(&self, window: QueryWindow)
    -> Result<Vec<StatementLine>, FetchError>;

    /// Country-specific reference for an invoice. Best-effort: every
    /// failure collapses to an empty string so the detail dialog is
    /// never blocked on this lookup.
    async fn fetch_uuid(&self, invoice_id: &str) -> String;
}

/// HTTP client over the feeds. Session cookies are kept across calls so
/// an ambient backend session keeps working, and the configured timeout
/// applies to every request.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
    busy: BusyFlag,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            config,
            busy: BusyFlag::new(),
        })
    }

    /// Handle to the busy signal raised for the duration of every
    /// statement fetch.
    pub fn busy(&self) -> BusyFlag {
        self.busy.clone()
    }

    async fn get_text(&self, url: &str) -> Result<(u16, String, bool), FetchError> {
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        let ok = status.is_success();
        if !ok {
            let body = resp.text().await.unwrap_or_default();
            return Ok((status.as_u16(), body, false));
        }
        let body = resp.text().await?;
        Ok((status.as_u16(), body, true))
    }

    async fn try_fetch_uuid(&self, invoice_id: &str) -> Result<String, FetchError> {
        let url = uuid_url(&self.config, invoice_id);
        let (status, body, ok) = self.get_text(&url).await?;
        if !ok {
            return Err(FetchError::Http { status, body });
        }
        parse_uuid_body(&body)
    }
}

#[async_trait]
impl StatementFeed for FeedClient {
    async fn fetch_statements(
        &self,
        window: QueryWindow,
    ) -> Result<Vec<StatementLine>, FetchError> {
        // Guard drops on every exit path, aborts included.
        let _busy = self.busy.raise();

        let url = statement_url(&self.config, window);
        log::debug!("statement feed request: {url}");

        let (status, body, ok) = self.get_text(&url).await?;
        if !ok {
            return Err(FetchError::Http { status, body });
        }
        parse_statement_body(&body)
    }

    async fn fetch_uuid(&self, invoice_id: &str) -> String {
        match self.try_fetch_uuid(invoice_id).await {
            Ok(uuid) => uuid,
            Err(FetchError::Http { status, .. }) => {
                log::warn!("UUID not found for document {invoice_id} (HTTP {status})");
                String::new()
            }
            Err(err) => {
                log::error!("UUID lookup failed for document {invoice_id}: {err}");
                String::new()
            }
        }
    }
}

fn statement_url(config: &FeedConfig, window: QueryWindow) -> String {
    format!(
        "{}{}?initDate={}&finalDate={}",
        config.base_url,
        config.statement_path,
        window.start_param(),
        window.end_param()
    )
}

fn uuid_url(config: &FeedConfig, invoice_id: &str) -> String {
    format!(
        "{}{}?$filter=AccountingDocument eq '{}'",
        config.base_url,
        config.uuid_path,
        escape_odata_literal(invoice_id)
    )
}

/// OData string literals double any embedded single quote.
fn escape_odata_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}

fn parse_statement_body(text: &str) -> Result<Vec<StatementLine>, FetchError> {
    let envelope: StatementEnvelope = serde_json::from_str(text)?;
    Ok(envelope.value)
}

fn parse_uuid_body(text: &str) -> Result<String, FetchError> {
    let envelope: UuidEnvelope = serde_json::from_str(text)?;
    Ok(envelope
        .d
        .results
        .into_iter()
        .next()
        .map(|row| row.reference)
        .unwrap_or_default())
}

/// `{ "value": [ ... ] }`; a missing list means an empty window, never an
/// error — the feed omits it for no-result queries.
#[derive(Debug, Deserialize)]
struct StatementEnvelope {
    #[serde(default)]
    value: Vec<StatementLine>,
}

/// `{ "d": { "results": [ { "JrnlEntryCntrySpecificRef1": ... } ] } }`
#[derive(Debug, Deserialize, Default)]
struct UuidEnvelope {
    #[serde(default)]
    d: UuidResults,
}

#[derive(Debug, Deserialize, Default)]
struct UuidResults {
    #[serde(default)]
    results: Vec<UuidRow>,
}

#[derive(Debug, Deserialize)]
struct UuidRow {
    #[serde(
        rename = "JrnlEntryCntrySpecificRef1",
        default,
        deserialize_with = "null_to_empty"
    )]
    reference: String,
}

fn null_to_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}
