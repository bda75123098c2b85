//! Background fetch worker. One statement query runs at a time; issuing
//! a new request aborts the in-flight one, and every event carries the
//! generation of the request that produced it so stale results can be
//! recognized after the fact.

use std::sync::Arc;

use tokio::sync::mpsc;

use cuenta_core::dates::QueryWindow;
use cuenta_core::detail::PaymentDetail;
use cuenta_core::statement::StatementLine;
use cuenta_feed::client::StatementFeed;
use cuenta_feed::error::FetchError;

#[derive(Debug, Clone, Copy)]
pub struct FetchRequest {
    pub generation: u64,
    pub window: QueryWindow,
}

#[derive(Debug)]
pub enum FetchEvent {
    Started {
        generation: u64,
    },
    Loaded {
        generation: u64,
        lines: Vec<StatementLine>,
    },
    Failed {
        generation: u64,
        error: FetchError,
    },
}

impl FetchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FetchEvent::Started { generation }
            | FetchEvent::Loaded { generation, .. }
            | FetchEvent::Failed { generation, .. } => *generation,
        }
    }
}

pub async fn run_fetch_worker<F>(
    feed: Arc<F>,
    mut rx: mpsc::UnboundedReceiver<FetchRequest>,
    tx: mpsc::UnboundedSender<FetchEvent>,
) where
    F: StatementFeed + 'static,
{
    let mut current: Option<tokio::task::JoinHandle<()>> = None;

    while let Some(req) = rx.recv().await {
        // cancel in-flight
        if let Some(h) = current.take() {
            h.abort();
        }

        let feed = Arc::clone(&feed);
        let tx2 = tx.clone();
        current = Some(tokio::spawn(async move {
            let _ = tx2.send(FetchEvent::Started {
                generation: req.generation,
            });

            match feed.fetch_statements(req.window).await {
                Ok(lines) => {
                    let _ = tx2.send(FetchEvent::Loaded {
                        generation: req.generation,
                        lines,
                    });
                }
                Err(error) => {
                    log::error!("statement fetch failed: {error}");
                    let _ = tx2.send(FetchEvent::Failed {
                        generation: req.generation,
                        error,
                    });
                }
            }
        }));
    }
}

/// Spawn the worker on the current runtime. The worker exits once the
/// returned request sender is dropped.
pub fn spawn_fetch_worker<F>(
    feed: Arc<F>,
) -> (
    mpsc::UnboundedSender<FetchRequest>,
    mpsc::UnboundedReceiver<FetchEvent>,
)
where
    F: StatementFeed + 'static,
{
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_fetch_worker(feed, req_rx, ev_tx));
    (req_tx, ev_rx)
}

/// Build the detail for a paid row, looking up its country-specific
/// reference first. The lookup is best-effort; on failure the detail is
/// shown with an empty UUID.
pub async fn resolve_detail<F>(feed: &F, line: &StatementLine) -> PaymentDetail
where
    F: StatementFeed + ?Sized,
{
    let uuid = feed.fetch_uuid(&line.supplier_invoice).await;
    PaymentDetail::from_line(line, uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedFeed {
        // Outcome per call, in order; `None` hangs until aborted.
        script: Vec<Option<Result<Vec<StatementLine>, u16>>>,
        calls: AtomicUsize,
        uuid: String,
    }

    impl ScriptedFeed {
        fn new(script: Vec<Option<Result<Vec<StatementLine>, u16>>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                uuid: "123e4567-e89b-12d3-a456-426614174000".to_string(),
            }
        }
    }

    #[async_trait]
    impl StatementFeed for ScriptedFeed {
        async fn fetch_statements(
            &self,
            _window: QueryWindow,
        ) -> Result<Vec<StatementLine>, FetchError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script[idx].clone() {
                Some(Ok(lines)) => Ok(lines),
                Some(Err(status)) => Err(FetchError::Http {
                    status,
                    body: String::new(),
                }),
                None => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }

        async fn fetch_uuid(&self, _invoice_id: &str) -> String {
            self.uuid.clone()
        }
    }

    fn window() -> QueryWindow {
        QueryWindow {
            start: chrono::NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(),
        }
    }

    fn line(invoice: &str) -> StatementLine {
        StatementLine {
            supplier_invoice: invoice.to_string(),
            ..StatementLine::default()
        }
    }

    #[tokio::test]
    async fn test_worker_reports_started_then_loaded() {
        let feed = Arc::new(ScriptedFeed::new(vec![Some(Ok(vec![line("5105600101")]))]));
        let (req_tx, mut ev_rx) = spawn_fetch_worker(feed);

        req_tx
            .send(FetchRequest {
                generation: 1,
                window: window(),
            })
            .unwrap();

        match ev_rx.recv().await.unwrap() {
            FetchEvent::Started { generation } => assert_eq!(generation, 1),
            other => panic!("expected Started, got {other:?}"),
        }
        match ev_rx.recv().await.unwrap() {
            FetchEvent::Loaded { generation, lines } => {
                assert_eq!(generation, 1);
                assert_eq!(lines[0].supplier_invoice, "5105600101");
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_worker_reports_failure() {
        let feed = Arc::new(ScriptedFeed::new(vec![Some(Err(503))]));
        let (req_tx, mut ev_rx) = spawn_fetch_worker(feed);

        req_tx
            .send(FetchRequest {
                generation: 7,
                window: window(),
            })
            .unwrap();

        assert!(matches!(
            ev_rx.recv().await.unwrap(),
            FetchEvent::Started { generation: 7 }
        ));
        match ev_rx.recv().await.unwrap() {
            FetchEvent::Failed { generation, error } => {
                assert_eq!(generation, 7);
                assert!(matches!(error, FetchError::Http { status: 503, .. }));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_new_request_aborts_hung_fetch() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            None,
            Some(Ok(vec![line("5105600102")])),
        ]));
        let (req_tx, mut ev_rx) = spawn_fetch_worker(feed);

        req_tx
            .send(FetchRequest {
                generation: 1,
                window: window(),
            })
            .unwrap();
        assert!(matches!(
            ev_rx.recv().await.unwrap(),
            FetchEvent::Started { generation: 1 }
        ));

        // First fetch hangs; the second must preempt it.
        req_tx
            .send(FetchRequest {
                generation: 2,
                window: window(),
            })
            .unwrap();
        assert!(matches!(
            ev_rx.recv().await.unwrap(),
            FetchEvent::Started { generation: 2 }
        ));
        match ev_rx.recv().await.unwrap() {
            FetchEvent::Loaded { generation, lines } => {
                assert_eq!(generation, 2);
                assert_eq!(lines[0].supplier_invoice, "5105600102");
            }
            other => panic!("expected Loaded for generation 2, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_detail_carries_uuid() {
        let feed = ScriptedFeed::new(vec![]);
        let mut paid = line("5105600101");
        paid.is_cleared = true;
        paid.transaction_currency = "MXN".to_string();

        let detail = resolve_detail(&feed, &paid).await;
        assert_eq!(detail.supplier_invoice, "5105600101");
        assert_eq!(detail.uuid, "123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(detail.currency, "MXN");
    }
}
