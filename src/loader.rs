//! Document loading and periodic background refresh
//!
//! The loader owns the refresh lifecycle: a synchronous-feeling `load()`
//! for startup and manual refresh, and a cancellable periodic task for
//! background refresh. Rebuild triggers are serialized so a manual load
//! racing a periodic cycle cannot interleave index rebuilds; the published
//! snapshot is only ever replaced wholesale by the engine.

use crate::fetch::{FetchOutcome, FetchResult, MessageFetcher};
use crate::search::SearchEngine;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Bounded wait for the in-flight cycle when stopping.
const STOP_GRACE: Duration = Duration::from_secs(1);

/// Drives the fetcher and hands the result to the search engine.
pub struct DataLoader {
    fetcher: Arc<MessageFetcher>,
    engine: Arc<SearchEngine>,
    refresh_interval: Option<Duration>,

    /// Serializes rebuild triggers across manual and periodic refresh.
    rebuild_lock: Arc<tokio::sync::Mutex<()>>,

    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DataLoader {
    /// `refresh_interval` of `None` or zero disables periodic refresh.
    pub fn new(
        fetcher: Arc<MessageFetcher>,
        engine: Arc<SearchEngine>,
        refresh_interval: Option<Duration>,
    ) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            fetcher,
            engine,
            refresh_interval: refresh_interval.filter(|d| !d.is_zero()),
            rebuild_lock: Arc::new(tokio::sync::Mutex::new(())),
            stop_tx,
            task: Mutex::new(None),
        }
    }

    /// Fetch once and rebuild the index. Returns the indexed count.
    ///
    /// Degraded fetches (auth denial, exhausted retries) still rebuild from
    /// the partial result; only a shape error propagates, leaving the
    /// previous snapshot untouched.
    pub async fn load(&self) -> FetchResult<usize> {
        let _guard = self.rebuild_lock.lock().await;
        Self::refresh(&self.fetcher, &self.engine).await
    }

    async fn refresh(fetcher: &MessageFetcher, engine: &SearchEngine) -> FetchResult<usize> {
        let outcome = fetcher.fetch_all(None).await?;
        match &outcome {
            FetchOutcome::Complete(_) => {}
            FetchOutcome::AuthDenied { collected } => {
                warn!(
                    collected = collected.len(),
                    "fetch stopped by auth denial; indexing partial result"
                );
            }
            FetchOutcome::RetriesExhausted { collected } => {
                warn!(
                    collected = collected.len(),
                    "fetch stopped after exhausting retries; indexing partial result"
                );
            }
        }
        Ok(engine.rebuild(outcome.into_documents()))
    }

    /// Begin the repeating refresh cycle. No-op when periodic refresh is
    /// disabled or a cycle task is already running.
    pub fn start_periodic(&self) {
        let Some(interval) = self.refresh_interval else {
            info!("periodic refresh disabled");
            return;
        };

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        // Allow a restart after a previous stop().
        self.stop_tx.send_replace(false);
        let mut stop_rx = self.stop_tx.subscribe();

        let fetcher = self.fetcher.clone();
        let engine = self.engine.clone();
        let rebuild_lock = self.rebuild_lock.clone();

        info!(interval_secs = interval.as_secs(), "starting periodic refresh");
        *task = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        let _guard = rebuild_lock.lock().await;
                        match Self::refresh(&fetcher, &engine).await {
                            Ok(indexed) => info!(indexed, "refresh cycle complete"),
                            // A failed cycle leaves the previous snapshot
                            // intact; the next cycle retries independently.
                            Err(e) => error!(error = %e, "refresh cycle failed"),
                        }
                    }
                    changed = stop_rx.changed() => {
                        // A closed channel means the loader itself is gone.
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        }));
    }

    /// Signal cancellation and wait, bounded, for the in-flight cycle. An
    /// in-progress fetch is not aborted; it is bounded by its own timeout
    /// and retry budget.
    pub async fn stop(&self) {
        let _ = self.stop_tx.send(true);

        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if tokio::time::timeout(STOP_GRACE, handle).await.is_err() {
                warn!(
                    grace_secs = STOP_GRACE.as_secs(),
                    "refresh task did not finish within the stop grace period"
                );
            }
        }
    }

    /// Whether the periodic task is currently running.
    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}
