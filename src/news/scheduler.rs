//! Background refresh of the news cache.
//!
//! Runs an aggregation pass immediately and then on a fixed interval. Each
//! pass runs in its own task so a failing or panicking pass never stops the
//! schedule. Passes are owned by the scheduler and are cancelled before
//! [`NewsUpdater::shutdown`] returns.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::news::aggregator::{Aggregator, RefreshOutcome};
use crate::Result;

/// Default refresh interval in seconds (15 minutes).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

/// Periodic trigger for [`Aggregator::refresh`].
pub struct NewsScheduler {
    aggregator: Arc<Aggregator>,
    refresh_interval: Duration,
}

impl NewsScheduler {
    /// Create a scheduler with the default interval.
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            aggregator,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        }
    }

    /// Create a scheduler with a custom interval.
    pub fn with_interval(aggregator: Arc<Aggregator>, refresh_interval: Duration) -> Self {
        Self {
            aggregator,
            refresh_interval,
        }
    }

    /// Run the scheduler loop until `shutdown` completes.
    ///
    /// The first tick fires immediately, which gives the startup pass. Passes
    /// still running when `shutdown` completes are aborted and awaited.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "News scheduler started (interval: {} seconds, {} feed(s))",
            self.refresh_interval.as_secs(),
            self.aggregator.feeds().len()
        );

        let mut timer = interval(self.refresh_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut passes = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = timer.tick() => {
                    let aggregator = Arc::clone(&self.aggregator);
                    passes.spawn(async move { aggregator.refresh().await });
                }
                Some(joined) = passes.join_next(), if !passes.is_empty() => {
                    log_pass(joined);
                }
            }
        }

        if !passes.is_empty() {
            debug!("Cancelling {} in-flight pass(es)", passes.len());
        }
        passes.shutdown().await;
        info!("News scheduler stopped");
    }
}

fn log_pass(joined: std::result::Result<Result<RefreshOutcome>, JoinError>) {
    match joined {
        Ok(Ok(RefreshOutcome::Refreshed(count))) => {
            debug!("Scheduled pass stored {} article(s)", count);
        }
        Ok(Ok(RefreshOutcome::Skipped)) => {
            debug!("Scheduled pass skipped, previous pass still running");
        }
        Ok(Err(e)) => error!("Error updating AI news cache: {}", e),
        Err(e) => error!("AI news update task failed: {}", e),
    }
}

/// Handle to a running news scheduler.
pub struct NewsUpdater {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl NewsUpdater {
    /// Stop scheduling and wait until no pass is running.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            error!("News scheduler task failed: {}", e);
        }
    }
}

/// Start the news scheduler as a background task.
pub fn start_news_updater(aggregator: Arc<Aggregator>, refresh_interval: Duration) -> NewsUpdater {
    let (stop, stopped) = oneshot::channel::<()>();
    let scheduler = NewsScheduler::with_interval(aggregator, refresh_interval);
    let handle = tokio::spawn(async move {
        scheduler
            .run_until(async {
                let _ = stopped.await;
            })
            .await;
    });

    NewsUpdater { stop, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::fetcher::FeedReader;
    use crate::news::types::{ParsedFeed, RawFeedItem};
    use crate::InventoryError;
    use axum::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingReader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedReader for CountingReader {
        async fn fetch(&self, _url: &str) -> Result<ParsedFeed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ParsedFeed {
                title: Some("Feed".to_string()),
                items: vec![RawFeedItem::new("item")],
            })
        }
    }

    /// Panics on the first call, errors on the second, then succeeds.
    struct FlakyReader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FeedReader for FlakyReader {
        async fn fetch(&self, _url: &str) -> Result<ParsedFeed> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => panic!("feed parser crashed"),
                1 => Err(InventoryError::FeedFetch("connection reset".to_string())),
                _ => Ok(ParsedFeed {
                    title: Some("Feed".to_string()),
                    items: vec![RawFeedItem::new("recovered")],
                }),
            }
        }
    }

    /// Never finishes; records when its fetch future is dropped.
    struct HangingReader {
        started: AtomicBool,
        dropped: Arc<AtomicBool>,
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl FeedReader for HangingReader {
        async fn fetch(&self, _url: &str) -> Result<ParsedFeed> {
            let _guard = SetOnDrop(Arc::clone(&self.dropped));
            self.started.store(true, Ordering::SeqCst);
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    fn aggregator(reader: Arc<dyn FeedReader>) -> Arc<Aggregator> {
        Arc::new(Aggregator::new(
            vec!["https://feed.example/rss".to_string()],
            reader,
        ))
    }

    #[test]
    fn test_scheduler_default_interval() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let scheduler = NewsScheduler::new(aggregator(reader));
        assert_eq!(
            scheduler.refresh_interval,
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)
        );
    }

    #[tokio::test]
    async fn test_startup_pass_runs_immediately() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let aggregator = aggregator(reader.clone());
        let updater = start_news_updater(Arc::clone(&aggregator), Duration::from_secs(3600));

        let mut populated = false;
        for _ in 0..100 {
            if aggregator.cache().last_updated().await.is_some() {
                populated = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        updater.shutdown().await;

        assert!(populated);
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_repeat_on_interval() {
        let reader = Arc::new(CountingReader {
            calls: AtomicUsize::new(0),
        });
        let updater = start_news_updater(aggregator(reader.clone()), Duration::from_secs(60));

        // Paused clock auto-advances while the runtime is idle
        tokio::time::sleep(Duration::from_secs(150)).await;
        updater.shutdown().await;

        assert_eq!(reader.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_survives_panicking_and_failing_passes() {
        let reader = Arc::new(FlakyReader {
            calls: AtomicUsize::new(0),
        });
        let aggregator = aggregator(reader.clone());
        let updater = start_news_updater(Arc::clone(&aggregator), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(reader.calls.load(Ordering::SeqCst), 1);
        assert!(aggregator.cache().last_updated().await.is_none());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(reader.calls.load(Ordering::SeqCst), 2);
        assert!(aggregator.cache().last_updated().await.is_none());

        tokio::time::sleep(Duration::from_secs(60)).await;
        updater.shutdown().await;

        assert_eq!(reader.calls.load(Ordering::SeqCst), 3);
        let snapshot = aggregator.cache().snapshot().await;
        assert_eq!(snapshot.articles.len(), 1);
        assert_eq!(snapshot.articles[0].title, "recovered");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_pass() {
        let dropped = Arc::new(AtomicBool::new(false));
        let reader = Arc::new(HangingReader {
            started: AtomicBool::new(false),
            dropped: Arc::clone(&dropped),
        });
        let updater = start_news_updater(aggregator(reader.clone()), Duration::from_secs(3600));

        for _ in 0..100 {
            if reader.started.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(reader.started.load(Ordering::SeqCst));
        assert!(!dropped.load(Ordering::SeqCst));

        updater.shutdown().await;

        assert!(dropped.load(Ordering::SeqCst));
    }
}
