//! Weekly newsletter delivery.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::digest::{compose_digest, Digest};
use super::mailer::Mailer;
use crate::config::NewsletterConfig;
use crate::db::{Database, SubscriberRepository};
use crate::news::{latest_summaries, NewsCache, SummaryStore};
use crate::Result;

/// Hour of the day (UTC) the digest goes out.
const SEND_HOUR: i64 = 9;

/// Result of one newsletter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Recipients the mailer accepted.
    pub sent: usize,
    /// Recipients the mailer rejected.
    pub failed: usize,
}

/// Sends the digest of the latest articles to every subscriber.
pub struct NewsletterService {
    db: Database,
    cache: Arc<NewsCache>,
    store: Option<Arc<dyn SummaryStore>>,
    mailer: Arc<dyn Mailer>,
    subject: String,
}

impl NewsletterService {
    /// Create a service reading subscribers from `db` and articles from `cache`.
    pub fn new(db: Database, cache: Arc<NewsCache>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            cache,
            store: None,
            mailer,
            subject: NewsletterConfig::default().subject,
        }
    }

    /// Read articles from the durable store first.
    pub fn with_store(mut self, store: Option<Arc<dyn SummaryStore>>) -> Self {
        self.store = store;
        self
    }

    /// Set the subject line.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Render the current digest.
    pub async fn digest(&self) -> Digest {
        let articles = latest_summaries(self.store.as_deref(), &self.cache).await;
        compose_digest(&self.subject, &articles)
    }

    /// Send the digest to every subscriber.
    ///
    /// A recipient the mailer rejects is logged and counted; the rest are
    /// still sent. Fails only if the subscriber list cannot be read.
    pub async fn send_weekly(&self) -> Result<DeliveryReport> {
        let recipients = SubscriberRepository::new(self.db.pool())
            .list_emails()
            .await?;

        let mut report = DeliveryReport::default();
        if recipients.is_empty() {
            info!("No subscribers, weekly newsletter not sent");
            return Ok(report);
        }

        let digest = self.digest().await;
        for to in &recipients {
            match self.mailer.send(to, &digest).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("Failed to send newsletter to {}: {}", to, e);
                }
            }
        }

        info!(
            "Weekly newsletter sent to {} subscriber(s), {} failed",
            report.sent, report.failed
        );
        Ok(report)
    }
}

/// Next Monday 09:00 UTC strictly after `now`.
pub fn next_weekly_send(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(days_since_monday);
    let slot = monday.and_time(NaiveTime::default()) + Duration::hours(SEND_HOUR);
    let slot = DateTime::<Utc>::from_naive_utc_and_offset(slot, Utc);

    if slot > now {
        slot
    } else {
        slot + Duration::weeks(1)
    }
}

/// Handle to the weekly newsletter task.
pub struct WeeklyNewsletter {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl WeeklyNewsletter {
    /// Stop the schedule and wait for a send in progress to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            error!("Newsletter task failed: {}", e);
        }
    }
}

/// Send the newsletter every Monday at 09:00 UTC until shut down.
pub fn start_weekly_newsletter(service: Arc<NewsletterService>) -> WeeklyNewsletter {
    let (stop, mut stopped) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = next_weekly_send(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!("Next weekly newsletter at {}", next.to_rfc3339());

            tokio::select! {
                _ = &mut stopped => break,
                _ = tokio::time::sleep(wait) => {}
            }

            if let Err(e) = service.send_weekly().await {
                error!("Weekly newsletter error: {}", e);
            }
        }
        info!("Newsletter schedule stopped");
    });

    WeeklyNewsletter { stop, handle }
}
