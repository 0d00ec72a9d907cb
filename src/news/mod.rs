//! AI news aggregation.
//!
//! Feeds are fetched and merged by the [`Aggregator`] on a schedule. The
//! newest articles are kept in two tiers: a durable [`SummaryStore`] and an
//! in-process [`NewsCache`]. Reads go through [`latest_summaries`].

pub mod aggregator;
pub mod cache;
pub mod fetcher;
pub mod image;
pub mod parser;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod types;

pub use aggregator::{normalize_feed, rank, Aggregator, RefreshOutcome};
pub use cache::{CacheSnapshot, NewsCache};
pub use fetcher::{FeedReader, HttpFeedReader};
pub use image::extract_image;
pub use parser::{parse_feed, strip_html};
pub use repository::{ArticleRepository, SummaryStore};
pub use scheduler::{
    start_news_updater, NewsScheduler, NewsUpdater, DEFAULT_REFRESH_INTERVAL_SECS,
};
pub use service::latest_summaries;
pub use types::{
    parse_pub_date, ArticleDraft, ArticleSummary, ParsedFeed, RawFeedItem, DEFAULT_TOP_N,
    SUMMARY_PLACEHOLDER,
};
