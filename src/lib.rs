//! AI Inventory backend.
//!
//! Aggregates AI news from RSS and Atom feeds on a schedule and serves the
//! newest articles, alongside a newsletter signup, over an HTTP API. Subscribers
//! can receive a weekly digest of the latest articles.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod news;
pub mod newsletter;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{InventoryError, Result};
