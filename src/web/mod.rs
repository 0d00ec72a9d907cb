//! Web API module for AI Inventory.
//!
//! Serves the aggregated AI news and the newsletter signup over HTTP.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::{shutdown_signal, WebServer};
