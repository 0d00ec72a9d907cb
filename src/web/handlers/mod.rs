//! API handlers for Web API.

pub mod news;
pub mod newsletter;
mod state;

pub use news::*;
pub use newsletter::*;
pub use state::AppState;
