//! Outbound mail seam.

use axum::async_trait;
use tracing::info;

use super::digest::Digest;
use crate::Result;

/// Delivers a digest to one recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand `digest` off for delivery to `to`.
    async fn send(&self, to: &str, digest: &Digest) -> Result<()>;
}

/// Mailer that only logs what it would send.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, digest: &Digest) -> Result<()> {
        info!(
            "Newsletter \"{}\" for {} ({} bytes text, {} bytes html)",
            digest.subject,
            to,
            digest.text.len(),
            digest.html.len()
        );
        Ok(())
    }
}
