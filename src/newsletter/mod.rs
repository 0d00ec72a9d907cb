//! Weekly newsletter for AI Inventory subscribers.
//!
//! Every Monday at 09:00 UTC the newest articles are rendered into a
//! [`Digest`] and handed to a [`Mailer`] once per subscriber.

mod digest;
mod mailer;
mod service;

pub use digest::{compose_digest, Digest, DIGEST_SIZE, EMPTY_DIGEST_TEXT};
pub use mailer::{LogMailer, Mailer};
pub use service::{
    next_weekly_send, start_weekly_newsletter, DeliveryReport, NewsletterService,
    WeeklyNewsletter,
};
