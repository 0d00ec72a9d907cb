//! Digest rendering.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::news::ArticleSummary;

/// Number of articles included in a digest.
pub const DIGEST_SIZE: usize = 10;

/// Body used when there is nothing to report.
pub const EMPTY_DIGEST_TEXT: &str = "No news available this week.";

const INTRO: &str = "Here are the latest updates from AI Inventory:";
const OUTRO: &str = "Visit AI Inventory for more.";

/// A rendered newsletter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

/// Render the first [`DIGEST_SIZE`] articles into text and HTML bodies.
///
/// `articles` are expected newest first, as returned by
/// [`latest_summaries`](crate::news::latest_summaries).
pub fn compose_digest(subject: &str, articles: &[ArticleSummary]) -> Digest {
    let articles = &articles[..articles.len().min(DIGEST_SIZE)];

    if articles.is_empty() {
        return Digest {
            subject: subject.to_string(),
            text: EMPTY_DIGEST_TEXT.to_string(),
            html: format!("<b>{EMPTY_DIGEST_TEXT}</b>"),
        };
    }

    let mut text = format!("{INTRO}\n");
    let mut html = format!("<b>{INTRO}</b><ul>");

    for article in articles {
        text.push_str(&format!("- {}\n{}\n", article.title, article.summary));
        if !article.link.is_empty() {
            text.push_str(&format!("{}\n", article.link));
        }

        let title = encode_text(&article.title);
        let heading = if article.link.is_empty() {
            format!("<b>{title}</b>")
        } else {
            format!(
                "<a href=\"{}\"><b>{title}</b></a>",
                encode_double_quoted_attribute(&article.link)
            )
        };
        html.push_str(&format!(
            "<li>{heading}<br/>{}</li>",
            encode_text(&article.summary)
        ));
    }

    text.push_str(OUTRO);
    html.push_str(&format!("</ul><p>{OUTRO}</p>"));

    Digest {
        subject: subject.to_string(),
        text,
        html,
    }
}
