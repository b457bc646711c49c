//! Reply envelopes returned by the inference service.
//!
//! The service wraps every reply in a small JSON object. Chat replies carry
//! `response`; document suggestions carry `suggestions.summary` or
//! `suggestions.explanation` (older deployments send `concepts` instead).
//! Any reply may carry `error` in place of content.

use serde::Deserialize;

use crate::config::Config;
use crate::escape::escape_html;
use crate::reply_to_html_with_config;

pub const SUMMARY_UNAVAILABLE: &str = "Summary not available.";
pub const EXPLANATION_UNAVAILABLE: &str = "Explanation not available.";

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("invalid reply body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Service(String),
    #[error("reply is missing `{0}`")]
    MissingField(&'static str),
}

/// Which reply field a body is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Chat,
    Summary,
    Explanation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    response: Option<String>,
    suggestions: Option<Suggestions>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Suggestions {
    summary: Option<String>,
    explanation: Option<String>,
    concepts: Option<String>,
}

/// Pull the raw reply text out of a response body.
pub fn extract_reply(body: &str, kind: ReplyKind) -> Result<String, ReplyError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if let Some(message) = non_empty(envelope.error) {
        return Err(ReplyError::Service(message));
    }

    let suggestions = envelope.suggestions.unwrap_or_default();
    match kind {
        ReplyKind::Chat => envelope.response.ok_or(ReplyError::MissingField("response")),
        ReplyKind::Summary => Ok(non_empty(suggestions.summary)
            .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string())),
        ReplyKind::Explanation => Ok(non_empty(suggestions.explanation)
            .or_else(|| non_empty(suggestions.concepts))
            .unwrap_or_else(|| EXPLANATION_UNAVAILABLE.to_string())),
    }
}

/// The service sends `""` for fields it has nothing for.
pub(crate) fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Inline message shown in place of a reply that could not be rendered.
pub fn error_block(kind: ReplyKind, err: &ReplyError) -> String {
    match kind {
        ReplyKind::Chat => "Error generating response. Please try again later.".to_string(),
        ReplyKind::Summary => format!(
            "Error generating summary: {}. Please try again later.",
            escape_html(&err.to_string())
        ),
        ReplyKind::Explanation => format!(
            "Error generating explanation: {}. Please try again later.",
            escape_html(&err.to_string())
        ),
    }
}

/// Extract and format a reply body, substituting an error block on failure.
pub fn render_reply(body: &str, kind: ReplyKind, config: &Config) -> String {
    match extract_reply(body, kind) {
        Ok(reply) => reply_to_html_with_config(&reply, config),
        Err(err) => {
            tracing::warn!(?kind, error = %err, "reply could not be extracted");
            error_block(kind, &err)
        }
    }
}

/// Wrap a fragment in the chat's message container.
pub fn bot_message(fragment: &str) -> String {
    format!("<div class=\"bot-message\">{fragment}</div>")
}
