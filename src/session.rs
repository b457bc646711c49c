//! Caller-held state for the document viewer.
//!
//! The chat glue owns one [`DocumentSession`] and passes it explicitly; the
//! formatter itself never sees it.

use serde::Deserialize;

use crate::escape::{escape_html, push_escaped};
use crate::reply::{ReplyError, non_empty};
use crate::request::{SuggestionRequest, SuggestionTopic};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please upload a PDF first")]
    NoDocument,
}

#[derive(Debug, Default, Clone)]
pub struct DocumentSession {
    current_document_id: Option<String>,
}

/// Result of a successful document upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAnalysis {
    pub document_id: String,
    pub main_topics: Vec<String>,
    pub analysis: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadEnvelope {
    pdf_id: Option<String>,
    structured_content: Option<StructuredContent>,
    analysis: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StructuredContent {
    main_topics: Option<Vec<String>>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_document_id(&self) -> Option<&str> {
        self.current_document_id.as_deref()
    }

    pub fn has_document(&self) -> bool {
        self.current_document_id.is_some()
    }

    /// Interpret an upload response body and attach its document.
    ///
    /// The session is left unchanged when the body is rejected.
    pub fn accept_upload(&mut self, body: &str) -> Result<UploadAnalysis, ReplyError> {
        let envelope: UploadEnvelope = serde_json::from_str(body)?;
        if let Some(message) = non_empty(envelope.error) {
            return Err(ReplyError::Service(message));
        }

        let main_topics = envelope
            .structured_content
            .and_then(|c| c.main_topics)
            .ok_or(ReplyError::MissingField("structured_content.main_topics"))?;
        let document_id = envelope.pdf_id.ok_or(ReplyError::MissingField("pdf_id"))?;

        tracing::debug!(
            document_id = %document_id,
            topics = main_topics.len(),
            "document attached"
        );
        self.current_document_id = Some(document_id.clone());

        Ok(UploadAnalysis {
            document_id,
            main_topics,
            analysis: non_empty(envelope.analysis),
        })
    }

    /// Detach the current document (upload cancelled).
    pub fn clear(&mut self) {
        self.current_document_id = None;
    }

    pub fn suggestion_request(
        &self,
        topic: SuggestionTopic,
    ) -> Result<SuggestionRequest, SessionError> {
        let id = self
            .current_document_id
            .as_deref()
            .ok_or(SessionError::NoDocument)?;
        Ok(SuggestionRequest::new(id, topic))
    }
}

impl UploadAnalysis {
    pub fn to_html(&self) -> String {
        let mut out = String::from("<h3>PDF Analysis Complete!</h3><p><strong>Identified Topics:</strong> ");
        push_escaped(&mut out, &self.main_topics.join(", "));
        out.push_str("</p><p>Click &quot;Summarize&quot; to get a concise summary or &quot;Explain&quot; to get detailed explanations with real-world examples.</p>");
        if let Some(analysis) = &self.analysis {
            out.push_str("<h3>Raw Analysis Output:</h3><pre>");
            push_escaped(&mut out, analysis);
            out.push_str("</pre>");
        }
        out
    }
}

/// Inline message shown when an upload response is rejected.
pub fn upload_error_block(err: &ReplyError) -> String {
    format!(
        "Error analyzing PDF: {}. Please try again.",
        escape_html(&err.to_string())
    )
}
