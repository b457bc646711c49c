//! Request bodies sent to the inference service.

use serde::Serialize;

/// Body of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub focused_response: bool,
}

impl ChatRequest {
    /// Build a request from user input, or `None` when the input is blank.
    pub fn new(input: &str) -> Option<Self> {
        let prompt = input.trim();
        (!prompt.is_empty()).then(|| Self {
            prompt: prompt.to_string(),
            focused_response: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTopic {
    Summary,
    Explanation,
}

/// Body of a summary or explanation request for an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRequest {
    pub pdf_id: String,
    pub topic: SuggestionTopic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub focused_response: bool,
}

impl SuggestionRequest {
    pub fn new(document_id: &str, topic: SuggestionTopic) -> Self {
        let level = match topic {
            SuggestionTopic::Summary => None,
            SuggestionTopic::Explanation => Some("high_school".to_string()),
        };
        Self {
            pdf_id: document_id.to_string(),
            topic,
            level,
            focused_response: true,
        }
    }
}
