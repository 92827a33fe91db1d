//! Color palette suggestions for doodle pad drawings
//!
//! The drawing is sent to a remote model service as a data URI; the service
//! answers with a list of hex colors suited to coloring it in.

mod remote;

pub use remote::RemoteSuggester;

use painting::is_hex_color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instruction sent alongside every drawing
pub const SUGGESTION_PROMPT: &str = "You are a helpful AI assistant that is used to suggest coloring for children's drawings. \
Based on the drawing provided, suggest a palette of colors that would be suitable for coloring it in. \
Respond with an array of hexadecimal color codes.";

/// Shown for any failure that is not a content-safety rejection
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get color suggestions.";

/// Shown when the service's safety filters reject the drawing
pub const CONTENT_SAFETY_MESSAGE: &str =
    "The drawing could not be processed due to content safety filters.";

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Suggestion service not configured")]
    NotConfigured,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Rejected by content safety filters: {0}")]
    ContentSafety(String),
}

impl SuggestError {
    /// Classify an error string reported by the service
    pub fn from_service(message: String) -> Self {
        if message.contains("SAFETY") {
            SuggestError::ContentSafety(message)
        } else {
            SuggestError::Service(message)
        }
    }

    /// Text suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            SuggestError::ContentSafety(_) => CONTENT_SAFETY_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// Request body sent to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// `data:<mime>;base64,<payload>`
    pub drawing_data_uri: String,
    pub prompt: String,
}

impl SuggestionRequest {
    pub fn new(drawing_data_uri: String) -> Self {
        Self {
            drawing_data_uri,
            prompt: SUGGESTION_PROMPT.to_string(),
        }
    }
}

/// Reply body from the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggested_colors: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SuggestionResponse {
    /// Turn a reply into the usable colors or the reported error
    ///
    /// Entries that are not valid hex colors are dropped.
    pub fn into_colors(self) -> Result<Vec<String>, SuggestError> {
        if let Some(error) = self.error {
            return Err(SuggestError::from_service(error));
        }
        Ok(self
            .suggested_colors
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| is_hex_color(c))
            .collect())
    }
}

/// Parse a raw reply
pub fn parse_response(text: &str) -> Result<Vec<String>, SuggestError> {
    let response: SuggestionResponse =
        serde_json::from_str(text).map_err(|e| SuggestError::InvalidResponse(e.to_string()))?;
    response.into_colors()
}

/// Trait for suggestion backends
#[allow(async_fn_in_trait)]
pub trait ColorSuggester {
    /// Suggest colors for the drawing in `drawing_data_uri`
    async fn suggest(&self, drawing_data_uri: String) -> Result<Vec<String>, SuggestError>;
}
