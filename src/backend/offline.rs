//! Deterministic offline responder.
//!
//! [`OfflineBackend`] stands in for the live service during development and
//! testing: same call shape, same return type, but the response is derived
//! from the prompt alone, so runs are fully reproducible. The canned text
//! is recognizable as a mock on sight.

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, GenerationRequest, GenerationResponse};
use crate::error::Result;

/// Canned summary returned for summarization prompts.
pub const MOCK_SUMMARY: &str = "This is a mock summary of the provided text. \
     It captures the main points and provides a concise overview.";

/// A backend that answers from the prompt text, with no I/O.
///
/// Summarization prompts get a fixed mock summary, sentiment prompts get
/// `"neutral"`, anything else gets a generic mock reply.
#[derive(Debug, Clone, Default)]
pub struct OfflineBackend;

impl OfflineBackend {
    fn respond(prompt: &str) -> String {
        if prompt.contains("Summarize") {
            MOCK_SUMMARY.to_string()
        } else if prompt.to_lowercase().contains("sentiment") {
            "neutral".to_string()
        } else {
            "Mock response".to_string()
        }
    }
}

#[async_trait]
impl Backend for OfflineBackend {
    async fn complete(
        &self,
        _client: &Client,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        Ok(GenerationResponse {
            text: Self::respond(&request.prompt),
            status: 200,
        })
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
