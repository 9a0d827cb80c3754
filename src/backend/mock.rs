//! Scripted backend for tests.
//!
//! Unlike [`OfflineBackend`](super::OfflineBackend), which derives its
//! answer from the prompt, [`MockBackend`] replays a fixed script — useful
//! when a test needs to control exactly what the model "said" on each call.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, GenerationRequest, GenerationResponse};
use crate::error::{PipelineError, Result};

/// A test backend that returns canned responses in order.
///
/// Cycles back to the beginning when all responses have been consumed.
/// With `fail_message` set, every call errors instead — for exercising the
/// unreachable-backend path.
#[derive(Debug)]
pub struct MockBackend {
    responses: Vec<String>,
    index: AtomicUsize,
    fail_message: Option<String>,
}

impl MockBackend {
    /// Create a mock backend with the given canned responses.
    ///
    /// Responses are returned in order. When exhausted, cycles from the
    /// beginning.
    pub fn new(responses: Vec<String>) -> Self {
        assert!(
            !responses.is_empty(),
            "MockBackend requires at least one response"
        );
        Self {
            responses,
            index: AtomicUsize::new(0),
            fail_message: None,
        }
    }

    /// Create a mock that always returns the same response.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Create a mock that fails every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            index: AtomicUsize::new(0),
            fail_message: Some(message.into()),
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    fn next_response(&self) -> String {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        self.responses[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(
        &self,
        _client: &Client,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        if let Some(ref msg) = self.fail_message {
            self.index.fetch_add(1, Ordering::Relaxed);
            return Err(PipelineError::Other(msg.clone()));
        }
        Ok(GenerationResponse {
            text: self.next_response(),
            status: 200,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
