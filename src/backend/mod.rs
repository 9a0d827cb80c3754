//! Generation backend trait and normalized request/response types.
//!
//! The [`Backend`] trait abstracts over the text-generation service behind
//! a uniform call contract: system prompt + user prompt in, text out.
//! Built-in implementations:
//!
//! - [`OllamaBackend`] — the live path, Ollama's `/api/chat` endpoint.
//! - [`OfflineBackend`] — deterministic canned responder for development
//!   and testing without a live service.
//! - [`MockBackend`] — scripted responses, for tests.
//!
//! [`connect`] selects between live and offline once, at construction.

pub mod mock;
pub mod offline;
pub mod ollama;

pub use mock::MockBackend;
pub use offline::OfflineBackend;
pub use ollama::OllamaBackend;

use crate::error::Result;
use crate::model_config::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// A normalized generation request.
///
/// The analyzer node builds this from its prompts and [`ModelConfig`];
/// the [`Backend`] translates it into the provider-specific HTTP request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instructions for the model.
    pub system_prompt: String,
    /// The user prompt text.
    pub prompt: String,
    /// Sampling parameters, model identifier, and base address.
    pub config: ModelConfig,
}

/// A normalized generation response.
#[derive(Debug)]
pub struct GenerationResponse {
    /// The generated text content.
    pub text: String,
    /// HTTP status code (for diagnostics/logging; 200 for offline backends).
    pub status: u16,
}

/// Abstraction over text-generation providers.
///
/// Each call is independent and synchronous from the caller's point of
/// view: no retry, no adaptive backoff, no state carried between calls.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute a single generation call.
    async fn complete(
        &self,
        client: &Client,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Select a backend: try the live Ollama service once, fall back to the
/// deterministic offline responder if it cannot be reached.
///
/// The health check is a single `GET /api/version` against the configured
/// base address. The substitution is transparent to the nodes — same call
/// shape, same return type — and is decided once here, not per call.
pub async fn connect(client: &Client, config: &ModelConfig) -> Arc<dyn Backend> {
    match OllamaBackend::probe(client, &config.base_url).await {
        Ok(()) => {
            info!(base_url = %config.base_url, "connected to Ollama backend");
            Arc::new(OllamaBackend)
        }
        Err(e) => {
            warn!(
                base_url = %config.base_url,
                error = %e,
                "Ollama not reachable, using offline backend"
            );
            Arc::new(OfflineBackend)
        }
    }
}
