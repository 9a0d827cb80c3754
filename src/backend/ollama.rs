//! Live backend for Ollama's native API.
//!
//! [`OllamaBackend`] translates normalized [`GenerationRequest`]s into
//! Ollama's `/api/chat` endpoint. Every call carries a system prompt, so
//! the chat endpoint is always the right one.

use super::{Backend, GenerationRequest, GenerationResponse};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// Backend for Ollama's native API.
#[derive(Debug, Clone)]
pub struct OllamaBackend;

impl OllamaBackend {
    /// Check that an Ollama server is answering at `base_url`.
    ///
    /// Used once by [`connect`](super::connect) before committing to the
    /// live path.
    pub async fn probe(client: &Client, base_url: &str) -> Result<()> {
        let url = format!("{}/api/version", base_url.trim_end_matches('/'));
        let resp = client.get(&url).send().await.map_err(|e| {
            PipelineError::Other(format!("Failed to reach Ollama at {}: {}", url, e))
        })?;
        if !resp.status().is_success() {
            return Err(PipelineError::HttpError {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Build the JSON body for `/api/chat`.
    fn build_chat_body(request: &GenerationRequest) -> Value {
        let mut messages = Vec::new();
        if !request.system_prompt.is_empty() {
            messages.push(json!({"role": "system", "content": request.system_prompt}));
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        json!({
            "model": request.config.model,
            "messages": messages,
            "stream": false,
            "options": {
                "temperature": request.config.temperature,
                "top_p": request.config.top_p,
                "top_k": request.config.top_k,
                "num_ctx": request.config.num_ctx,
            },
        })
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    async fn complete(
        &self,
        client: &Client,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let base = request.config.base_url.trim_end_matches('/');
        let url = format!("{}/api/chat", base);
        let body = Self::build_chat_body(request);

        debug!(model = %request.config.model, url = %url, "sending chat request");

        let resp = client.post(&url).json(&body).send().await.map_err(|e| {
            PipelineError::Other(format!("Failed to connect to LLM at {}: {}", url, e))
        })?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::HttpError { status, body: text });
        }

        let json_resp: Value = resp.json().await?;
        let text = json_resp
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok(GenerationResponse { text, status })
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
