//! Backend invocation parameters and named presets.
//!
//! [`ModelConfig`] is an immutable value object: build it once (directly or
//! from a preset), then hand it to the workflow. Nothing here mutates after
//! construction, and nothing reads the environment after construction —
//! base-URL resolution happens exactly once, in [`resolve_base_url`].

use crate::error::{PipelineError, Result};
use std::env;

/// Default backend address when no override or environment variable is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Model identifiers the hosting API advertises, plus the default.
///
/// The first entry is the default (`GET /api/models` contract).
pub const SUPPORTED_MODELS: &[&str] = &[
    "qwen2.5-coder:0.5b",
    "llama3.2",
    "llama3.2:1b",
    "llama3.2:3b",
    "mistral",
    "codellama",
];

/// Resolve the backend base address.
///
/// Precedence is fixed: explicit override → `OLLAMA_HOST` →
/// `OLLAMA_BASE_URL` → [`DEFAULT_BASE_URL`]. No merging between sources.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.trim_end_matches('/').to_string();
    }
    env::var("OLLAMA_HOST")
        .or_else(|_| env::var("OLLAMA_BASE_URL"))
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Resolve the default model identifier: `DEFAULT_MODEL` env var, then
/// `"llama3.2"`.
pub fn default_model() -> String {
    env::var("DEFAULT_MODEL").unwrap_or_else(|_| "llama3.2".to_string())
}

/// Immutable configuration for a generation backend invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Model identifier (e.g. `"llama3.2"`).
    pub model: String,
    /// Sampling temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f64,
    /// Nucleus-sampling probability mass.
    pub top_p: f64,
    /// Top-k candidate count.
    pub top_k: u32,
    /// Context window size in tokens.
    pub num_ctx: u32,
    /// Backend base address.
    pub base_url: String,
}

impl ModelConfig {
    /// Create a config for the given model with balanced defaults and the
    /// base URL resolved from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            num_ctx: 2048,
            base_url: resolve_base_url(None),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the nucleus-sampling probability mass.
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set the top-k candidate count.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the context window size.
    pub fn with_num_ctx(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    /// Override the backend base address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = resolve_base_url(Some(&base_url.into()));
        self
    }

    /// Look up a named preset: `creative`, `balanced`, `precise`, or
    /// `deterministic`.
    pub fn preset(name: &str) -> Result<Self> {
        let config = match name {
            "creative" => Self::new(default_model()).with_temperature(0.9).with_top_p(0.95),
            "balanced" => Self::new(default_model()).with_temperature(0.7).with_top_p(0.9),
            "precise" => Self::new(default_model()).with_temperature(0.3).with_top_p(0.8),
            "deterministic" => Self::new(default_model()).with_temperature(0.0).with_top_p(1.0),
            other => {
                return Err(PipelineError::InvalidConfig(format!(
                    "Unknown preset: {}. Available presets: creative, balanced, precise, deterministic",
                    other
                )))
            }
        };
        Ok(config)
    }

    /// Validate invariants that can't be expressed in the type.
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(PipelineError::InvalidConfig(format!(
                "temperature must be in 0.0..=1.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(PipelineError::InvalidConfig(format!(
                "top_p must be in 0.0..=1.0, got {}",
                self.top_p
            )));
        }
        if self.num_ctx == 0 {
            return Err(PipelineError::InvalidConfig(
                "num_ctx must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(default_model())
    }
}
