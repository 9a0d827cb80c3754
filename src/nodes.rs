//! Node implementations for the analysis workflow.
//!
//! Each node reads the running [`AnalysisState`] and returns a
//! [`StateUpdate`] carrying only the fields it owns. The executor merges
//! updates in node order; nodes never write state directly.

use crate::backend::GenerationRequest;
use crate::error::Result;
use crate::model_config::ModelConfig;
use crate::prompt;
use crate::state::{AnalysisState, Sentiment, StateUpdate};
use crate::workflow::ExecCtx;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// One unit of the workflow: reads the running state, returns a partial
/// update.
#[async_trait]
pub trait Node: Send + Sync {
    /// Stable name, used in stream records and logging.
    fn name(&self) -> &'static str;

    /// Execute the node against the current state.
    async fn run(&self, ctx: &ExecCtx, state: &AnalysisState) -> Result<StateUpdate>;
}

/// First node: computes the whitespace-token count of the input text.
///
/// Deterministic, no I/O. Empty input yields a count of 0 rather than an
/// error.
#[derive(Debug, Clone, Default)]
pub struct WordCountNode;

#[async_trait]
impl Node for WordCountNode {
    fn name(&self) -> &'static str {
        "word_count"
    }

    async fn run(&self, _ctx: &ExecCtx, state: &AnalysisState) -> Result<StateUpdate> {
        if state.input_text.is_empty() {
            warn!("no input text provided, word count is 0");
            return Ok(StateUpdate::word_count(0));
        }

        let count = state.input_text.split_whitespace().count() as u32;
        info!(
            chars = state.input_text.len(),
            words = count,
            "word count computed"
        );
        Ok(StateUpdate::word_count(count))
    }
}

/// Second node: generates summary and sentiment via the backend.
///
/// Makes two independent calls with the same [`ModelConfig`]: one for the
/// summary (the prompt embeds the word count computed by the first node),
/// one for the sentiment classification. Backend failure on either call is
/// a data-level outcome — the node returns an error-describing summary and
/// `sentiment = error` instead of propagating, so the executor and caller
/// always receive a well-formed state.
#[derive(Debug, Clone)]
pub struct AnalyzerNode {
    config: ModelConfig,
}

impl AnalyzerNode {
    /// Create an analyzer bound to the given model configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// The model configuration this node calls the backend with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn invoke(&self, ctx: &ExecCtx, system: &str, user: String) -> Result<String> {
        let request = GenerationRequest {
            system_prompt: system.to_string(),
            prompt: user,
            config: self.config.clone(),
        };
        let response = ctx.backend.complete(&ctx.client, &request).await?;
        Ok(response.text)
    }
}

#[async_trait]
impl Node for AnalyzerNode {
    fn name(&self) -> &'static str {
        "analyzer"
    }

    async fn run(&self, ctx: &ExecCtx, state: &AnalysisState) -> Result<StateUpdate> {
        if state.input_text.is_empty() {
            warn!("no input text to summarize");
            return Ok(StateUpdate::analysis("No text provided", Sentiment::Neutral));
        }

        let word_count = state.word_count.unwrap_or(0);
        info!(
            words = word_count,
            model = %self.config.model,
            backend = ctx.backend.name(),
            "generating summary and sentiment"
        );

        let summary = match self
            .invoke(
                ctx,
                prompt::SUMMARY_SYSTEM,
                prompt::summary_prompt(&state.input_text, word_count),
            )
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                error!(error = %e, "summary generation failed");
                return Ok(StateUpdate::analysis(
                    format!("Error generating summary: {}", e),
                    Sentiment::Error,
                ));
            }
        };
        debug!(chars = summary.len(), "summary generated");

        let sentiment = match self
            .invoke(
                ctx,
                prompt::SENTIMENT_SYSTEM,
                prompt::sentiment_prompt(&state.input_text),
            )
            .await
        {
            Ok(text) => {
                let sentiment = Sentiment::parse_lenient(&text);
                debug!(raw = %text.trim(), %sentiment, "sentiment classified");
                sentiment
            }
            Err(e) => {
                error!(error = %e, "sentiment classification failed");
                return Ok(StateUpdate::analysis(
                    format!("Error generating summary: {}", e),
                    Sentiment::Error,
                ));
            }
        };

        Ok(StateUpdate::analysis(summary, sentiment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use std::sync::Arc;

    fn ctx_with(backend: Arc<MockBackend>) -> ExecCtx {
        ExecCtx {
            client: reqwest::Client::new(),
            backend,
        }
    }

    fn state_with_count(text: &str, count: u32) -> AnalysisState {
        let mut state = AnalysisState::new(text);
        state.merge(StateUpdate::word_count(count)).unwrap();
        state
    }

    #[tokio::test]
    async fn test_word_count_basic() {
        let ctx = ctx_with(Arc::new(MockBackend::fixed("unused")));
        let state = AnalysisState::new("Hello world this is a test");
        let update = WordCountNode.run(&ctx, &state).await.unwrap();
        assert_eq!(update.word_count, Some(6));
        assert!(update.summary.is_none());
        assert!(update.sentiment.is_none());
    }

    #[tokio::test]
    async fn test_word_count_collapses_whitespace_runs() {
        let ctx = ctx_with(Arc::new(MockBackend::fixed("unused")));
        let state = AnalysisState::new("  one\t\ttwo \n three  ");
        let update = WordCountNode.run(&ctx, &state).await.unwrap();
        assert_eq!(update.word_count, Some(3));
    }

    #[tokio::test]
    async fn test_word_count_empty_is_zero() {
        let ctx = ctx_with(Arc::new(MockBackend::fixed("unused")));
        let state = AnalysisState::new("");
        let update = WordCountNode.run(&ctx, &state).await.unwrap();
        assert_eq!(update.word_count, Some(0));
    }

    #[tokio::test]
    async fn test_analyzer_empty_input_skips_backend() {
        let backend = Arc::new(MockBackend::fixed("should not be called"));
        let ctx = ctx_with(backend.clone());
        let state = state_with_count("", 0);

        let update = AnalyzerNode::new(ModelConfig::new("test"))
            .run(&ctx, &state)
            .await
            .unwrap();
        assert_eq!(update.summary.as_deref(), Some("No text provided"));
        assert_eq!(update.sentiment, Some(Sentiment::Neutral));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyzer_two_calls_summary_then_sentiment() {
        let backend = Arc::new(MockBackend::new(vec![
            "  A fine summary.  ".into(),
            "positive".into(),
        ]));
        let ctx = ctx_with(backend.clone());
        let state = state_with_count("Great things happened today.", 4);

        let update = AnalyzerNode::new(ModelConfig::new("test"))
            .run(&ctx, &state)
            .await
            .unwrap();
        assert_eq!(update.summary.as_deref(), Some("A fine summary."));
        assert_eq!(update.sentiment, Some(Sentiment::Positive));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_analyzer_uppercase_sentiment_lowercased() {
        let backend = Arc::new(MockBackend::new(vec!["s".into(), "POSITIVE".into()]));
        let ctx = ctx_with(backend);
        let state = state_with_count("Nice.", 1);

        let update = AnalyzerNode::new(ModelConfig::new("test"))
            .run(&ctx, &state)
            .await
            .unwrap();
        assert_eq!(update.sentiment, Some(Sentiment::Positive));
    }

    #[tokio::test]
    async fn test_analyzer_unknown_sentiment_coerced_to_neutral() {
        let backend = Arc::new(MockBackend::new(vec!["s".into(), "happy".into()]));
        let ctx = ctx_with(backend);
        let state = state_with_count("Nice.", 1);

        let update = AnalyzerNode::new(ModelConfig::new("test"))
            .run(&ctx, &state)
            .await
            .unwrap();
        assert_eq!(update.sentiment, Some(Sentiment::Neutral));
    }

    #[tokio::test]
    async fn test_analyzer_backend_failure_is_in_band() {
        let backend = Arc::new(MockBackend::failing("connection refused"));
        let ctx = ctx_with(backend);
        let state = state_with_count("Some perfectly good text.", 4);

        let update = AnalyzerNode::new(ModelConfig::new("test"))
            .run(&ctx, &state)
            .await
            .unwrap();
        let summary = update.summary.unwrap();
        assert!(summary.starts_with("Error generating summary:"));
        assert!(summary.contains("connection refused"));
        assert_eq!(update.sentiment, Some(Sentiment::Error));
    }
}
