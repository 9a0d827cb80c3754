//! Shared state threaded through the workflow.
//!
//! [`AnalysisState`] is the single record every node reads from. Nodes never
//! mutate it directly: each returns a [`StateUpdate`] carrying only the
//! fields it owns, and the executor merges that update into the running
//! state. The merge rejects a second write to any field, so within one run
//! each field is written by exactly one node.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment classification for the analyzed text.
///
/// `Error` is the in-band outcome for backend failure; the other four are
/// the tokens the model is asked to pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Error,
}

impl Sentiment {
    /// The tokens the model may legitimately answer with.
    pub const ACCEPTED: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Mixed,
    ];

    /// Parse a model response leniently: trim, lower-case, and coerce
    /// anything outside the accepted set to `Neutral`.
    ///
    /// Unparseable model output degrades gracefully rather than failing
    /// the run.
    pub fn parse_lenient(response: &str) -> Sentiment {
        match response.trim().to_lowercase().parse::<Sentiment>() {
            Ok(s) if Self::ACCEPTED.contains(&s) => s,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
            Sentiment::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "mixed" => Ok(Sentiment::Mixed),
            "error" => Ok(Sentiment::Error),
            _ => Err(()),
        }
    }
}

/// The state record flowing through the workflow.
///
/// `input_text` is set once at invocation and immutable for the rest of the
/// run. The stage-owned fields start absent and are filled in by the nodes:
/// `word_count` by the word-count node, `summary` and `sentiment` by the
/// analyzer node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisState {
    /// The original text provided by the caller.
    pub input_text: String,

    /// Whitespace-token count, written by the word-count node.
    pub word_count: Option<u32>,

    /// Generated summary, placeholder, or error description.
    pub summary: Option<String>,

    /// Sentiment classification result.
    pub sentiment: Option<Sentiment>,
}

impl AnalysisState {
    /// Create a fresh state for the given input text.
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            ..Self::default()
        }
    }

    /// Merge a node's partial update into this state.
    ///
    /// Fields are additive: only `Some` fields in the update are applied.
    /// A second write to an already-populated field is a
    /// [`PipelineError::FieldConflict`].
    pub fn merge(&mut self, update: StateUpdate) -> Result<()> {
        if let Some(count) = update.word_count {
            if self.word_count.is_some() {
                return Err(PipelineError::FieldConflict { field: "word_count" });
            }
            self.word_count = Some(count);
        }
        if let Some(summary) = update.summary {
            if self.summary.is_some() {
                return Err(PipelineError::FieldConflict { field: "summary" });
            }
            self.summary = Some(summary);
        }
        if let Some(sentiment) = update.sentiment {
            if self.sentiment.is_some() {
                return Err(PipelineError::FieldConflict { field: "sentiment" });
            }
            self.sentiment = Some(sentiment);
        }
        Ok(())
    }

    /// Reset the stage-owned fields, keeping `input_text`.
    ///
    /// Used when a new run starts on top of a previous checkpoint: the new
    /// RUNNING phase recomputes every stage-owned field, so the write-once
    /// invariant holds per run.
    pub fn begin_run(&mut self, input_text: impl Into<String>) {
        self.input_text = input_text.into();
        self.word_count = None;
        self.summary = None;
        self.sentiment = None;
    }

    /// Convert a completed state into the outbound result shape.
    ///
    /// Fails with [`PipelineError::Other`] if any stage-owned field is still
    /// absent, which cannot happen after a full `run`.
    pub fn into_result(self) -> Result<AnalysisResult> {
        let missing = |field: &str| {
            PipelineError::Other(format!("workflow completed without setting '{}'", field))
        };
        Ok(AnalysisResult {
            word_count: self.word_count.ok_or_else(|| missing("word_count"))?,
            summary: self.summary.ok_or_else(|| missing("summary"))?,
            sentiment: self.sentiment.ok_or_else(|| missing("sentiment"))?,
            input_text: self.input_text,
        })
    }
}

/// A node's partial state update — only the fields the node owns are `Some`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl StateUpdate {
    /// Update carrying only a word count.
    pub fn word_count(count: u32) -> Self {
        Self {
            word_count: Some(count),
            ..Self::default()
        }
    }

    /// Update carrying the analyzer node's two fields.
    pub fn analysis(summary: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            summary: Some(summary.into()),
            sentiment: Some(sentiment),
            ..Self::default()
        }
    }
}

/// Fully-populated outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub input_text: String,
    pub word_count: u32,
    pub summary: String,
    pub sentiment: Sentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_additive() {
        let mut state = AnalysisState::new("hello");
        state.merge(StateUpdate::word_count(1)).unwrap();
        assert_eq!(state.word_count, Some(1));
        assert!(state.summary.is_none());

        state
            .merge(StateUpdate::analysis("a summary", Sentiment::Positive))
            .unwrap();
        assert_eq!(state.word_count, Some(1));
        assert_eq!(state.summary.as_deref(), Some("a summary"));
        assert_eq!(state.sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn test_merge_rejects_second_write() {
        let mut state = AnalysisState::new("hello");
        state.merge(StateUpdate::word_count(1)).unwrap();
        let err = state.merge(StateUpdate::word_count(2)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FieldConflict { field: "word_count" }
        ));
        // First write survives
        assert_eq!(state.word_count, Some(1));
    }

    #[test]
    fn test_begin_run_clears_stage_fields() {
        let mut state = AnalysisState::new("old");
        state.merge(StateUpdate::word_count(1)).unwrap();
        state
            .merge(StateUpdate::analysis("s", Sentiment::Mixed))
            .unwrap();

        state.begin_run("new input");
        assert_eq!(state.input_text, "new input");
        assert!(state.word_count.is_none());
        assert!(state.summary.is_none());
        assert!(state.sentiment.is_none());
    }

    #[test]
    fn test_into_result_requires_all_fields() {
        let state = AnalysisState::new("hello");
        assert!(state.into_result().is_err());

        let mut state = AnalysisState::new("hello");
        state.merge(StateUpdate::word_count(1)).unwrap();
        state
            .merge(StateUpdate::analysis("s", Sentiment::Neutral))
            .unwrap();
        let result = state.into_result().unwrap();
        assert_eq!(result.word_count, 1);
        assert_eq!(result.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_lenient_lowercases() {
        assert_eq!(Sentiment::parse_lenient("POSITIVE"), Sentiment::Positive);
        assert_eq!(Sentiment::parse_lenient("  mixed \n"), Sentiment::Mixed);
    }

    #[test]
    fn test_sentiment_lenient_coerces_unknown() {
        assert_eq!(Sentiment::parse_lenient("happy"), Sentiment::Neutral);
        assert_eq!(Sentiment::parse_lenient(""), Sentiment::Neutral);
        // "error" is not an accepted model answer either
        assert_eq!(Sentiment::parse_lenient("error"), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: Sentiment = serde_json::from_str("\"mixed\"").unwrap();
        assert_eq!(back, Sentiment::Mixed);
    }
}
