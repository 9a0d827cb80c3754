//! # Text Analysis Pipeline
//!
//! A two-stage text-analysis workflow: word count, then LLM-generated
//! summary and sentiment, with in-memory checkpointing per conversation.
//!
//! The crate provides the pipeline core behind a text-analysis HTTP API.
//! The HTTP surface itself (request parsing, JSON marshaling, the proxy
//! frontend) belongs to the host; this crate supplies what runs behind it.
//!
//! ## Core Concepts
//!
//! - **[`AnalysisState`]** — the record threaded through the workflow.
//!   Nodes return partial [`StateUpdate`]s; the executor merges them, and
//!   each field is written exactly once per run.
//! - **[`Workflow`]** — sequences the two nodes and owns the execution
//!   context and optional [`MemorySaver`] checkpoint store.
//! - **[`Backend`]** — uniform call contract over the generation service.
//!   [`connect`](backend::connect) picks the live Ollama path or the
//!   deterministic offline responder, once, at construction.
//! - **[`validate`]** — the input gate applied before the workflow runs.
//!
//! Backend failure never fails a run: the analyzer node folds it into the
//! state (`sentiment = error`, descriptive summary), so callers always get
//! a well-formed result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use text_analysis_pipeline::run_workflow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = run_workflow(
//!         "Rust gives you memory safety without a garbage collector.",
//!         Some("llama3.2"),
//!         None,
//!     )
//!     .await?;
//!     println!("{} words, {}: {}", result.word_count, result.sentiment, result.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Conversations
//!
//! ```no_run
//! use text_analysis_pipeline::Workflow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let workflow = Workflow::builder().model("llama3.2").build().await?;
//!
//!     // Later runs with the same id layer onto the stored snapshot.
//!     workflow.run("First message of the conversation.", Some("c1")).await?;
//!     let state = workflow.run("A follow-up message, same thread.", Some("c1")).await?;
//!     println!("{:?}", state.summary);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod checkpoint;
pub mod error;
pub mod model_config;
pub mod nodes;
pub mod prompt;
pub mod state;
pub mod validation;
pub mod workflow;

pub use backend::{
    Backend, GenerationRequest, GenerationResponse, MockBackend, OfflineBackend, OllamaBackend,
};
pub use checkpoint::MemorySaver;
pub use error::{PipelineError, Result, ValidationError};
pub use model_config::{
    default_model, resolve_base_url, ModelConfig, DEFAULT_BASE_URL, SUPPORTED_MODELS,
};
pub use nodes::{AnalyzerNode, Node, WordCountNode};
pub use state::{AnalysisResult, AnalysisState, Sentiment, StateUpdate};
pub use validation::{validate, ValidationLimits};
pub use workflow::{run_workflow, stream_workflow, ExecCtx, NodeUpdate, Workflow, WorkflowBuilder};
