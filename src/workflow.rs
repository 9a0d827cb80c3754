//! Workflow construction and execution.
//!
//! [`Workflow`] sequences the two nodes — word count, then analyzer — and
//! owns the execution context and optional checkpoint store. The word-count
//! node always completes and is merged before the analyzer starts, because
//! the analyzer's summarization prompt embeds the word count.
//!
//! [`run_workflow`] and [`stream_workflow`] are one-shot conveniences that
//! apply the validation gate, build a workflow, and execute it.

use crate::backend::{self, Backend};
use crate::checkpoint::MemorySaver;
use crate::error::{PipelineError, Result};
use crate::model_config::{default_model, ModelConfig};
use crate::nodes::{AnalyzerNode, Node, WordCountNode};
use crate::state::{AnalysisResult, AnalysisState, StateUpdate};
use crate::validation::{validate, ValidationLimits};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Shared execution context handed to every node.
pub struct ExecCtx {
    /// HTTP client (cheap to clone, uses `Arc` internally).
    pub client: Client,
    /// Generation backend (live or offline).
    pub backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for ExecCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCtx")
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Incremental record emitted by [`Workflow::stream`] when a node completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeUpdate {
    /// Name of the node that just completed.
    pub node: String,
    /// The fields that node wrote.
    pub update: StateUpdate,
}

/// The compiled two-node workflow.
///
/// Construct via [`Workflow::builder`]. A workflow is immutable after
/// construction and safe to share across concurrent callers; concurrent
/// runs share only the checkpoint store.
pub struct Workflow {
    nodes: Vec<Box<dyn Node>>,
    ctx: ExecCtx,
    checkpointer: Option<MemorySaver>,
}

impl Workflow {
    /// Start building a workflow.
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// The checkpoint store, if checkpointing is enabled.
    pub fn checkpointer(&self) -> Option<&MemorySaver> {
        self.checkpointer.as_ref()
    }

    /// Node names in execution order.
    pub fn node_names(&self) -> Vec<&'static str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Prepare the state a run starts from.
    ///
    /// With a conversation id and a prior checkpoint, the new run layers
    /// onto the last snapshot: the new input text is installed and the
    /// stage-owned fields are cleared for recomputation, so the write-once
    /// invariant holds per run. Without an id, every call is independent.
    fn initial_state(&self, input_text: &str, thread_id: Option<&str>) -> AnalysisState {
        if let (Some(id), Some(saver)) = (thread_id, &self.checkpointer) {
            if let Some(mut prior) = saver.get(id) {
                debug!(thread_id = id, "resuming from checkpoint");
                prior.begin_run(input_text);
                return prior;
            }
        }
        AnalysisState::new(input_text)
    }

    /// Execute all nodes to completion and return the final state.
    pub async fn run(&self, input_text: &str, thread_id: Option<&str>) -> Result<AnalysisState> {
        self.stream(input_text, thread_id, |_| {}).await
    }

    /// Execute all nodes, emitting one [`NodeUpdate`] per completed node.
    ///
    /// Records are produced synchronously in completion order — the
    /// word-count record first, the analyzer record second — exactly one
    /// per node. The final state is also returned.
    pub async fn stream<F>(
        &self,
        input_text: &str,
        thread_id: Option<&str>,
        mut on_update: F,
    ) -> Result<AnalysisState>
    where
        F: FnMut(NodeUpdate),
    {
        let mut state = self.initial_state(input_text, thread_id);

        // Pre-run snapshot, so the store reflects the RUNNING phase.
        if let (Some(id), Some(saver)) = (thread_id, &self.checkpointer) {
            saver.put(id, state.clone());
        }

        info!(
            chars = input_text.len(),
            thread_id = thread_id.unwrap_or("-"),
            "running workflow"
        );

        for node in &self.nodes {
            let update = node.run(&self.ctx, &state).await?;
            state.merge(update.clone())?;
            debug!(node = node.name(), "node completed");
            on_update(NodeUpdate {
                node: node.name().to_string(),
                update,
            });
        }

        if let (Some(id), Some(saver)) = (thread_id, &self.checkpointer) {
            saver.put(id, state.clone());
        }

        info!("workflow completed");
        Ok(state)
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("nodes", &self.node_names())
            .field("backend", &self.ctx.backend.name())
            .field("checkpointing", &self.checkpointer.is_some())
            .finish()
    }
}

/// Builder for [`Workflow`].
pub struct WorkflowBuilder {
    config: Option<ModelConfig>,
    checkpointing: bool,
    backend: Option<Arc<dyn Backend>>,
    client: Option<Client>,
    timeout: Duration,
}

impl WorkflowBuilder {
    fn new() -> Self {
        Self {
            config: None,
            checkpointing: true,
            backend: None,
            client: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Use the named model with balanced defaults.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config = Some(ModelConfig::new(model));
        self
    }

    /// Use a fully specified model configuration (e.g. a preset).
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Enable or disable the checkpoint store. Default: enabled.
    pub fn checkpointing(mut self, enabled: bool) -> Self {
        self.checkpointing = enabled;
        self
    }

    /// Force a specific backend, skipping the live/offline selection.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the HTTP client. If not set, one is built with the timeout.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Request timeout for backend calls. Default: 60 seconds.
    /// Ignored when a custom client is provided.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the workflow.
    ///
    /// Validates the model configuration, builds the HTTP client, and —
    /// unless a backend was forced — probes the live backend once, falling
    /// back to the offline responder if it is unreachable.
    pub async fn build(self) -> Result<Workflow> {
        let config = self.config.unwrap_or_else(|| ModelConfig::new(default_model()));
        config.check()?;

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(PipelineError::Request)?,
        };

        let backend = match self.backend {
            Some(backend) => backend,
            None => backend::connect(&client, &config).await,
        };

        info!(
            model = %config.model,
            backend = backend.name(),
            checkpointing = self.checkpointing,
            "workflow built"
        );

        let nodes: Vec<Box<dyn Node>> = vec![
            Box::new(WordCountNode),
            Box::new(AnalyzerNode::new(config)),
        ];

        Ok(Workflow {
            nodes,
            ctx: ExecCtx { client, backend },
            checkpointer: self.checkpointing.then(MemorySaver::new),
        })
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the input, build a workflow, and run it to completion.
///
/// This is the one-shot entry point the hosting API layer calls. For state
/// continuity across calls with a conversation id, construct a [`Workflow`]
/// once and call [`Workflow::run`] on it instead — the checkpoint store
/// lives inside the workflow.
pub async fn run_workflow(
    input_text: &str,
    model_name: Option<&str>,
    thread_id: Option<&str>,
) -> Result<AnalysisResult> {
    validate(input_text, &ValidationLimits::default())?;

    let mut builder = Workflow::builder();
    if let Some(model) = model_name {
        builder = builder.model(model);
    }
    let workflow = builder.build().await?;
    workflow.run(input_text, thread_id).await?.into_result()
}

/// Validate the input, build a workflow, and run it, emitting a
/// [`NodeUpdate`] per completed node.
pub async fn stream_workflow<F>(
    input_text: &str,
    model_name: Option<&str>,
    thread_id: Option<&str>,
    on_update: F,
) -> Result<AnalysisResult>
where
    F: FnMut(NodeUpdate),
{
    validate(input_text, &ValidationLimits::default())?;

    let mut builder = Workflow::builder();
    if let Some(model) = model_name {
        builder = builder.model(model);
    }
    let workflow = builder.build().await?;
    workflow
        .stream(input_text, thread_id, on_update)
        .await?
        .into_result()
}
