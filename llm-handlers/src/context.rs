//! Application context: everything a handler needs, built once at startup and passed down.

use llm_client::{CompletionError, LlmClient};
use std::sync::Arc;
use storage::{HistorialStore, StorePaths, UserStore};
use tracing::{error, info, instrument};

#[derive(Clone)]
pub struct AppContext {
    pub users: UserStore,
    pub historials: HistorialStore,
    pub llm: Arc<dyn LlmClient>,
    pub model: String,
}

impl AppContext {
    /// Stores rooted at `paths`, completion calls through `llm` with `model`. No credential
    /// check; see [`connect`](Self::connect).
    pub fn new(paths: StorePaths, llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            users: UserStore::new(paths.clone()),
            historials: HistorialStore::new(paths),
            llm,
            model: model.into(),
        }
    }

    /// Checks the API token once, then builds the context. A rejected token fails here, before
    /// any store is touched; handlers never repeat the check.
    #[instrument(skip(paths, llm, model))]
    pub async fn connect(
        paths: StorePaths,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let model = model.into();
        llm.validate_credentials(&model, None).await.map_err(|e| {
            error!(error = %e, "Completion API rejected the token check");
            e
        })?;
        info!(model = %model, "Completion API token accepted");
        Ok(Self::new(paths, llm, model))
    }
}
