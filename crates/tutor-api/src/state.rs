//! Application state wiring the tutor together.
//!
//! AppState holds the concrete instances used by both CLI commands and the
//! REST API: the orchestrator (pinned to the SQLite store and the configured
//! gateway) and the store itself for curriculum commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use tutor_core::content::box_store::BoxContentStore;
use tutor_core::tutor::orchestrator::TutorOrchestrator;
use tutor_infra::config::{load_config, load_templates, resolve_api_key, resolve_data_dir};
use tutor_infra::llm::create_gateway;
use tutor_infra::sqlite::content::SqliteContentStore;
use tutor_infra::sqlite::pool::{DatabasePool, database_url};
use tutor_types::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tutor: Arc<TutorOrchestrator>,
    pub store: SqliteContentStore,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the resolved data directory and its `tutor.toml`.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        Self::build(config, &data_dir).await
    }

    /// Wire state from an explicit config; used by `init` and tests.
    pub async fn build(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let pool = DatabasePool::new(&database_url(data_dir))
            .await
            .context("failed to open curriculum database")?;
        let store = SqliteContentStore::new(pool);

        let templates = load_templates(&config.tutor, data_dir).await?;

        let api_key = resolve_api_key(&config.gateway);
        let gateway = create_gateway(&config.gateway, api_key).with_context(|| {
            format!(
                "failed to create '{}' gateway (is {} set?)",
                config.gateway.kind, config.gateway.api_key_env
            )
        })?;
        tracing::debug!(gateway = gateway.name(), "LLM gateway ready");

        let tutor = TutorOrchestrator::from_settings(
            &config.tutor,
            BoxContentStore::new(store.clone()),
            gateway,
            templates,
        );

        Ok(Self {
            tutor: Arc::new(tutor),
            store,
            config: Arc::new(config),
            data_dir: data_dir.to_path_buf(),
        })
    }
}
