//! Application State
//!
//! Shared state holding the configuration, database and interview manager.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use mock_interview_llm::{GeminiProvider, LlmProvider};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::services::interview::{InterviewManager, InterviewOptions, SessionStore};
use crate::storage::{ConfigService, Database};
use crate::utils::error::{AppError, AppResult};

/// Application state shared by all command handlers
pub struct AppState {
    /// SQLite database with connection pool
    database: Arc<RwLock<Option<Database>>>,
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// Session manager wired to the configured generator
    interview: Arc<RwLock<Option<Arc<InterviewManager>>>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            database: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(None)),
            interview: Arc::new(RwLock::new(None)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Initialize from the config file in the app directory, with the
    /// Gemini provider as generator.
    pub async fn initialize(&self) -> AppResult<()> {
        let config = ConfigService::new()?;
        let app_config = config.get_config_clone();

        let database = match &app_config.database_path {
            Some(path) => Database::open(&PathBuf::from(path))?,
            None => Database::new()?,
        };

        let provider = GeminiProvider::new(app_config.provider_config())
            .map_err(|e| AppError::config(format!("Failed to create generator client: {}", e)))?;

        self.initialize_with(config, database, Arc::new(provider))
            .await
    }

    /// Initialize with explicit services
    pub async fn initialize_with(
        &self,
        config: ConfigService,
        database: Database,
        provider: Arc<dyn LlmProvider>,
    ) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        let store = SessionStore::new(database.pool().clone());
        store.init_schema()?;
        let options = InterviewOptions::from_config(config.get_config());

        tracing::info!(
            provider = provider.name(),
            model = provider.model(),
            end_on_stop_keyword = options.end_on_stop_keyword,
            "Application state initialized"
        );

        let manager = InterviewManager::new(store, provider, options);
        *self.interview.write().await = Some(Arc::new(manager));
        *self.database.write().await = Some(database);
        *self.config.write().await = Some(config);

        *initialized = true;
        Ok(())
    }

    /// Check if database is healthy
    pub fn is_database_healthy(&self) -> bool {
        // Use try_read to avoid blocking
        if let Ok(guard) = self.database.try_read() {
            if let Some(ref db) = *guard {
                return db.is_healthy();
            }
        }
        false
    }

    /// Check if config is healthy
    pub fn is_config_healthy(&self) -> bool {
        if let Ok(guard) = self.config.try_read() {
            if let Some(ref config) = *guard {
                return config.is_healthy();
            }
        }
        false
    }

    /// Whether the generator has a credential to work with
    pub async fn is_generator_configured(&self) -> bool {
        self.get_config()
            .await
            .map(|config| config.resolve_api_key().is_some())
            .unwrap_or(false)
    }

    /// Get the current configuration
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => Ok(config.get_config_clone()),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Update the configuration. Takes effect for the manager on next start.
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut guard = self.config.write().await;
        match &mut *guard {
            Some(config) => config.update_config(update),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Get the interview manager
    pub async fn interview_manager(&self) -> AppResult<Arc<InterviewManager>> {
        let guard = self.interview.read().await;
        guard
            .clone()
            .ok_or_else(|| AppError::internal("Interview service not initialized"))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("initialized", &self.initialized)
            .finish()
    }
}
