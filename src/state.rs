//! Application State
//!
//! Shared state for an embedding host, containing all services.

use std::sync::Arc;
use tokio::sync::RwLock;

use chrono::Utc;
use mockprep_extract::StructuredExtractor;
use mockprep_llm::{create_provider, LlmProvider};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::models::AnalyticsReport;
use crate::services::analytics::compute_analytics;
use crate::services::{InterviewService, SubscriptionService};
use crate::storage::{ConfigService, Database};
use crate::utils::error::{AppError, AppResult};

/// Build an extractor around a provider using the configured retry policies
pub fn build_extractor(config: &AppConfig, provider: Arc<dyn LlmProvider>) -> StructuredExtractor {
    StructuredExtractor::new(provider)
        .with_question_retry(config.question_retry)
        .with_feedback_retry(config.feedback_retry)
}

/// Application state shared across requests
pub struct AppState {
    /// SQLite database with connection pool
    database: Arc<RwLock<Option<Database>>>,
    /// Configuration service for app settings
    config: Arc<RwLock<Option<ConfigService>>>,
    /// Extractor bound to the configured generation provider
    extractor: Arc<RwLock<Option<StructuredExtractor>>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            database: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(None)),
            extractor: Arc::new(RwLock::new(None)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Initialize all services from the default locations
    pub async fn initialize(&self) -> AppResult<()> {
        if *self.initialized.read().await {
            return Ok(());
        }

        let config = ConfigService::new()?;
        let effective = config.effective_config()?;
        let provider = create_provider(effective.provider_config());
        let database = Database::new()?;

        self.initialize_with(config, database, provider).await
    }

    /// Initialize from explicit components. Later calls are no-ops.
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

        let effective = config.effective_config()?;

        // Initialize database
        {
            let mut db_lock = self.database.write().await;
            *db_lock = Some(database);
        }

        // Initialize config
        {
            let mut config_lock = self.config.write().await;
            *config_lock = Some(config);
        }

        // Initialize extractor
        {
            let mut extractor_lock = self.extractor.write().await;
            *extractor_lock = Some(build_extractor(&effective, provider));
        }

        tracing::info!(
            provider = %effective.provider,
            model = %effective.model,
            "Application state initialized"
        );

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

    /// Check if the extractor has been built
    pub fn is_extractor_ready(&self) -> bool {
        matches!(self.extractor.try_read(), Ok(guard) if guard.is_some())
    }

    /// Health check against the generation provider
    pub async fn check_provider(&self) -> AppResult<()> {
        let extractor = self.extractor().await?;
        extractor.provider().health_check().await?;
        Ok(())
    }

    /// Get the current configuration with environment overrides applied
    pub async fn get_config(&self) -> AppResult<AppConfig> {
        let guard = self.config.read().await;
        match &*guard {
            Some(config) => config.effective_config(),
            None => Err(AppError::config("Config service not initialized")),
        }
    }

    /// Update the configuration and rebuild the generation provider from it
    pub async fn update_config(&self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let effective = {
            let mut guard = self.config.write().await;
            match &mut *guard {
                Some(config) => {
                    config.update_config(update)?;
                    config.effective_config()?
                }
                None => return Err(AppError::config("Config service not initialized")),
            }
        };

        let provider = create_provider(effective.provider_config());
        let mut extractor_lock = self.extractor.write().await;
        *extractor_lock = Some(build_extractor(&effective, provider));
        Ok(effective)
    }

    async fn database(&self) -> AppResult<Database> {
        let guard = self.database.read().await;
        match &*guard {
            Some(db) => Ok(db.clone()),
            None => Err(AppError::database("Database not initialized")),
        }
    }

    async fn extractor(&self) -> AppResult<StructuredExtractor> {
        let guard = self.extractor.read().await;
        match &*guard {
            Some(extractor) => Ok(extractor.clone()),
            None => Err(AppError::internal("Extractor not initialized")),
        }
    }

    /// Interview service bound to the current database and extractor
    pub async fn interview_service(&self) -> AppResult<InterviewService> {
        let config = self.get_config().await?;
        Ok(InterviewService::new(
            self.database().await?,
            self.extractor().await?,
            config.question_count,
        ))
    }

    /// Subscription service bound to the current database
    pub async fn subscription_service(&self) -> AppResult<SubscriptionService> {
        Ok(SubscriptionService::new(self.database().await?))
    }

    /// Progress report over a user's interviews
    pub async fn analytics(&self, email: &str) -> AppResult<AnalyticsReport> {
        let history = self.interview_service().await?.history_for_user(email)?;
        Ok(compute_analytics(&history))
    }

    /// Whether the user currently has pro features
    pub async fn is_pro(&self, user_id: &str) -> AppResult<bool> {
        self.subscription_service().await?.is_pro(user_id, Utc::now())
    }

    /// Get database access for direct queries
    pub async fn with_database<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Database) -> AppResult<T>,
    {
        let guard = self.database.read().await;
        match &*guard {
            Some(db) => f(db),
            None => Err(AppError::database("Database not initialized")),
        }
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
