//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use learnarc_core::assistant::ports::CompletionClient;
use learnarc_core::catalog::ports::{MetadataCache, VideoCatalog};
use learnarc_core::{
    AssistantService, CalendarService, CatalogService, NotificationService, PlaylistService,
    ProgressService,
};
use learnarc_domain::{Config, LearnArcError, Result};
use learnarc_infra::scheduling::ReminderJob;
use learnarc_infra::{
    DbManager, HttpClient, MokaMetadataCache, OAuthManager, OpenAiCompletionClient,
    ReminderScheduler, ReminderSchedulerConfig, SessionManager, SqliteActivityRepository,
    SqliteNotificationRepository, SqlitePlaylistRepository, SqliteProgressRepository,
    SqliteReminderRepository, SqliteUserRepository, YouTubeClient,
};
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthStatus};

const USER_AGENT: &str = concat!("learnarc/", env!("CARGO_PKG_VERSION"));

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,

    // Core services
    pub catalog: Arc<CatalogService>,
    pub playlists: Arc<PlaylistService>,
    pub progress: Arc<ProgressService>,
    pub calendar: Arc<CalendarService>,
    pub assistant: Arc<AssistantService>,
    pub notifications: Arc<NotificationService>,

    // Auth
    pub oauth: Arc<OAuthManager>,
    pub sessions: Arc<SessionManager>,

    // Background work
    pub reminder_scheduler: Arc<ReminderScheduler>,
}

impl AppContext {
    /// Create a new application context and start background schedulers.
    pub async fn new(config: Config) -> Result<Self> {
        // Database
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        // Repositories
        let progress_repo = Arc::new(SqliteProgressRepository::new(db.clone()));
        let activity_repo = Arc::new(SqliteActivityRepository::new(db.clone()));
        let notification_repo = Arc::new(SqliteNotificationRepository::new(db.clone()));
        let reminder_repo = Arc::new(SqliteReminderRepository::new(db.clone()));
        let playlist_repo = Arc::new(SqlitePlaylistRepository::new(db.clone()));
        let user_repo = Arc::new(SqliteUserRepository::new(db.clone()));

        // Shared HTTP client for both providers
        let http_client = HttpClient::builder().user_agent(USER_AGENT).build()?;

        // Video catalog behind the 24h metadata cache
        let youtube: Arc<dyn VideoCatalog> = Arc::new(YouTubeClient::new(
            config.youtube.api_key.clone(),
            config.youtube.base_url.clone(),
            http_client.clone(),
        ));
        let metadata_cache: Arc<dyn MetadataCache> = Arc::new(MokaMetadataCache::default_ttl());
        let catalog = Arc::new(CatalogService::new(youtube, metadata_cache));

        // Assistant over the completion provider
        let completion: Arc<dyn CompletionClient> = Arc::new(
            OpenAiCompletionClient::new(
                config.assistant.api_key.clone(),
                config.assistant.base_url.clone(),
                http_client.clone(),
            )
            .with_model(config.assistant.model.clone()),
        );
        let assistant = Arc::new(AssistantService::new(completion));

        // Progress bookkeeping and its read models
        let progress = Arc::new(ProgressService::new(
            progress_repo.clone(),
            activity_repo.clone(),
            progress_repo,
            notification_repo.clone(),
            notification_repo.clone(),
            config.progress.completion_threshold,
        ));
        let calendar = Arc::new(CalendarService::new(activity_repo));
        let playlists = Arc::new(PlaylistService::new(playlist_repo));
        let notifications = Arc::new(NotificationService::new(
            notification_repo.clone(),
            notification_repo,
            reminder_repo,
        ));

        // Auth
        let oauth = Arc::new(OAuthManager::new(config.auth.clone(), http_client));
        let sessions =
            Arc::new(SessionManager::new(user_repo, config.auth.session_ttl_hours));

        // Reminder scheduler (fail-fast start)
        let scheduler_config = ReminderSchedulerConfig {
            poll_interval: Duration::from_secs(config.progress.reminder_poll_interval_secs.max(1)),
        };
        let job: Arc<dyn ReminderJob> = notifications.clone();
        let mut reminder_scheduler = ReminderScheduler::new(job, scheduler_config);
        reminder_scheduler.start().await.map_err(|err| {
            LearnArcError::Internal(format!("failed to start reminder scheduler: {err}"))
        })?;

        info!("application context initialised");

        Ok(Self {
            config,
            db,
            catalog,
            playlists,
            progress,
            calendar,
            assistant,
            notifications,
            oauth,
            sessions,
            reminder_scheduler: Arc::new(reminder_scheduler),
        })
    }

    /// Check health of application components.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new();

        status = status.add_component(self.check_database_health().await);
        status = status.add_component(if self.reminder_scheduler.is_running().await {
            ComponentHealth::healthy("reminder_scheduler")
        } else {
            ComponentHealth::unhealthy("reminder_scheduler", "loop is not running")
        });

        // Stateless services are healthy once constructed.
        status = status.add_component(ComponentHealth::healthy("catalog"));
        status = status.add_component(ComponentHealth::healthy("assistant"));

        status.calculate_score();
        status
    }

    /// Check database health with a simple query off the async runtime.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = self.db.clone();
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "database health check failed");
                ComponentHealth::unhealthy("database", format!("query failed: {err}"))
            }
            Err(err) => {
                tracing::error!(error = %err, "database health check task panicked");
                ComponentHealth::unhealthy("database", format!("task panic: {err}"))
            }
        }
    }

    /// Shutdown the application context gracefully.
    ///
    /// Repositories and the pool clean up on drop; only the scheduler loop
    /// needs an explicit stop so in-flight ticks finish before exit.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutting down application context");
        if self.reminder_scheduler.is_running().await {
            self.reminder_scheduler.stop().await.map_err(|err| {
                LearnArcError::Internal(format!("failed to stop reminder scheduler: {err}"))
            })?;
        }
        Ok(())
    }
}
