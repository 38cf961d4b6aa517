use std::sync::Arc;

use chrono::Utc;
use learnarc_domain::{Config, Video};
use learnarc_lib::AppContext;
use tempfile::TempDir;

/// Shared context for integration tests that exercise the wired services.
pub struct TestContext {
    pub ctx: Arc<AppContext>,
    /// Keep temporary directory alive for the lifetime of the context.
    _temp_dir: TempDir,
}

/// Create a new application context against a fresh temporary database.
///
/// Provider endpoints point at unroutable localhost ports; tests that need
/// provider traffic mock at the port level in the infra crate instead.
pub async fn setup_test_context() -> TestContext {
    let temp_dir = TempDir::new().expect("failed to create temporary database directory");

    let mut config = Config::default();
    config.database.path = temp_dir.path().join("learnarc.db").display().to_string();
    config.youtube.base_url = "http://127.0.0.1:9/youtube".to_string();
    config.assistant.base_url = "http://127.0.0.1:9/openai".to_string();
    // Keep the scheduler quiet during tests.
    config.progress.reminder_poll_interval_secs = 3600;

    let ctx = AppContext::new(config).await.expect("failed to initialise application context");
    TestContext { ctx: Arc::new(ctx), _temp_dir: temp_dir }
}

/// Build a catalog video for tests.
pub fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        channel_title: "Test Channel".to_string(),
        thumbnail: format!("https://img.example/{id}.jpg"),
        description: String::new(),
        published_at: Utc::now(),
        duration: Some("10:00".to_string()),
    }
}
