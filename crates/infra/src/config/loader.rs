//! Configuration loader
//!
//! Loads application configuration from a file and applies environment
//! variable overrides on top.
//!
//! ## Loading Strategy
//! 1. Probes standard locations for a `config.{toml,json}` or
//!    `learnarc.{toml,json}` file (or uses an explicit path)
//! 2. Falls back to built-in defaults when no file exists
//! 3. Applies `LEARNARC_*` environment overrides last, so they always win
//!
//! ## Environment Variables
//! - `LEARNARC_DB_PATH` / `LEARNARC_DB_POOL_SIZE`
//! - `LEARNARC_BIND_ADDR`
//! - `LEARNARC_COMPLETION_THRESHOLD`
//! - `LEARNARC_REMINDER_POLL_INTERVAL`
//! - `LEARNARC_YOUTUBE_API_KEY` / `LEARNARC_YOUTUBE_BASE_URL`
//! - `LEARNARC_OPENAI_API_KEY` / `LEARNARC_OPENAI_MODEL` /
//!   `LEARNARC_OPENAI_BASE_URL`
//! - `LEARNARC_OAUTH_CLIENT_ID` / `LEARNARC_OAUTH_CLIENT_SECRET` /
//!   `LEARNARC_OAUTH_REDIRECT_URI`
//! - `LEARNARC_SESSION_TTL_HOURS`

use std::path::{Path, PathBuf};

use learnarc_domain::{Config, LearnArcError, Result};

/// Load configuration: file (if any) plus environment overrides.
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration file");
            load_from_file(Some(path))?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. Supports TOML and
/// JSON, detected by file extension.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LearnArcError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LearnArcError::Config("no config file found in any standard location".to_string())
        })?,
    };

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LearnArcError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LearnArcError::Config(format!("invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LearnArcError::Config(format!("invalid JSON config: {e}"))),
        other => Err(LearnArcError::Config(format!("unsupported config format: {other}"))),
    }
}

/// Probe standard locations for a configuration file.
///
/// Checks the working directory and up to two parent directories, then the
/// executable's directory, for `config.{toml,json}` and
/// `learnarc.{toml,json}`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    let names = ["config.toml", "config.json", "learnarc.toml", "learnarc.json"];

    if let Ok(cwd) = std::env::current_dir() {
        for base in [cwd.clone(), cwd.join(".."), cwd.join("../..")] {
            for name in names {
                candidates.push(base.join(name));
            }
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            for name in names {
                candidates.push(exe_dir.join(name));
            }
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(value) = env_string("LEARNARC_DB_PATH") {
        config.database.path = value;
    }
    if let Some(value) = env_parsed::<u32>("LEARNARC_DB_POOL_SIZE")? {
        config.database.pool_size = value;
    }
    if let Some(value) = env_string("LEARNARC_BIND_ADDR") {
        config.server.bind_addr = value;
    }
    if let Some(value) = env_parsed::<f64>("LEARNARC_COMPLETION_THRESHOLD")? {
        if !(0.0..=1.0).contains(&value) {
            return Err(LearnArcError::Config(format!(
                "LEARNARC_COMPLETION_THRESHOLD must be within [0, 1], got {value}"
            )));
        }
        config.progress.completion_threshold = value;
    }
    if let Some(value) = env_parsed::<u64>("LEARNARC_REMINDER_POLL_INTERVAL")? {
        config.progress.reminder_poll_interval_secs = value;
    }
    if let Some(value) = env_string("LEARNARC_YOUTUBE_API_KEY") {
        config.youtube.api_key = value;
    }
    if let Some(value) = env_string("LEARNARC_YOUTUBE_BASE_URL") {
        config.youtube.base_url = value;
    }
    if let Some(value) = env_string("LEARNARC_OPENAI_API_KEY") {
        config.assistant.api_key = value;
    }
    if let Some(value) = env_string("LEARNARC_OPENAI_MODEL") {
        config.assistant.model = value;
    }
    if let Some(value) = env_string("LEARNARC_OPENAI_BASE_URL") {
        config.assistant.base_url = value;
    }
    if let Some(value) = env_string("LEARNARC_OAUTH_CLIENT_ID") {
        config.auth.client_id = value;
    }
    if let Some(value) = env_string("LEARNARC_OAUTH_CLIENT_SECRET") {
        config.auth.client_secret = Some(value);
    }
    if let Some(value) = env_string("LEARNARC_OAUTH_REDIRECT_URI") {
        config.auth.redirect_uri = value;
    }
    if let Some(value) = env_parsed::<i64>("LEARNARC_SESSION_TTL_HOURS")? {
        config.auth.session_ttl_hours = value;
    }
    Ok(())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| LearnArcError::Config(format!("invalid value for {key}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "LEARNARC_DB_PATH",
        "LEARNARC_DB_POOL_SIZE",
        "LEARNARC_BIND_ADDR",
        "LEARNARC_COMPLETION_THRESHOLD",
        "LEARNARC_REMINDER_POLL_INTERVAL",
        "LEARNARC_YOUTUBE_API_KEY",
        "LEARNARC_YOUTUBE_BASE_URL",
        "LEARNARC_OPENAI_API_KEY",
        "LEARNARC_OPENAI_MODEL",
        "LEARNARC_OPENAI_BASE_URL",
        "LEARNARC_OAUTH_CLIENT_ID",
        "LEARNARC_OAUTH_CLIENT_SECRET",
        "LEARNARC_OAUTH_REDIRECT_URI",
        "LEARNARC_SESSION_TTL_HOURS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn env_overrides_win_over_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LEARNARC_DB_PATH", "/tmp/override.db");
        std::env::set_var("LEARNARC_COMPLETION_THRESHOLD", "0.95");
        std::env::set_var("LEARNARC_OAUTH_CLIENT_ID", "cid");

        let mut config = Config::default();
        apply_env_overrides(&mut config).expect("overrides apply");

        assert_eq!(config.database.path, "/tmp/override.db");
        assert_eq!(config.progress.completion_threshold, 0.95);
        assert_eq!(config.auth.client_id, "cid");
        // Untouched values stay at defaults.
        assert_eq!(config.database.pool_size, 8);

        clear_env();
    }

    #[test]
    fn invalid_numeric_override_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LEARNARC_DB_POOL_SIZE", "not-a-number");
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config).expect_err("should fail");
        assert!(matches!(err, LearnArcError::Config(_)));

        clear_env();
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("LEARNARC_COMPLETION_THRESHOLD", "1.5");
        let mut config = Config::default();
        let err = apply_env_overrides(&mut config).expect_err("should fail");
        assert!(matches!(err, LearnArcError::Config(_)));

        clear_env();
    }

    #[test]
    fn load_from_toml_file() {
        let toml_content = r#"
[database]
path = "from-file.db"
pool_size = 2

[progress]
completion_threshold = 0.95
reminder_poll_interval_secs = 30
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("load toml");
        assert_eq!(config.database.path, "from-file.db");
        assert_eq!(config.progress.completion_threshold, 0.95);
        // Sections missing from the file fall back to defaults.
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn load_from_json_file() {
        let json_content = r#"{ "youtube": { "api_key": "yt-key", "base_url": "http://x" } }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("load json");
        assert_eq!(config.youtube.api_key, "yt-key");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(matches!(result, Err(LearnArcError::Config(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let result = parse_config("anything", &PathBuf::from("config.yaml"));
        assert!(matches!(result, Err(LearnArcError::Config(_))));
    }
}
