use std::env;
use std::path::PathBuf;

use crate::error::{Result, SuggestorError};

pub const DEFAULT_TARGET_TOTAL: usize = 9;
pub const DEFAULT_RESULTS_LIMIT: u32 = 50;
/// The tweet search actor is billed per result, so Twitter gets a smaller cap.
pub const DEFAULT_TWEET_LIMIT: u32 = 10;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TRANSCRIPT_LANGUAGE: &str = "English";

/// File names inside the data directory.
pub const BUFFER_FILE: &str = "temp_data.json";
pub const CANONICAL_FILE: &str = "data.json";
pub const RESULT_FILE: &str = "result.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Scraping
    pub apify_api_key: Option<String>,
    pub results_limit: u32,
    pub tweet_limit: u32,
    pub lookback_days: u32,

    // Storage
    pub data_dir: PathBuf,
    pub tasks_dir: PathBuf,

    // Selection
    pub target_total: usize,
    pub instagram_videos_only: bool,

    // Remix
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub transcript_language: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apify_api_key: None,
            results_limit: DEFAULT_RESULTS_LIMIT,
            tweet_limit: DEFAULT_TWEET_LIMIT,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            data_dir: PathBuf::from("./data"),
            tasks_dir: PathBuf::from("./tasks"),
            target_total: DEFAULT_TARGET_TOTAL,
            instagram_videos_only: false,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            transcript_language: DEFAULT_TRANSCRIPT_LANGUAGE.to_string(),
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tasks_dir = match var("SUGGESTOR_TASKS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None if var("RENDER").is_some() => PathBuf::from("/tmp/tasks"),
            None => defaults.tasks_dir,
        };

        Ok(Self {
            apify_api_key: var("APIFY_API_KEY").or_else(|| var("APIFY_KEY")),
            results_limit: parse_or(var("SUGGESTOR_RESULTS_LIMIT"), "SUGGESTOR_RESULTS_LIMIT", defaults.results_limit)?,
            tweet_limit: parse_or(var("SUGGESTOR_TWEET_LIMIT"), "SUGGESTOR_TWEET_LIMIT", defaults.tweet_limit)?,
            lookback_days: parse_or(var("SUGGESTOR_LOOKBACK_DAYS"), "SUGGESTOR_LOOKBACK_DAYS", defaults.lookback_days)?,
            data_dir: var("SUGGESTOR_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            tasks_dir,
            target_total: parse_or(var("SUGGESTOR_TARGET_TOTAL"), "SUGGESTOR_TARGET_TOTAL", defaults.target_total)?,
            instagram_videos_only: parse_or(
                var("SUGGESTOR_INSTAGRAM_VIDEOS_ONLY"),
                "SUGGESTOR_INSTAGRAM_VIDEOS_ONLY",
                defaults.instagram_videos_only,
            )?,
            openai_api_key: var("OPENAI_API_KEY").or_else(|| var("OPENAI_KEY")),
            openai_model: var("SUGGESTOR_OPENAI_MODEL").unwrap_or(defaults.openai_model),
            transcript_language: var("SUGGESTOR_TRANSCRIPT_LANGUAGE")
                .unwrap_or(defaults.transcript_language),
            api_host: var("API_HOST").unwrap_or(defaults.api_host),
            api_port: parse_or(var("API_PORT"), "API_PORT", defaults.api_port)?,
        })
    }

    /// Scraping needs a key; everything downstream of the buffer does not.
    pub fn require_apify_key(&self) -> Result<&str> {
        self.apify_api_key.as_deref().ok_or_else(|| {
            SuggestorError::Config("APIFY_API_KEY environment variable is required".to_string())
        })
    }

    /// Remixing needs an OpenAI key; scraping and selection do not.
    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            SuggestorError::Config("OPENAI_API_KEY environment variable is required".to_string())
        })
    }

    pub fn buffer_path(&self) -> PathBuf {
        self.data_dir.join(BUFFER_FILE)
    }

    pub fn canonical_path(&self) -> PathBuf {
        self.data_dir.join(CANONICAL_FILE)
    }

    pub fn result_path(&self) -> PathBuf {
        self.data_dir.join(RESULT_FILE)
    }

    /// Log config values with secrets redacted.
    pub fn log_redacted(&self) {
        fn preview(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let n = v.len().min(5);
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  APIFY_API_KEY: {}", preview(&self.apify_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!("  data_dir: {}", self.data_dir.display());
        tracing::info!("  tasks_dir: {}", self.tasks_dir.display());
        tracing::info!(
            target_total = self.target_total,
            results_limit = self.results_limit,
            tweet_limit = self.tweet_limit,
            lookback_days = self.lookback_days,
            instagram_videos_only = self.instagram_videos_only,
            "  pipeline"
        );
        tracing::info!(
            model = %self.openai_model,
            transcript_language = %self.transcript_language,
            "  remix"
        );
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| SuggestorError::Config(format!("{key} has an invalid value: {v}"))),
        None => Ok(default),
    }
}
