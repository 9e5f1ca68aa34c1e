//! Application configuration loaded once at startup from a TOML file.
//!
//! The file is sectioned key/value. Only `[reddit]` and `[subreddits]` are
//! required; every other section falls back to defaults.

use crate::error::{ConfigError, CoreError};
use serde::{Deserialize, Deserializer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_SCHEDULE: &str = "0 0 0 * * *";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditCredentials,
    pub subreddits: SubredditList,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubredditList {
    names: ForumNames,
}

/// Either `names = "a, b"` or `names = ["a", "b"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ForumNames {
    CommaSeparated(String),
    List(Vec<String>),
}

impl SubredditList {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: ForumNames::List(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Trimmed forum names with blanks dropped, in configured order.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match &self.names {
            ForumNames::CommaSeparated(names) => names.split(',').collect(),
            ForumNames::List(names) => names.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_posts")]
    pub max_posts: u32,
    #[serde(default = "default_max_comments")]
    pub max_comments_per_post: u32,
    /// Keep processing the remaining forums when one fails.
    #[serde(default)]
    pub isolate_failures: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_posts: default_max_posts(),
            max_comments_per_post: default_max_comments(),
            isolate_failures: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// TrueType font used for chart text. System fonts are searched when unset.
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            font: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first), evaluated in local time.
    #[serde(default = "default_schedule")]
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_schedule(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Appended to on every run, in addition to stdout. `file = ""` logs to stdout only.
    #[serde(default = "default_log_file", deserialize_with = "optional_log_file")]
    pub file: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_max_posts() -> u32 {
    100
}

fn default_max_comments() -> u32 {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("reddit_analysis.log"))
}

fn optional_log_file<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = PathBuf::deserialize(deserializer)?;
    Ok((!path.as_os_str().is_empty()).then_some(path))
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CoreError::from(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }),
            ErrorKind::PermissionDenied => CoreError::from(ConfigError::PermissionDenied {
                path: path.display().to_string(),
            }),
            _ => CoreError::Io(e),
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, CoreError> {
        let config: AppConfig = toml::from_str(contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("reddit.client_id", &self.reddit.client_id),
            ("reddit.client_secret", &self.reddit.client_secret),
            ("reddit.user_agent", &self.reddit.user_agent),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        if self.analysis.max_posts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.max_posts".to_string(),
                value: "0".to_string(),
            });
        }
        if self.analysis.max_comments_per_post == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.max_comments_per_post".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    pub fn forums(&self) -> Vec<String> {
        self.subreddits.names()
    }
}
