use crate::error::*;
use std::fmt::Display;
use tracing::{error, info};

/// Logging and presentation helpers shared by every error type of the collator.
pub trait ErrorExt: Display {
    /// Stable upper-case identifier, e.g. `REDDIT_RATE_LIMIT`.
    fn error_code(&self) -> String;

    /// One sentence suitable for a terminal, without internal detail.
    fn user_friendly_message(&self) -> String;

    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "{}", self);
        self
    }
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "{}", self);
        match self {
            CoreError::RedditApi(e) => {
                error!(code = %e.error_code(), detail = ?e, "Reddit API failure");
            }
            CoreError::Config(e) => {
                error!(code = %e.error_code(), detail = ?e, "Configuration failure");
            }
            CoreError::Report(e) => {
                error!(code = %e.error_code(), detail = ?e, "Report failure");
            }
            _ => {}
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Report(e) => e.user_friendly_message(),
            CoreError::Io(e) => format!("File system error: {}", e),
            CoreError::Csv(_) => "Failed to write a tabular dump.".to_string(),
            CoreError::Network(_) => {
                "Could not reach Reddit. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Internal { .. } => "An unexpected error occurred.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        let code = match self {
            CoreError::RedditApi(_) => "REDDIT_API",
            CoreError::Config(_) => "CONFIG",
            CoreError::Report(_) => "REPORT",
            CoreError::Io(_) => "IO",
            CoreError::Csv(_) => "CSV",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::Internal { .. } => "INTERNAL",
        };
        code.to_string()
    }
}

impl ErrorExt for RedditApiError {
    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => {
                "Reddit rejected the app credentials. Check client_id and client_secret.".to_string()
            }
            RedditApiError::RateLimitExceeded { retry_after } => format!(
                "Too many requests. Reddit asked to wait {} seconds.",
                retry_after
            ),
            RedditApiError::Forbidden { resource } => format!(
                "Access denied to {}. The subreddit may be private or quarantined.",
                resource
            ),
            RedditApiError::SubredditNotFound { subreddit } => {
                format!("Subreddit '{}' not found or is private.", subreddit)
            }
            RedditApiError::PostNotFound { post_id } => {
                format!("Post '{}' disappeared while its comments were read.", post_id)
            }
            RedditApiError::InvalidToken => {
                "Reddit authentication token is invalid. Please check the app credentials."
                    .to_string()
            }
            RedditApiError::RequestTimeout => "Request to Reddit timed out.".to_string(),
            RedditApiError::InvalidResponse { .. } => {
                "Reddit answered with something other than a listing.".to_string()
            }
            RedditApiError::ServerError { status_code } => {
                format!("Reddit is having trouble (HTTP {}).", status_code)
            }
        }
    }

    fn error_code(&self) -> String {
        let code = match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED",
            RedditApiError::RateLimitExceeded { .. } => "REDDIT_RATE_LIMIT",
            RedditApiError::Forbidden { .. } => "REDDIT_FORBIDDEN",
            RedditApiError::SubredditNotFound { .. } => "REDDIT_SUBREDDIT_NOT_FOUND",
            RedditApiError::PostNotFound { .. } => "REDDIT_POST_NOT_FOUND",
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN",
            RedditApiError::RequestTimeout => "REDDIT_TIMEOUT",
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE",
            RedditApiError::ServerError { .. } => "REDDIT_SERVER_ERROR",
        };
        code.to_string()
    }
}

impl ErrorExt for ConfigError {
    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::MissingField { field } => {
                format!("Required configuration field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("Invalid value for configuration field '{}': {}", field, value)
            }
            ConfigError::PermissionDenied { path } => {
                format!("Permission denied reading configuration '{}'.", path)
            }
            ConfigError::Parse(e) => format!("Configuration file is not valid TOML: {}", e),
        }
    }

    fn error_code(&self) -> String {
        let code = match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        };
        code.to_string()
    }
}

impl ErrorExt for ReportError {
    fn user_friendly_message(&self) -> String {
        match self {
            ReportError::ChartFailed { chart, .. } => format!("Could not render chart '{}'.", chart),
            ReportError::OutputUnavailable { path } => {
                format!("Output directory '{}' could not be prepared.", path)
            }
        }
    }

    fn error_code(&self) -> String {
        let code = match self {
            ReportError::ChartFailed { .. } => "REPORT_CHART_FAILED",
            ReportError::OutputUnavailable { .. } => "REPORT_OUTPUT_UNAVAILABLE",
        };
        code.to_string()
    }
}

/// Logs failures at the edges: isolated forums, startup and process exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// Full error with its code at ERROR, then the user-facing sentence at INFO.
    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!(code = %error.error_code(), "{}", error.user_friendly_message());
    }
}
