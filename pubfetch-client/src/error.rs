use std::{io, result};

use pubfetch_parser::ParseError;
use thiserror::Error;

use crate::retry::RetryableError;

/// Error types for E-utilities and enrichment operations
#[derive(Error, Debug)]
pub enum PubFetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Fetched XML could not be turned into records
    #[error("Record parsing failed: {0}")]
    ParseError(#[from] ParseError),

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// API rate limit exceeded
    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    /// A search without a limit matched more ids than a single page can hold
    #[error("Search matched {count} articles, more than {maximum}; set a limit to fetch a subset")]
    TooManyResults { count: usize, maximum: usize },

    /// IO error for file operations
    #[error("IO error: {message}")]
    IoError { message: String },

    /// Impact factor table could not be read
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Translation endpoint returned something unusable
    #[error("Translation failed: {message}")]
    TranslationError { message: String },
}

pub type Result<T> = result::Result<T, PubFetchError>;

impl From<io::Error> for PubFetchError {
    fn from(err: io::Error) -> Self {
        PubFetchError::IoError {
            message: err.to_string(),
        }
    }
}

impl RetryableError for PubFetchError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            PubFetchError::RequestError(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                // Check for server errors (5xx)
                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                // DNS and other network errors
                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }

            // Rate limiting should be retried after delay
            PubFetchError::RateLimitExceeded => true,

            // Server errors (5xx) and rate limiting (429) are retryable
            PubFetchError::ApiError { status, message } => {
                (*status >= 500 && *status < 600) || *status == 429 || {
                    let lower_msg = message.to_lowercase();
                    lower_msg.contains("temporarily unavailable")
                        || lower_msg.contains("timeout")
                        || lower_msg.contains("connection")
                }
            }

            // An unusable translation payload is worth another attempt
            PubFetchError::TranslationError { .. } => true,

            PubFetchError::JsonError(_)
            | PubFetchError::ParseError(_)
            | PubFetchError::TooManyResults { .. }
            | PubFetchError::IoError { .. }
            | PubFetchError::CsvError(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                PubFetchError::RequestError(err) if err.is_timeout() => "Request timeout",
                PubFetchError::RequestError(err) if err.is_connect() => "Connection error",
                PubFetchError::RequestError(_) => "Network error",
                PubFetchError::RateLimitExceeded => "Rate limit exceeded",
                PubFetchError::ApiError { status, .. } => match status {
                    429 => "Rate limit exceeded",
                    500..=599 => "Server error",
                    _ => "Temporary API error",
                },
                PubFetchError::TranslationError { .. } => "Unexpected translation response",
                _ => "Transient error",
            }
        } else {
            match self {
                PubFetchError::JsonError(_) => "Invalid JSON response",
                PubFetchError::ParseError(_) => "Invalid XML response",
                PubFetchError::TooManyResults { .. } => "Search too broad",
                PubFetchError::IoError { .. } => "File system error",
                PubFetchError::CsvError(_) => "Invalid CSV data",
                _ => "Non-transient error",
            }
        }
    }
}
