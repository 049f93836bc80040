/*!
 * Error types for the srtbatch library.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Only `ParseError` and `PersistenceError` abort a run. Provider failures are
 * absorbed per batch and turned into sentinel entries.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The backend answered without any usable content
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether retrying the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::AuthenticationError(_))
    }

    /// Map a non-success HTTP status and body to the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::RequestFailed(format!("request timed out: {}", error))
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that make the input unusable as a segment sequence
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input file could not be read
    #[error("Failed to read input file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input has content but not a single block matched the grammar
    #[error("No subtitle blocks found in non-empty input {path:?}")]
    NoSegments { path: PathBuf },

    /// The same index appears twice in the input
    #[error("Duplicate segment index {index} in {path:?}")]
    DuplicateIndex { index: String, path: PathBuf },
}

/// Errors reading or writing the ledger and output files
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The existing ledger could not be read during resume
    #[error("Failed to read ledger {path:?}: {source}")]
    LedgerRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A batch could not be appended to the ledger
    #[error("Failed to append to ledger {path:?}: {source}")]
    LedgerAppend {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The final output could not be written
    #[error("Failed to write output {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input could not be turned into segments
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Ledger or output I/O failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Batch size must be a positive integer
    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a pipeline run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pipeline(_) => 2,
            Self::Provider(_) => 3,
            Self::File(_) => 4,
            Self::Config(_) | Self::Unknown(_) => 1,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<PipelineError>() {
            Ok(e) => return Self::Pipeline(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ProviderError>() {
            Ok(e) => return Self::Provider(e),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(e) => Self::File(e.to_string()),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
