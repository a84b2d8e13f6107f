//! Typed errors for listing synchronization
//!
//! # Error Categories
//!
//! - [`FetchError`]: the fetch adapter could not produce a collection
//! - [`ConfigError`]: configuration could not be read, parsed or validated
//!
//! Both roll up into [`ListingError`]. Query updates and view recomputation
//! are total and have no error type.
//!
//! # Example
//!
//! ```rust,ignore
//! match session.complete_fetch(ticket, adapter.fetch_all().await) {
//!     FetchOutcome::Failed(err) => {
//!         tracing::warn!(kind = err.kind(), "listing fetch failed");
//!     }
//!     _ => {}
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate
#[derive(Debug, Error)]
pub enum ListingError {
    /// Fetching the canonical collection failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ListingError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListingError::Fetch(e) => e.error_code(),
            ListingError::Config(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Failures reported by a [`FetchAdapter`](crate::core::fetch::FetchAdapter).
///
/// The render side never distinguishes these: every variant degrades the view
/// to "collection unavailable". The variants only matter for logging and for
/// the caller's retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("network error: {message}")]
    Network { message: String },

    /// The backend answered with a failure
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The session is not allowed to read the collection
    #[error("not authorized: {message}")]
    Auth { message: String },

    /// The response body could not be decoded into listings
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        FetchError::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        FetchError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        FetchError::Auth {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        FetchError::Decode {
            message: message.into(),
        }
    }

    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "network",
            FetchError::Server { .. } => "server",
            FetchError::Auth { .. } => "auth",
            FetchError::Decode { .. } => "decode",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "FETCH_NETWORK_ERROR",
            FetchError::Server { .. } => "FETCH_SERVER_ERROR",
            FetchError::Auth { .. } => "FETCH_AUTH_ERROR",
            FetchError::Decode { .. } => "FETCH_DECODE_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading a [`ViewConfig`](crate::config::ViewConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is malformed
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is outside its allowed range
    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}
