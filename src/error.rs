use thiserror::Error;

/// Startup errors for bblsearch
///
/// None of these come from the resolution engine itself; lookup failures
/// are recovered in place (see [`crate::lookup::LookupError`]).
#[derive(Debug, Error)]
pub enum BblError {
    #[error("Invalid config file {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
