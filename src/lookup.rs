//! Lookup service abstraction
//!
//! Defines the two endpoints the resolver talks to (suggestion search and
//! exact address resolution) as an injected capability, the LookupError
//! taxonomy, and the reqwest-backed implementation.

use futures::future::BoxFuture;
use thiserror::Error;

mod http;
mod suggestion;

pub use http::HttpLookupClient;
pub use suggestion::{Bbl, Borough, Suggestion, UnknownBorough};

/// Errors that can occur while talking to a lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure (connect, timeout, broken body)
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of an exact-resolution request that reached the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Bbl),
    /// No identifier for this input; `message` is the endpoint's own
    /// explanation when it sent one
    NotFound { message: Option<String> },
}

/// The two lookup endpoints
///
/// Implementations must be shareable across tasks: the worker runs every
/// request as its own task so completions may arrive out of order.
pub trait LookupService: Send + Sync + 'static {
    /// `GET /api/autocomplete?q=<query>`
    fn autocomplete<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Suggestion>, LookupError>>;

    /// `GET /api/lookup?address=<address>`
    fn resolve<'a>(&'a self, address: &'a str)
    -> BoxFuture<'a, Result<ResolveOutcome, LookupError>>;
}
