//! Selection commit
//!
//! The terminal step of a search session. A picked suggestion navigates
//! immediately; raw text goes to the exact-resolution endpoint first. Only
//! one submission may be outstanding at a time.

use crate::lookup::{LookupError, ResolveOutcome, Suggestion};
use crate::navigation::{Destination, Intent, Navigator};
use crate::worker::{LookupRequest, RequestSender};

pub const NOT_FOUND_MESSAGE: &str = "Address not found. Try including borough name.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Result of a commit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Navigation issued straight from a suggestion
    Navigated,
    /// Resolution request sent to the worker
    Requested { request_id: u64 },
    /// A previous submission is still outstanding
    Busy,
    /// Blank query; nothing was sent
    EmptyQuery,
    /// No suggestion on screen at the requested index
    NoSelection,
    /// No worker to send the resolution request to
    Unavailable,
}

/// What a resolution response did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Navigated,
    /// No identifier for the text; carries the message to show
    NotFound(String),
    /// Transport or decode failure; carries the message to show
    Failed(String),
    /// Response for a request that is no longer outstanding
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct PendingResolution {
    request_id: u64,
    intent: Intent,
}

#[derive(Debug, Default)]
pub struct SelectionCommitter {
    /// Set from the first commit until navigation or a surfaced error
    submitting: bool,
    request_id: u64,
    pending: Option<PendingResolution>,
}

impl SelectionCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Request ID of the outstanding resolution, if any
    pub fn pending_request_id(&self) -> Option<u64> {
        self.pending.map(|p| p.request_id)
    }

    /// Commit a suggestion the user picked; no lookup needed
    pub fn commit_selection<N: Navigator>(
        &mut self,
        suggestion: &Suggestion,
        intent: Intent,
        navigator: &mut N,
    ) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }

        self.submitting = true;
        navigator.navigate(Destination::new(suggestion.identifier.clone(), intent));
        SubmitOutcome::Navigated
    }

    /// Send raw text for exact resolution
    ///
    /// The text is sent as typed; trimming only decides whether it is blank.
    pub fn submit_raw(
        &mut self,
        text: &str,
        intent: Intent,
        request_tx: Option<&RequestSender>,
    ) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }
        if text.trim().is_empty() {
            return SubmitOutcome::EmptyQuery;
        }
        let Some(tx) = request_tx else {
            return SubmitOutcome::Unavailable;
        };

        let request_id = self.request_id.wrapping_add(1);
        let request = LookupRequest::Resolve {
            address: text.to_string(),
            request_id,
        };
        if tx.send(request).is_err() {
            log::debug!("Lookup worker gone; resolution not sent");
            return SubmitOutcome::Unavailable;
        }

        self.request_id = request_id;
        self.submitting = true;
        self.pending = Some(PendingResolution { request_id, intent });
        SubmitOutcome::Requested { request_id }
    }

    /// Apply the response to the outstanding resolution request
    pub fn on_resolved<N: Navigator>(
        &mut self,
        request_id: u64,
        result: Result<ResolveOutcome, LookupError>,
        navigator: &mut N,
    ) -> Resolution {
        let Some(pending) = self.pending.take_if(|p| p.request_id == request_id) else {
            log::debug!(
                "Ignoring resolution for request {} (pending: {:?})",
                request_id,
                self.pending_request_id()
            );
            return Resolution::Stale;
        };

        match result {
            Ok(ResolveOutcome::Resolved(bbl)) => {
                navigator.navigate(Destination::new(bbl, pending.intent));
                Resolution::Navigated
            }
            Ok(ResolveOutcome::NotFound { message }) => {
                self.submitting = false;
                Resolution::NotFound(message.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()))
            }
            Err(e) => {
                log::debug!("Resolution request {} failed: {}", request_id, e);
                self.submitting = false;
                Resolution::Failed(GENERIC_ERROR_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "committer_tests.rs"]
mod committer_tests;
