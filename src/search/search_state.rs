//! Search session state
//!
//! Wires the debouncer, fetcher, suggestion list, dismissal policy and
//! committer together. All mutation happens in the handlers below, each of
//! which runs to completion on the caller's thread; lookups happen on the
//! worker and come back through `poll_responses`.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use super::committer::{GENERIC_ERROR_MESSAGE, Resolution, SelectionCommitter, SubmitOutcome};
use super::debouncer::{Mutation, QueryDebouncer};
use super::dismissal::DismissalController;
use super::fetcher::SuggestionFetcher;
use super::suggestion_list::{ListState, SuggestionList};
use crate::config::SearchConfig;
use crate::lookup::Suggestion;
use crate::navigation::{Intent, Navigator};
use crate::worker::{LookupResponse, RequestSender};

/// One interactive address-resolution session
pub struct SearchState<N: Navigator> {
    debouncer: QueryDebouncer,
    fetcher: SuggestionFetcher,
    list: SuggestionList,
    dismissal: DismissalController,
    committer: SelectionCommitter,
    navigator: N,
    /// Intent attached to ordinary commits
    intent: Intent,
    /// Channel to send lookups to the worker thread
    request_tx: Option<RequestSender>,
    /// Channel to receive lookup results from the worker thread
    response_rx: Option<Receiver<LookupResponse>>,
    /// User-visible message from the last submission
    message: Option<String>,
}

impl<N: Navigator> SearchState<N> {
    pub fn new(config: &SearchConfig, navigator: N) -> Self {
        Self {
            debouncer: QueryDebouncer::new(config.quiet_period(), config.min_query_len),
            fetcher: SuggestionFetcher::new(),
            list: SuggestionList::new(),
            dismissal: DismissalController::new(true),
            committer: SelectionCommitter::new(),
            navigator,
            intent: Intent::View,
            request_tx: None,
            response_rx: None,
            message: None,
        }
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(&mut self, request_tx: RequestSender, response_rx: Receiver<LookupResponse>) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    pub fn query(&self) -> &str {
        self.debouncer.query()
    }

    pub fn generation(&self) -> u64 {
        self.debouncer.generation()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        self.list.suggestions()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.list.cursor()
    }

    pub fn list_state(&self) -> ListState {
        self.list.state()
    }

    pub fn is_visible(&self) -> bool {
        self.dismissal.is_visible(&self.list)
    }

    pub fn is_focused(&self) -> bool {
        self.dismissal.is_focused()
    }

    pub fn is_submitting(&self) -> bool {
        self.committer.is_submitting()
    }

    /// Whether suggestions for the current query are still on their way
    pub fn is_fetching(&self) -> bool {
        self.debouncer.is_pending() || self.fetcher.is_fetching(self.debouncer.generation())
    }

    /// Whether the worker can still deliver responses
    pub fn is_connected(&self) -> bool {
        self.response_rx.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    #[cfg(test)]
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    // =========================================================================
    // Query input
    // =========================================================================

    /// Handle a change of the input text observed at `now`
    ///
    /// Returns false if the text did not actually change. The query is
    /// frozen while a submission is outstanding.
    pub fn set_query(&mut self, text: &str, now: Instant) -> bool {
        if self.committer.is_submitting() {
            return false;
        }
        self.dismissal.on_typing();
        match self.debouncer.on_mutation(text, now) {
            Mutation::Unchanged => false,
            Mutation::BelowThreshold => {
                self.list.clear();
                true
            }
            Mutation::Scheduled => {
                self.list.reset_cursor();
                true
            }
        }
    }

    /// Issue the debounced lookup once its quiet period has elapsed
    ///
    /// Returns true if a lookup was sent.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(due) => self.fetcher.issue(self.request_tx.as_ref(), due),
            None => false,
        }
    }

    /// How long the host may sleep before the next `tick` matters
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    // =========================================================================
    // Worker responses
    // =========================================================================

    /// Drain all responses the worker has delivered so far
    ///
    /// Returns the number of responses handled.
    pub fn poll_responses(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let Some(rx) = self.response_rx.as_ref() else {
                return handled;
            };
            match rx.try_recv() {
                Ok(response) => {
                    self.handle_response(response);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => return handled,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Lookup worker disconnected");
                    self.response_rx = None;
                    return handled;
                }
            }
        }
    }

    /// Wait up to `timeout` for one response, then drain the rest
    pub fn wait_for_responses(&mut self, timeout: Duration) -> usize {
        let first = match self.response_rx.as_ref() {
            Some(rx) => rx.recv_timeout(timeout),
            None => return 0,
        };
        match first {
            Ok(response) => {
                self.handle_response(response);
                1 + self.poll_responses()
            }
            Err(RecvTimeoutError::Timeout) => 0,
            Err(RecvTimeoutError::Disconnected) => {
                self.response_rx = None;
                0
            }
        }
    }

    pub fn handle_response(&mut self, response: LookupResponse) {
        match response {
            LookupResponse::Suggestions { generation, result } => {
                let current = self.debouncer.generation();
                if let Some(batch) = self.fetcher.accept(generation, current, result) {
                    self.list.replace(batch);
                }
            }
            LookupResponse::Resolved { request_id, result } => {
                match self
                    .committer
                    .on_resolved(request_id, result, &mut self.navigator)
                {
                    Resolution::Navigated => self.close_session(),
                    Resolution::Stale => {}
                    Resolution::NotFound(message) | Resolution::Failed(message) => {
                        self.message = Some(message);
                    }
                }
            }
        }
    }

    // =========================================================================
    // List interaction
    // =========================================================================

    pub fn move_down(&mut self) -> bool {
        self.is_visible() && self.list.move_down()
    }

    pub fn move_up(&mut self) -> bool {
        self.is_visible() && self.list.move_up()
    }

    /// Escape: hide the list, keep the batch
    pub fn escape(&mut self) -> bool {
        self.dismissal.on_escape(&mut self.list)
    }

    /// Input regained focus
    pub fn focus(&mut self) -> bool {
        self.dismissal.on_focus(&mut self.list)
    }

    /// Input lost focus without an outside click (e.g. Tab)
    pub fn blur(&mut self) {
        self.dismissal.on_blur();
    }

    /// Pointer interaction outside the input and list
    pub fn outside_interaction(&mut self) -> bool {
        self.dismissal.on_outside_interaction(&mut self.list)
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Commit the suggestion at `index` (list click)
    pub fn select(&mut self, index: usize) -> SubmitOutcome {
        if !self.is_visible() {
            return SubmitOutcome::NoSelection;
        }
        let Some(suggestion) = self.list.get(index).cloned() else {
            return SubmitOutcome::NoSelection;
        };
        self.commit_suggestion(&suggestion, self.intent)
    }

    /// Enter / form submit
    ///
    /// Commits the highlighted suggestion if there is one; otherwise the raw
    /// query goes to exact resolution. List population alone never counts
    /// as a selection.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.committer.is_submitting() {
            return SubmitOutcome::Busy;
        }
        match self.list.selected().cloned() {
            Some(suggestion) => self.commit_suggestion(&suggestion, self.intent),
            None => self.submit_raw(self.intent),
        }
    }

    /// Resolve the raw query and open the building page with the review form
    pub fn submit_for_review(&mut self) -> SubmitOutcome {
        self.submit_raw(Intent::Review)
    }

    fn commit_suggestion(&mut self, suggestion: &Suggestion, intent: Intent) -> SubmitOutcome {
        let outcome = self
            .committer
            .commit_selection(suggestion, intent, &mut self.navigator);
        if outcome == SubmitOutcome::Navigated {
            self.message = None;
            self.close_session();
        }
        outcome
    }

    fn submit_raw(&mut self, intent: Intent) -> SubmitOutcome {
        let query = self.debouncer.query().to_string();
        let outcome = self
            .committer
            .submit_raw(&query, intent, self.request_tx.as_ref());
        match outcome {
            SubmitOutcome::Requested { .. } => {
                self.message = None;
                self.close_session();
            }
            SubmitOutcome::Unavailable => {
                self.message = Some(GENERIC_ERROR_MESSAGE.to_string());
            }
            SubmitOutcome::Navigated
            | SubmitOutcome::Busy
            | SubmitOutcome::EmptyQuery
            | SubmitOutcome::NoSelection => {}
        }
        outcome
    }

    /// Empty the list and supersede every suggestion lookup issued so far,
    /// so nothing reappears over the page being navigated to
    fn close_session(&mut self) {
        self.list.clear();
        self.debouncer.invalidate();
    }
}

#[cfg(test)]
#[path = "search_state_tests.rs"]
mod search_state_tests;
