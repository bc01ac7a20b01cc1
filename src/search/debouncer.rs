//! Query debouncing
//!
//! Owns the query text and its generation counter. Every real change bumps
//! the generation; a qualifying change schedules one lookup at the end of
//! the quiet period, replacing whatever was scheduled before.

use std::time::{Duration, Instant};

/// What a query mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Same text as before; nothing happened
    Unchanged,
    /// Too short to look up; any scheduled lookup was cancelled
    BelowThreshold,
    /// A lookup is scheduled for the end of the quiet period
    Scheduled,
}

/// A lookup whose quiet period has elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueLookup {
    pub query: String,
    pub generation: u64,
}

/// Trailing-edge debouncer with an injected clock
#[derive(Debug)]
pub struct QueryDebouncer {
    quiet_period: Duration,
    min_query_len: usize,
    query: String,
    generation: u64,
    deadline: Option<Instant>,
}

impl QueryDebouncer {
    pub fn new(quiet_period: Duration, min_query_len: usize) -> Self {
        Self {
            quiet_period,
            min_query_len,
            query: String::new(),
            generation: 0,
            deadline: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Generation of the latest query revision
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record a new query value observed at `now`
    pub fn on_mutation(&mut self, text: &str, now: Instant) -> Mutation {
        if text == self.query {
            return Mutation::Unchanged;
        }

        self.query.clear();
        self.query.push_str(text);
        self.generation = self.generation.wrapping_add(1);
        self.cancel();

        if text.chars().count() < self.min_query_len {
            return Mutation::BelowThreshold;
        }

        self.deadline = Some(now + self.quiet_period);
        Mutation::Scheduled
    }

    /// Fire the scheduled lookup if its quiet period has elapsed by `now`
    pub fn poll(&mut self, now: Instant) -> Option<DueLookup> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(DueLookup {
                    query: self.query.clone(),
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }

    /// Cancel the scheduled lookup, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Supersede every lookup issued so far without changing the text
    ///
    /// Results tagged with an older generation will be discarded.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cancel();
    }

    /// Time left before the scheduled lookup fires
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
