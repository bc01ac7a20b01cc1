//! Suggestion fetching with superseded-result suppression
//!
//! Every lookup carries the generation it was issued for. A completion is
//! applied only if its generation is still the current one; anything older
//! is dropped, however late it arrives.

use std::collections::BTreeSet;

use super::debouncer::DueLookup;
use crate::lookup::{LookupError, Suggestion};
use crate::worker::{LookupRequest, RequestSender};

#[derive(Debug, Default)]
pub struct SuggestionFetcher {
    /// Generations with a lookup still outstanding
    in_flight: BTreeSet<u64>,
}

impl SuggestionFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the lookup to the worker
    ///
    /// Returns false when there is no worker to send to.
    pub fn issue(&mut self, request_tx: Option<&RequestSender>, lookup: DueLookup) -> bool {
        let Some(tx) = request_tx else {
            return false;
        };

        let generation = lookup.generation;
        let request = LookupRequest::Suggest {
            query: lookup.query,
            generation,
        };
        if tx.send(request).is_err() {
            log::debug!("Lookup worker gone; generation {} not fetched", generation);
            return false;
        }

        self.in_flight.insert(generation);
        true
    }

    /// Decide what a completed lookup contributes to visible state
    ///
    /// Returns None for a superseded generation. A failure for the current
    /// generation becomes an empty batch.
    pub fn accept(
        &mut self,
        generation: u64,
        current_generation: u64,
        result: Result<Vec<Suggestion>, LookupError>,
    ) -> Option<Vec<Suggestion>> {
        self.in_flight.remove(&generation);

        if generation != current_generation {
            log::debug!(
                "Dropping suggestions for generation {} (current: {})",
                generation,
                current_generation
            );
            return None;
        }

        match result {
            Ok(batch) => Some(batch),
            Err(e) => {
                log::debug!("Suggestion lookup failed: {}", e);
                Some(Vec::new())
            }
        }
    }

    /// Whether the lookup for `generation` is still outstanding
    pub fn is_fetching(&self, generation: u64) -> bool {
        self.in_flight.contains(&generation)
    }

    #[cfg(test)]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod fetcher_tests;
