//! Search module
//!
//! The incremental address resolution engine. Takes the evolving input
//! text, debounces it into suggestion lookups, keeps only the latest
//! generation's results, and commits to exactly one BBL either from a
//! picked suggestion or by resolving the raw text.

pub mod committer;
pub mod debouncer;
pub mod dismissal;
pub mod fetcher;
pub mod search_events;
mod search_state;
pub mod suggestion_list;

pub use committer::{
    GENERIC_ERROR_MESSAGE, NOT_FOUND_MESSAGE, Resolution, SelectionCommitter, SubmitOutcome,
};
pub use debouncer::{DueLookup, Mutation, QueryDebouncer};
pub use dismissal::DismissalController;
pub use fetcher::SuggestionFetcher;
pub use search_state::SearchState;
pub use suggestion_list::{ListState, SuggestionList};
