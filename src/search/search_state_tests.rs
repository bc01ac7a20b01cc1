//! Tests for the search session state

use super::*;
use crate::lookup::{LookupError, ResolveOutcome};
use crate::navigation::Destination;
use crate::search::committer::NOT_FOUND_MESSAGE;
use crate::test_utils::test_helpers::{Harness, batch_with_prefix, bbl, sample_batch};
use crate::worker::LookupRequest;
use proptest::prelude::*;

fn suggest(query: &str, generation: u64) -> LookupRequest {
    LookupRequest::Suggest {
        query: query.to_string(),
        generation,
    }
}

// =========================================================================
// Debounced fetching
// =========================================================================

#[test]
fn test_short_query_issues_no_lookup() {
    let mut h = Harness::new();

    h.type_at("3", 0);
    h.tick_at(1_000);

    assert!(h.sent().is_empty());
    assert!(h.state.suggestions().is_empty());
    assert!(!h.state.is_visible());
    assert_eq!(h.state.list_state(), ListState::Empty);
}

#[test]
fn test_shrinking_below_threshold_clears_list() {
    let mut h = Harness::new();
    h.populate("35", sample_batch(3));
    assert!(h.state.is_visible());

    h.type_at("3", 2_000);

    assert!(h.state.suggestions().is_empty());
    assert!(!h.state.is_visible());
}

#[test]
fn test_burst_fires_one_lookup_with_final_query() {
    let mut h = Harness::new();

    h.type_at("35", 0);
    h.tick_at(50);
    h.type_at("350", 100);
    h.tick_at(150);
    h.type_at("350 5", 250);
    h.tick_at(400);
    assert!(h.sent().is_empty());

    assert!(h.tick_at(450));
    assert!(!h.tick_at(2_000));

    assert_eq!(h.sent(), vec![suggest("350 5", 3)]);
}

#[test]
fn test_out_of_order_completion_keeps_latest_generation() {
    let mut h = Harness::new();

    h.type_at("35", 0);
    h.tick_at(200);
    h.type_at("350", 250);
    h.tick_at(450);
    assert_eq!(h.sent(), vec![suggest("35", 1), suggest("350", 2)]);

    let g1 = batch_with_prefix("1", 5);
    let g2 = batch_with_prefix("3", 2);

    // G2 lands first, G1 straggles in after
    h.deliver_batch(2, g2.clone());
    h.deliver_batch(1, g1);

    assert_eq!(h.state.suggestions(), g2.as_slice());
    assert!(h.state.is_visible());
}

#[test]
fn test_stale_result_dropped_even_when_alone() {
    let mut h = Harness::new();

    h.type_at("35", 0);
    h.tick_at(200);
    h.type_at("350", 250);

    h.deliver_batch(1, sample_batch(3));

    assert!(h.state.suggestions().is_empty());
    assert!(!h.state.is_visible());
}

#[test]
fn test_fetch_failure_degrades_silently() {
    let mut h = Harness::new();
    h.populate("35", sample_batch(3));

    h.type_at("350", 2_000);
    h.tick_at(2_200);
    let generation = h.state.generation();
    h.deliver(LookupResponse::Suggestions {
        generation,
        result: Err(LookupError::Network("connection reset".to_string())),
    });

    assert!(h.state.suggestions().is_empty());
    assert!(!h.state.is_visible());
    assert_eq!(h.state.message(), None);
}

#[test]
fn test_empty_batch_empties_list() {
    let mut h = Harness::new();
    h.populate("35", sample_batch(3));

    h.type_at("35x", 2_000);
    h.tick_at(2_200);
    let generation = h.state.generation();
    h.deliver_batch(generation, Vec::new());

    assert_eq!(h.state.list_state(), ListState::Empty);
}

#[test]
fn test_is_fetching_tracks_current_generation() {
    let mut h = Harness::new();
    assert!(!h.state.is_fetching());

    h.type_at("350", 0);
    assert!(h.state.is_fetching());
    h.tick_at(200);
    assert!(h.state.is_fetching());

    h.deliver_batch(1, sample_batch(1));
    assert!(!h.state.is_fetching());
}

#[test]
fn test_query_change_resets_cursor_but_keeps_batch() {
    let mut h = Harness::new();
    h.populate("35", sample_batch(3));
    h.state.move_down();
    h.state.move_down();
    assert_eq!(h.state.cursor(), Some(1));

    h.type_at("350", 2_000);

    assert_eq!(h.state.cursor(), None);
    assert_eq!(h.state.suggestions().len(), 3);
}

#[test]
fn test_next_deadline_follows_debouncer() {
    let mut h = Harness::new();
    assert_eq!(h.state.next_deadline(h.at(0)), None);

    h.type_at("350", 0);
    assert_eq!(
        h.state.next_deadline(h.at(50)),
        Some(Duration::from_millis(150))
    );
}

// =========================================================================
// Keyboard selection
// =========================================================================

#[test]
fn test_keyboard_selection_navigates_without_lookup() {
    let mut h = Harness::new();
    let batch = sample_batch(4);
    h.populate("350", batch.clone());

    h.state.move_down();
    h.state.move_down();
    h.state.move_down();
    let outcome = h.state.submit();

    assert_eq!(outcome, SubmitOutcome::Navigated);
    assert_eq!(
        h.navigations(),
        &[Destination::new(batch[2].identifier.clone(), Intent::View)]
    );
    assert!(h.sent().is_empty());
    assert_eq!(h.state.list_state(), ListState::Empty);
    assert!(h.state.is_submitting());
}

#[test]
fn test_first_down_highlights_first_row() {
    let mut h = Harness::new();
    let batch = sample_batch(3);
    h.populate("350", batch.clone());

    h.state.move_down();
    h.state.submit();

    assert_eq!(h.navigations()[0].bbl, batch[0].identifier);
}

#[test]
fn test_navigation_keys_ignored_while_hidden() {
    let mut h = Harness::new();
    h.populate("350", sample_batch(3));
    h.state.escape();

    assert!(!h.state.move_down());
    assert_eq!(h.state.cursor(), None);
}

#[test]
fn test_click_selects_row() {
    let mut h = Harness::new();
    let batch = sample_batch(3);
    h.populate("350", batch.clone());

    assert_eq!(h.state.select(1), SubmitOutcome::Navigated);
    assert_eq!(h.navigations()[0].bbl, batch[1].identifier);
    assert!(h.sent().is_empty());
}

#[test]
fn test_click_out_of_range_does_nothing() {
    let mut h = Harness::new();
    h.populate("350", sample_batch(2));

    assert_eq!(h.state.select(5), SubmitOutcome::NoSelection);
    assert!(h.navigations().is_empty());
    assert!(h.state.is_visible());
}

#[test]
fn test_selection_is_idempotent() {
    let mut h = Harness::new();
    h.populate("350", sample_batch(3));

    h.state.select(0);
    assert_eq!(h.state.select(0), SubmitOutcome::NoSelection);
    assert_eq!(h.state.submit(), SubmitOutcome::Busy);
    assert_eq!(h.navigations().len(), 1);
}

// =========================================================================
// Raw submission
// =========================================================================

#[test]
fn test_raw_submit_sends_literal_query() {
    let mut h = Harness::new();
    h.populate("350 5th Ave", sample_batch(3));

    let outcome = h.state.submit();

    assert_eq!(outcome, SubmitOutcome::Requested { request_id: 1 });
    assert_eq!(
        h.sent(),
        vec![LookupRequest::Resolve {
            address: "350 5th Ave".to_string(),
            request_id: 1
        }]
    );
    assert!(h.navigations().is_empty());
}

#[test]
fn test_raw_submit_resolves_and_navigates() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();

    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::Resolved(bbl("1008350041"))),
    });

    assert_eq!(
        h.navigations(),
        &[Destination::new(bbl("1008350041"), Intent::View)]
    );
}

#[test]
fn test_not_found_keeps_query_and_reenables_submit() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();
    assert!(h.state.is_submitting());

    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::NotFound {
            message: Some("not found".to_string()),
        }),
    });

    assert_eq!(h.state.query(), "350 5th Ave");
    assert!(!h.state.is_submitting());
    assert_eq!(h.state.message(), Some("not found"));
    assert!(h.navigations().is_empty());
}

#[test]
fn test_not_found_default_message() {
    let mut h = Harness::new();
    h.type_at("nowhere", 0);
    h.state.submit();

    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::NotFound { message: None }),
    });

    assert_eq!(h.state.message(), Some(NOT_FOUND_MESSAGE));
}

#[test]
fn test_transport_error_allows_manual_retry() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();

    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Err(LookupError::Network("timed out".to_string())),
    });

    assert_eq!(h.state.message(), Some(GENERIC_ERROR_MESSAGE));
    assert!(!h.state.is_submitting());
    h.sent();

    assert_eq!(h.state.submit(), SubmitOutcome::Requested { request_id: 2 });
    assert_eq!(h.state.message(), None);
    assert_eq!(h.sent().len(), 1);
}

#[test]
fn test_resubmit_blocked_while_outstanding() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);

    h.state.submit();
    assert_eq!(h.state.submit(), SubmitOutcome::Busy);
    assert_eq!(h.state.submit_for_review(), SubmitOutcome::Busy);

    assert_eq!(h.sent().len(), 1);
}

#[test]
fn test_blank_query_is_not_submitted() {
    let mut h = Harness::new();
    h.type_at("   ", 0);

    assert_eq!(h.state.submit(), SubmitOutcome::EmptyQuery);
    assert!(h.sent().is_empty());
    assert!(!h.state.is_submitting());
}

#[test]
fn test_submit_without_worker_surfaces_error() {
    let mut state = SearchState::new(
        &SearchConfig::default(),
        crate::test_utils::test_helpers::RecordingNavigator::default(),
    );
    state.set_query("350 5th Ave", Instant::now());

    assert_eq!(state.submit(), SubmitOutcome::Unavailable);
    assert_eq!(state.message(), Some(GENERIC_ERROR_MESSAGE));
    assert!(!state.is_submitting());
}

#[test]
fn test_enter_after_escape_submits_raw_text() {
    let mut h = Harness::new();
    h.populate("350 5th", sample_batch(3));
    h.state.move_down();
    h.state.escape();

    let outcome = h.state.submit();

    assert_eq!(outcome, SubmitOutcome::Requested { request_id: 1 });
    assert!(h.navigations().is_empty());
}

#[test]
fn test_review_submission_carries_intent() {
    let mut h = Harness::new();
    h.populate("350 5th Ave", sample_batch(2));
    h.state.move_down();

    // Review always resolves the raw text
    assert_eq!(
        h.state.submit_for_review(),
        SubmitOutcome::Requested { request_id: 1 }
    );
    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::Resolved(bbl("1008350041"))),
    });

    assert_eq!(h.navigations()[0].path(), "/building/1008350041?review=true");
}

#[test]
fn test_default_intent_applies_to_selection() {
    let mut h = Harness::new();
    h.state.set_intent(Intent::Review);
    h.populate("350", sample_batch(2));

    h.state.select(0);

    assert_eq!(h.navigations()[0].intent, Intent::Review);
}

// =========================================================================
// Commit closes the session
// =========================================================================

#[test]
fn test_commit_discards_in_flight_suggestions() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.tick_at(200);
    let issued = h.state.generation();

    h.state.submit();
    assert_eq!(h.state.list_state(), ListState::Empty);

    // The suggestion lookup issued before the commit finishes afterwards
    h.deliver_batch(issued, sample_batch(3));

    assert_eq!(h.state.list_state(), ListState::Empty);
    assert!(!h.state.is_visible());
}

#[test]
fn test_commit_cancels_scheduled_lookup() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);

    h.state.submit();
    h.sent();

    assert!(!h.tick_at(1_000));
    assert!(h.sent().is_empty());
}

#[test]
fn test_not_found_then_edit_fetches_again() {
    let mut h = Harness::new();
    h.type_at("350 5th", 0);
    h.state.submit();
    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::NotFound { message: None }),
    });
    h.sent();

    h.type_at("350 5th Ave Manhattan", 1_000);
    h.tick_at(1_200);

    let generation = h.state.generation();
    assert_eq!(h.sent(), vec![suggest("350 5th Ave Manhattan", generation)]);
    h.deliver_batch(generation, sample_batch(1));
    assert!(h.state.is_visible());
}

#[test]
fn test_query_frozen_while_resolution_outstanding() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();
    h.sent();

    assert!(!h.type_at("350 5th Av", 100));
    assert!(!h.tick_at(400));
    let generation = h.state.generation();
    h.deliver_batch(generation, sample_batch(3));
    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::Resolved(bbl("1008350041"))),
    });

    assert!(h.sent().is_empty());
    assert_eq!(h.state.query(), "350 5th Ave");
    assert_eq!(h.state.list_state(), ListState::Empty);
    assert!(!h.state.is_visible());
    assert_eq!(h.navigations().len(), 1);
}

#[test]
fn test_navigation_empties_list() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();

    // A batch for the current generation sneaking in before the answer
    let generation = h.state.generation();
    h.deliver_batch(generation, sample_batch(2));
    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::Resolved(bbl("1008350041"))),
    });

    assert_eq!(h.state.list_state(), ListState::Empty);
    assert_ne!(h.state.generation(), generation);
}

#[test]
fn test_query_editable_again_after_not_found() {
    let mut h = Harness::new();
    h.type_at("350 5th Ave", 0);
    h.state.submit();
    assert!(!h.type_at("350 5th", 50));

    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::NotFound { message: None }),
    });

    assert!(h.type_at("350 5th", 100));
    assert_eq!(h.state.query(), "350 5th");
}

// =========================================================================
// Dismissal
// =========================================================================

#[test]
fn test_escape_hides_and_focus_reshows_without_fetch() {
    let mut h = Harness::new();
    let batch = sample_batch(3);
    h.populate("350", batch.clone());

    assert!(h.state.escape());
    assert!(!h.state.is_visible());
    assert_eq!(h.state.suggestions(), batch.as_slice());

    assert!(h.state.focus());
    assert!(h.state.is_visible());
    assert_eq!(h.state.suggestions(), batch.as_slice());
    assert!(h.sent().is_empty());
}

#[test]
fn test_outside_click_dismisses_then_typing_works() {
    let mut h = Harness::new();
    h.populate("350", sample_batch(3));

    assert!(h.state.outside_interaction());
    assert_eq!(h.state.list_state(), ListState::Dismissed);
    assert!(!h.state.is_visible());

    h.type_at("350 5", 2_000);
    h.tick_at(2_200);
    let generation = h.state.generation();
    assert_eq!(h.sent(), vec![suggest("350 5", generation)]);

    let fresh = batch_with_prefix("3", 2);
    h.deliver_batch(generation, fresh.clone());
    assert!(h.state.is_visible());
    assert_eq!(h.state.suggestions(), fresh.as_slice());
}

#[test]
fn test_blur_hides_and_focus_restores() {
    let mut h = Harness::new();
    h.populate("350", sample_batch(3));

    h.state.blur();
    assert!(!h.state.is_visible());
    assert!(!h.state.is_focused());

    h.state.focus();
    assert!(h.state.is_visible());
}

#[test]
fn test_dismiss_message() {
    let mut h = Harness::new();
    h.type_at("nowhere", 0);
    h.state.submit();
    h.deliver(LookupResponse::Resolved {
        request_id: 1,
        result: Ok(ResolveOutcome::NotFound { message: None }),
    });

    h.state.dismiss_message();
    assert_eq!(h.state.message(), None);
}

#[test]
fn test_poll_without_channel_does_nothing() {
    let mut state = SearchState::new(
        &SearchConfig::default(),
        crate::test_utils::test_helpers::RecordingNavigator::default(),
    );
    assert_eq!(state.poll_responses(), 0);
    assert_eq!(state.wait_for_responses(Duration::from_millis(1)), 0);
}

#[test]
fn test_wait_for_responses_returns_delivered() {
    let mut h = Harness::new();
    h.type_at("350", 0);
    h.tick_at(200);
    h.responses
        .send(LookupResponse::Suggestions {
            generation: 1,
            result: Ok(sample_batch(2)),
        })
        .unwrap();

    assert_eq!(h.state.wait_for_responses(Duration::from_millis(100)), 1);
    assert_eq!(h.state.suggestions().len(), 2);
}

// For any number of in-flight generations delivered in any order, the
// visible batch is the one for the latest generation.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_latest_generation_wins(
        order in Just((1u64..=6).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut h = Harness::new();
        let mut text = String::from("3");
        for step in 0..6u64 {
            text.push('5');
            h.type_at(&text, step * 300);
            h.tick_at(step * 300 + 200);
        }
        let latest = h.state.generation();
        prop_assert_eq!(latest, 6);

        for generation in order {
            h.deliver_batch(generation, batch_with_prefix(&generation.to_string(), generation as usize));
        }

        let expected = batch_with_prefix("6", 6);
        prop_assert_eq!(h.state.suggestions(), expected.as_slice());
    }
}
