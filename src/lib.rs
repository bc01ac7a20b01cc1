//! Incremental address-to-BBL resolution
//!
//! Turns a partially typed street address into exactly one BBL
//! (borough-block-lot) key, either by picking one of the debounced
//! suggestions or by resolving the submitted text.

pub mod app;
pub mod config;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod navigation;
pub mod search;
pub mod widgets;
pub mod worker;
