//! Navigation side effect
//!
//! Committing a building hands a [`Destination`] to an injected
//! [`Navigator`]. Nothing in the resolver touches routing directly.

use crate::lookup::Bbl;

/// Why the user is opening the building page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    View,
    /// Open the page with the review form
    Review,
}

/// Building-detail view for one BBL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bbl: Bbl,
    pub intent: Intent,
}

impl Destination {
    pub fn new(bbl: Bbl, intent: Intent) -> Self {
        Self { bbl, intent }
    }

    /// `/building/<bbl>`, with `?review=true` for review intent
    pub fn path(&self) -> String {
        match self.intent {
            Intent::View => format!("/building/{}", self.bbl),
            Intent::Review => format!("/building/{}?review=true", self.bbl),
        }
    }

    /// Absolute URL under `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// Routing capability; fire-and-forget
pub trait Navigator {
    fn navigate(&mut self, destination: Destination);
}

/// Navigator that holds the requested destination for the host to act on
#[derive(Debug, Default)]
pub struct PendingNavigation {
    destination: Option<Destination>,
}

impl PendingNavigation {
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn take(&mut self) -> Option<Destination> {
        self.destination.take()
    }
}

impl Navigator for PendingNavigation {
    fn navigate(&mut self, destination: Destination) {
        log::debug!("Navigating to {}", destination.path());
        self.destination = Some(destination);
    }
}
