//! State containers that mirror server data locally.
//!
//! - [`SessionStore`] - the signed-in user
//! - [`BookmarksStore`] - the user's saved tools, with optimistic removal
//! - [`ComparisonStore`] - up to four tools chosen for side-by-side view
//! - [`FiltersStore`] - current search/browse filter selections
//!
//! Stores are plain values owned by an [`Atlas`](crate::Atlas) context;
//! there is no global instance. State sits behind short-lived locks that are
//! never held across a request, so every accessor returns a consistent
//! snapshot.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod bookmarks;
pub mod comparison;
pub mod filters;
pub mod optimistic;
pub mod session;

pub use bookmarks::{BookmarkState, BookmarksStore};
pub use comparison::{ComparisonState, ComparisonStore, MAX_COMPARE_TOOLS};
pub use filters::{FilterUpdate, Filters, FiltersStore, PriceTier, SortKey};
pub use optimistic::{InFlight, InFlightGuard, optimistic};
pub use session::SessionStore;

/// Sets a loading flag for as long as it lives.
///
/// Dropping it clears the flag on every exit path: success, error, or the
/// surrounding future being dropped.
pub(crate) struct Loading<'a>(&'a AtomicBool);

impl<'a> Loading<'a> {
    pub(crate) fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
