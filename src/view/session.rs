//! Discarding superseded view results.
//!
//! A screen that re-fetches (navigation, language switch) takes a ticket per
//! request and only accepts the result of the latest one.

use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

/// Identifies one view request within a [`ViewSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewTicket(
    /// Sequence number, increasing per session
    u64,
);

/// Hands out tickets and tells whether a ticket is still the latest.
#[derive(Debug, Default)]
pub struct ViewSession {
    /// Most recently issued ticket number
    latest: AtomicU64,
}

impl ViewSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier ticket.
    pub fn begin(&self) -> ViewTicket {
        ViewTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: ViewTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Returns `value` if `ticket` is still current, otherwise drops it.
    pub fn accept<T>(&self, ticket: ViewTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "Discarding superseded view result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[gtest]
    #[rstest]
    fn latest_ticket_is_current() {
        let session = ViewSession::new();

        let first = session.begin();
        expect_that!(session.is_current(first), eq(true));

        let second = session.begin();
        expect_that!(session.is_current(first), eq(false));
        expect_that!(session.is_current(second), eq(true));
        expect_that!(second > first, eq(true));
    }

    #[gtest]
    #[rstest]
    fn accept_discards_superseded_result() {
        let session = ViewSession::new();
        let stale = session.begin();
        let fresh = session.begin();

        expect_that!(session.accept(stale, "en labels"), none());
        expect_that!(session.accept(fresh, "zh labels"), some(eq("zh labels")));
    }
}
