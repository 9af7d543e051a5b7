//! Deferred completion
//!
//! Hosts usually report a finished refresh a moment after the data arrives,
//! so the spinner does not flash. [`PendingCompletions`] queues those state
//! assignments with a fixed delay; the host drains the due ones from its frame
//! loop and hands them to
//! [`RefreshCoordinator::apply_completion`](crate::RefreshCoordinator::apply_completion).
//! Evaluation never looks at this queue.

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::edge::EdgeKind;
use crate::state::RefreshState;

/// Delay between a reported completion and the state change
pub const COMPLETION_DELAY: Duration = Duration::from_millis(100);

/// A host-side state assignment that ends a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub edge: EdgeKind,
    pub state: RefreshState,
}

impl Completion {
    /// `EndRefresh`, or `NoMoreData` when nothing is left to load
    pub fn finished(edge: EdgeKind, no_more: bool) -> Self {
        let state = if no_more {
            RefreshState::NoMoreData
        } else {
            RefreshState::EndRefresh
        };
        Self { edge, state }
    }
}

/// Completions waiting for their delay to pass
#[derive(Debug, Clone)]
pub struct PendingCompletions {
    delay: Duration,
    pending: SmallVec<[(Completion, Instant); 2]>,
}

impl PendingCompletions {
    pub fn new() -> Self {
        Self::with_delay(COMPLETION_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            pending: SmallVec::new(),
        }
    }

    /// Queue a completion for `edge`, replacing any pending one for the same
    /// edge
    pub fn complete(&mut self, edge: EdgeKind, no_more: bool, now: Instant) {
        self.pending.retain(|(completion, _)| completion.edge != edge);
        self.pending
            .push((Completion::finished(edge, no_more), now + self.delay));
    }

    /// Remove and return the completions due at `now`, oldest first
    pub fn drain_due(&mut self, now: Instant) -> SmallVec<[Completion; 2]> {
        let mut due: SmallVec<[(Completion, Instant); 2]> = SmallVec::new();
        self.pending.retain(|(completion, at)| {
            if *at <= now {
                due.push((*completion, *at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, at)| *at);
        due.into_iter().map(|(completion, _)| completion).collect()
    }

    /// Earliest due time, if anything is pending
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for PendingCompletions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_waits_for_delay() {
        let start = Instant::now();
        let mut pending = PendingCompletions::new();
        pending.complete(EdgeKind::Header, false, start);

        assert!(pending.drain_due(start).is_empty());
        assert!(pending.drain_due(start + Duration::from_millis(99)).is_empty());

        let due = pending.drain_due(start + COMPLETION_DELAY);
        assert_eq!(
            due.as_slice(),
            &[Completion {
                edge: EdgeKind::Header,
                state: RefreshState::EndRefresh,
            }]
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn test_no_more_data() {
        let completion = Completion::finished(EdgeKind::Footer, true);
        assert_eq!(completion.state, RefreshState::NoMoreData);
    }

    #[test]
    fn test_later_completion_replaces_earlier() {
        let start = Instant::now();
        let mut pending = PendingCompletions::with_delay(Duration::from_millis(10));
        pending.complete(EdgeKind::Footer, false, start);
        pending.complete(EdgeKind::Footer, true, start + Duration::from_millis(5));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.next_due(), Some(start + Duration::from_millis(15)));

        let due = pending.drain_due(start + Duration::from_millis(20));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].state, RefreshState::NoMoreData);
    }

    #[test]
    fn test_drain_orders_by_due_time() {
        let start = Instant::now();
        let mut pending = PendingCompletions::with_delay(Duration::from_millis(10));
        pending.complete(EdgeKind::Footer, false, start + Duration::from_millis(3));
        pending.complete(EdgeKind::Header, false, start);

        let due = pending.drain_due(start + Duration::from_secs(1));
        assert_eq!(due[0].edge, EdgeKind::Header);
        assert_eq!(due[1].edge, EdgeKind::Footer);
    }
}
