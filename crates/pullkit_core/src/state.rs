//! Refresh state machine
//!
//! A single state enum is shared by the header and both footer kinds. The
//! controllers never mutate a state directly: they translate geometry into a
//! [`PullEvent`] and ask [`RefreshState::on_event`] for the next state, so the
//! transition table lives in one place.
//!
//! ```text
//!             Exposed                Released
//!   Idle  ───────────▶ Pulling ───────────────▶ Refreshing
//!    ▲  ◀───────────                                │
//!    │      Covered                                 │ host assigns
//!    │ DragStarted                                  ▼
//!   EndRefresh ◀──────────────────────────── EndRefresh / NoMoreData
//! ```
//!
//! `None` and `NoMoreData` are never produced by the table; only the host can
//! move an edge into or out of them.

use serde::{Deserialize, Serialize};

/// State of a refresh accessory (header or footer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    /// Accessory disabled; not evaluated and not shown
    None,
    /// Resting, waiting for a pull
    #[default]
    Idle,
    /// Pulled past the trigger point; releasing starts a refresh
    Pulling,
    /// Action in flight, waiting for the host to report completion
    Refreshing,
    /// Host reported completion; shown until the next pull starts
    EndRefresh,
    /// Footer only: everything has been loaded
    NoMoreData,
}

/// Geometry-derived inputs to the shared transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullEvent {
    /// A drag is in progress on this tick
    DragStarted,
    /// The region is fully exposed (raw progress > 1) while dragging
    Exposed,
    /// The region is no longer fully exposed (raw progress <= 1) while dragging
    Covered,
    /// The drag ended on this tick
    Released,
}

impl RefreshState {
    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: PullEvent) -> Option<Self> {
        match (self, event) {
            (RefreshState::EndRefresh, PullEvent::DragStarted) => Some(RefreshState::Idle),
            (RefreshState::Idle, PullEvent::Exposed) => Some(RefreshState::Pulling),
            (RefreshState::Pulling, PullEvent::Covered) => Some(RefreshState::Idle),
            (RefreshState::Pulling, PullEvent::Released) => Some(RefreshState::Refreshing),
            _ => None,
        }
    }

    /// Returns true if an action is in flight
    pub fn is_refreshing(&self) -> bool {
        matches!(self, RefreshState::Refreshing)
    }

    /// Returns true if the accessory is disabled
    pub fn is_none(&self) -> bool {
        matches!(self, RefreshState::None)
    }

    /// Returns true if a proximity or tap trigger may start a load
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, RefreshState::Idle | RefreshState::EndRefresh)
    }

    /// Short lowercase name, used in logs and replay output
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshState::None => "none",
            RefreshState::Idle => "idle",
            RefreshState::Pulling => "pulling",
            RefreshState::Refreshing => "refreshing",
            RefreshState::EndRefresh => "end_refresh",
            RefreshState::NoMoreData => "no_more_data",
        }
    }
}

impl std::fmt::Display for RefreshState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drive the shared table with the events of one drag tick.
///
/// `DragStarted` is applied first so an `EndRefresh` edge collapses to `Idle`
/// and can start a new pull on the same tick.
pub(crate) fn drag_transition(state: RefreshState, raw_progress: f32) -> RefreshState {
    let state = state.on_event(PullEvent::DragStarted).unwrap_or(state);
    let threshold = if raw_progress > 1.0 {
        PullEvent::Exposed
    } else {
        PullEvent::Covered
    };
    state.on_event(threshold).unwrap_or(state)
}
