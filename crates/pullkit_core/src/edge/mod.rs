//! Edge controllers
//!
//! One controller per accessory kind. Each is a pure function of the edge's
//! current [`EdgeRuntimeState`], the tick's [`GeometrySample`] and the state
//! of the opposite edge, returning an [`EdgeStep`] that the coordinator
//! applies. A controller returns `None` when its regions are missing from the
//! sample or its guard rules it out entirely.
//!
//! [`GeometrySample`]: crate::geometry::GeometrySample

pub mod footer_auto;
pub mod footer_back;
pub mod header;

use serde::{Deserialize, Serialize};

use crate::state::RefreshState;

/// Which edge of the container an accessory sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Header,
    Footer,
}

impl EdgeKind {
    /// Name used in logs and scenario files
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Header => "header",
            EdgeKind::Footer => "footer",
        }
    }
}

/// Padding around an accessory, along the scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgePadding {
    /// Signed padding on the viewport-facing side. Negative values push the
    /// accessory out of view.
    pub offset: f32,
    /// Spacer on the content-facing side
    pub gap: f32,
}

/// Mutable per-edge record owned by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeRuntimeState {
    pub state: RefreshState,
    /// Published pull progress, clamped to `[0, 1]`
    pub progress: f32,
    pub padding: EdgePadding,
    /// Incremented every time the accessory's layout must be rebuilt
    pub reset_token: u64,
}

impl EdgeRuntimeState {
    pub fn new(state: RefreshState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }
}

/// Result of evaluating one edge for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStep {
    /// Runtime state to store back
    pub next: EdgeRuntimeState,
    /// The edge's action must be invoked
    pub fire: bool,
    /// The rendering layer should discard cached layout for this region
    pub layout_reset: bool,
    /// Header only: gap to give a back footer so it sits off-screen while the
    /// header refreshes
    pub footer_back_gap: Option<f32>,
}

impl EdgeStep {
    /// A step that keeps the current runtime state
    pub fn unchanged(edge: &EdgeRuntimeState) -> Self {
        Self {
            next: *edge,
            fire: false,
            layout_reset: false,
            footer_back_gap: None,
        }
    }
}

/// Raw pull progress: exposed length over region length.
///
/// Degenerate regions (zero or negative length) never report progress.
pub(crate) fn pull_progress(exposed: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    exposed.max(0.0) / length
}
