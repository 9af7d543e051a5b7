//! Drag-to-load footer
//!
//! The trailing-edge mirror of the header. The footer is kept out of view by
//! a negative `offset` and pinned below the content by its `gap`, which also
//! covers the empty space left when the content is shorter than the
//! viewport. Pulling it fully into view and releasing loads more.
//!
//! `NoMoreData` hides the footer for good; only the host can bring it back.

use crate::edge::{pull_progress, EdgeRuntimeState, EdgeStep};
use crate::geometry::{GeometrySample, RegionRole};
use crate::state::{drag_transition, PullEvent, RefreshState};

/// Evaluate the back footer for one tick
pub fn evaluate(
    edge: &EdgeRuntimeState,
    sample: &GeometrySample,
    header: RefreshState,
) -> Option<EdgeStep> {
    let bounds = sample.region(RegionRole::FooterBack)?;
    let content = sample.region(RegionRole::Content)?;
    let viewport = sample.viewport_length();
    let inset = sample.insets().trailing;

    let mut step = EdgeStep::unchanged(edge);
    step.next.padding.gap = (viewport - content.length()).max(0.0) + inset;

    if edge.state.is_none() || header.is_refreshing() || bounds.min > viewport + inset {
        tracing::trace!(
            state = %edge.state,
            header = %header,
            near_edge = bounds.min,
            "back footer out of range"
        );
        return Some(step);
    }

    let hidden = -(bounds.length() + inset);
    match edge.state {
        RefreshState::NoMoreData => {
            step.next.padding.offset = hidden;
        }
        RefreshState::Refreshing => {
            if edge.padding.offset < 0.0 && bounds.max >= viewport {
                step.next.padding.offset = 0.0;
            }
        }
        _ => {
            if sample.dragging() {
                let raw = pull_progress(viewport - bounds.min, bounds.length());
                step.next.progress = raw.min(1.0);
                step.next.state = drag_transition(edge.state, raw);
            } else if let Some(next) = edge.state.on_event(PullEvent::Released) {
                step.next.progress = 0.0;
                step.next.state = next;
                step.fire = true;
            }
            step.next.padding.offset = hidden;
        }
    }

    Some(step)
}
