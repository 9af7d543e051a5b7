//! Pull-to-refresh header
//!
//! The header sits just outside the leading edge of the viewport, held there
//! by a negative `offset` equal to its own length plus the leading inset.
//! Pulling the content exposes it; once its far edge has travelled past its
//! whole length the header is `Pulling`, and releasing starts the refresh.
//!
//! While refreshing, the offset stays negative until the scroll view settles
//! back with the header visible at the leading edge. At that point the offset
//! snaps to zero (the header now occupies space in the flow) and a layout
//! reset is requested so the host does not keep a stale overscroll frame.

use crate::config::FooterKind;
use crate::edge::{pull_progress, EdgeRuntimeState, EdgeStep};
use crate::geometry::{GeometrySample, RegionRole};
use crate::state::{drag_transition, PullEvent, RefreshState};

/// What the header needs to know about the footer edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterView {
    pub state: RefreshState,
    pub kind: Option<FooterKind>,
}

/// Evaluate the header for one tick
pub fn evaluate(
    edge: &EdgeRuntimeState,
    sample: &GeometrySample,
    footer: FooterView,
) -> Option<EdgeStep> {
    let bounds = sample.region(RegionRole::Header)?;
    let inset = sample.insets().leading;

    let mut step = EdgeStep::unchanged(edge);
    step.next.padding.gap = inset;

    if edge.state.is_none() || footer.state.is_refreshing() || bounds.max < -inset {
        tracing::trace!(
            state = %edge.state,
            footer = %footer.state,
            far_edge = bounds.max,
            "header out of range"
        );
        return Some(step);
    }

    if edge.state.is_refreshing() {
        if edge.padding.offset < 0.0 && bounds.min <= 0.0 {
            step.next.padding.offset = 0.0;
            step.next.reset_token = edge.reset_token.wrapping_add(1);
            step.layout_reset = true;
        }
        return Some(step);
    }

    if sample.dragging() {
        let raw = pull_progress(bounds.max, bounds.length());
        step.next.progress = raw.min(1.0);
        step.next.state = drag_transition(edge.state, raw);
    } else if let Some(next) = edge.state.on_event(PullEvent::Released) {
        step.next.progress = 0.0;
        step.next.state = next;
        step.fire = true;
        if footer.kind == Some(FooterKind::Back) {
            step.footer_back_gap = Some(sample.viewport_length() + sample.insets().trailing);
        }
    }
    step.next.padding.offset = -(bounds.length() + inset);

    Some(step)
}
