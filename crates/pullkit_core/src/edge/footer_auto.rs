//! Auto-loading footer
//!
//! Sits in normal flow after the content and never reacts to drags. It loads
//! as soon as its far edge reaches the end of the visible area, or the end of
//! the content when the content is shorter than the viewport.

use crate::edge::{EdgeRuntimeState, EdgeStep};
use crate::geometry::{GeometrySample, RegionRole};
use crate::state::RefreshState;

/// Evaluate the auto footer for one tick
pub fn evaluate(
    edge: &EdgeRuntimeState,
    sample: &GeometrySample,
    header: RefreshState,
) -> Option<EdgeStep> {
    if header.is_refreshing() || !edge.state.accepts_trigger() {
        return None;
    }
    let footer = sample.region(RegionRole::FooterAuto)?;
    let content = sample.region(RegionRole::Content)?;

    let mut step = EdgeStep::unchanged(edge);
    let threshold =
        (sample.viewport_length() + sample.insets().trailing).min(content.length());
    if footer.max <= threshold {
        step.next.state = RefreshState::Refreshing;
        step.fire = true;
    }
    Some(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Axis, AxisInsets, Bounds, Size};

    fn sample(footer_max: f32, content_length: f32) -> GeometrySample {
        GeometrySample::new(
            Axis::Vertical,
            Size::new(390.0, 800.0),
            AxisInsets::new(47.0, 34.0),
            false,
        )
        .with_region(RegionRole::Content, Bounds::new(0.0, content_length, 390.0))
        .with_region(
            RegionRole::FooterAuto,
            Bounds::new(footer_max - 44.0, footer_max, 390.0),
        )
    }

    #[test]
    fn test_fires_when_footer_reaches_viewport_end() {
        let edge = EdgeRuntimeState::new(RefreshState::Idle);

        let step = evaluate(&edge, &sample(834.0, 2000.0), RefreshState::Idle).unwrap();
        assert_eq!(step.next.state, RefreshState::Refreshing);
        assert!(step.fire);
    }

    #[test]
    fn test_waits_below_viewport_end() {
        let edge = EdgeRuntimeState::new(RefreshState::Idle);

        let step = evaluate(&edge, &sample(834.5, 2000.0), RefreshState::Idle).unwrap();
        assert_eq!(step.next.state, RefreshState::Idle);
        assert!(!step.fire);
    }

    #[test]
    fn test_short_content_uses_content_length() {
        let edge = EdgeRuntimeState::new(RefreshState::EndRefresh);

        let step = evaluate(&edge, &sample(400.0, 500.0), RefreshState::Idle).unwrap();
        assert!(step.fire);

        let step = evaluate(&edge, &sample(544.0, 500.0), RefreshState::Idle).unwrap();
        assert!(!step.fire);
    }

    #[test]
    fn test_ignores_drag_flag() {
        let edge = EdgeRuntimeState::new(RefreshState::Idle);
        let dragging = GeometrySample::new(
            Axis::Vertical,
            Size::new(390.0, 800.0),
            AxisInsets::new(47.0, 34.0),
            true,
        )
        .with_region(RegionRole::Content, Bounds::new(0.0, 2000.0, 390.0))
        .with_region(RegionRole::FooterAuto, Bounds::new(700.0, 744.0, 390.0));

        let step = evaluate(&edge, &dragging, RefreshState::Idle).unwrap();
        assert!(step.fire);
        assert_eq!(step.next.progress, 0.0);
        assert_eq!(step.next.padding, edge.padding);
    }

    #[test]
    fn test_inactive_states_never_fire() {
        for state in [
            RefreshState::None,
            RefreshState::Pulling,
            RefreshState::Refreshing,
            RefreshState::NoMoreData,
        ] {
            let edge = EdgeRuntimeState::new(state);
            assert!(evaluate(&edge, &sample(100.0, 2000.0), RefreshState::Idle).is_none());
        }
    }

    #[test]
    fn test_suppressed_while_header_refreshing() {
        let edge = EdgeRuntimeState::new(RefreshState::Idle);
        assert!(evaluate(&edge, &sample(100.0, 2000.0), RefreshState::Refreshing).is_none());
    }

    #[test]
    fn test_requires_content_region() {
        let edge = EdgeRuntimeState::new(RefreshState::Idle);
        let sample = GeometrySample::new(
            Axis::Vertical,
            Size::new(390.0, 800.0),
            AxisInsets::default(),
            false,
        )
        .with_region(RegionRole::Header, Bounds::new(-60.0, 0.0, 390.0))
        .with_region(RegionRole::FooterAuto, Bounds::new(100.0, 144.0, 390.0));

        assert!(evaluate(&edge, &sample, RefreshState::Idle).is_none());
    }
}
