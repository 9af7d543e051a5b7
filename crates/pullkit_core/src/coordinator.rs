//! Refresh coordinator
//!
//! Owns one [`EdgeRuntimeState`] per edge and runs the edge controllers once
//! per layout tick, in a fixed order:
//!
//! 1. auto footer
//! 2. back footer
//! 3. header
//!
//! Footers go first so the header's guard sees the footer state of this tick,
//! and so the header may override the back footer's gap when a refresh
//! starts. A controller only mutates its own edge; the two cross-edge effects
//! are the refreshing-suppresses-the-other-edge guards and that gap override.
//!
//! # Example
//!
//! ```rust
//! use pullkit_core::{
//!     Axis, AxisInsets, Bounds, GeometrySample, RefreshConfig, RefreshCoordinator,
//!     RefreshState, RegionRole, Size,
//! };
//!
//! let mut coordinator = RefreshCoordinator::new(RefreshConfig::header_only())
//!     .on_header_action(|| println!("refresh"));
//!
//! let pulled = |dragging| {
//!     GeometrySample::new(Axis::Vertical, Size::new(390.0, 800.0), AxisInsets::default(), dragging)
//!         .with_region(RegionRole::Header, Bounds::new(12.0, 72.0, 390.0))
//!         .with_region(RegionRole::Content, Bounds::new(72.0, 1272.0, 390.0))
//! };
//!
//! let tick = coordinator.evaluate(&pulled(true));
//! assert_eq!(tick.header.state, RefreshState::Pulling);
//!
//! let tick = coordinator.evaluate(&pulled(false));
//! assert_eq!(tick.header.state, RefreshState::Refreshing);
//! assert!(tick.header.fire);
//! ```

use std::time::SystemTime;

use crate::completion::Completion;
use crate::config::{FooterKind, RefreshConfig};
use crate::edge::header::FooterView;
use crate::edge::{footer_auto, footer_back, header};
use crate::edge::{EdgeKind, EdgePadding, EdgeRuntimeState, EdgeStep};
use crate::geometry::{GeometrySample, LayoutReport};
use crate::persist::LastUpdatedStore;
use crate::state::RefreshState;

/// An action function invoked when an edge starts refreshing
pub type Action = Box<dyn FnMut() + Send>;

/// Per-edge view of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeOutput {
    pub state: RefreshState,
    /// Pull progress clamped to `[0, 1]`
    pub progress: f32,
    pub padding: EdgePadding,
    /// The edge's action was invoked on this tick
    pub fire: bool,
    /// Cached layout for this region must be discarded
    pub layout_reset: bool,
}

impl EdgeOutput {
    fn new(edge: &EdgeRuntimeState, fire: bool, layout_reset: bool) -> Self {
        Self {
            state: edge.state,
            progress: edge.progress,
            padding: edge.padding,
            fire,
            layout_reset,
        }
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    pub header: EdgeOutput,
    pub footer: EdgeOutput,
    /// False when the sample was skipped and nothing changed
    pub applied: bool,
}

impl TickResult {
    /// Returns true if any action fired
    pub fn fired(&self) -> bool {
        self.header.fire || self.footer.fire
    }
}

#[derive(Default, Clone, Copy)]
struct EdgeFlags {
    fire: bool,
    layout_reset: bool,
}

/// Drives the header and footer state machines from geometry samples
pub struct RefreshCoordinator {
    config: RefreshConfig,
    header: EdgeRuntimeState,
    footer: EdgeRuntimeState,
    header_action: Option<Action>,
    footer_action: Option<Action>,
    store: Option<Box<dyn LastUpdatedStore + Send>>,
}

impl RefreshCoordinator {
    /// Create a coordinator. Edges missing from the config start in `None`.
    pub fn new(config: RefreshConfig) -> Self {
        let header = config
            .header
            .as_ref()
            .map_or(RefreshState::None, |h| h.initial);
        let footer = config.footer.map_or(RefreshState::None, |f| f.initial);
        Self {
            config,
            header: EdgeRuntimeState::new(header),
            footer: EdgeRuntimeState::new(footer),
            header_action: None,
            footer_action: None,
            store: None,
        }
    }

    /// Set the action invoked when the header starts refreshing
    pub fn on_header_action<F: FnMut() + Send + 'static>(mut self, action: F) -> Self {
        self.header_action = Some(Box::new(action));
        self
    }

    /// Set the action invoked when the footer starts loading
    pub fn on_footer_action<F: FnMut() + Send + 'static>(mut self, action: F) -> Self {
        self.footer_action = Some(Box::new(action));
        self
    }

    /// Attach storage for the header's last completion time
    pub fn with_store<S: LastUpdatedStore + Send + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn header(&self) -> &EdgeRuntimeState {
        &self.header
    }

    pub fn footer(&self) -> &EdgeRuntimeState {
        &self.footer
    }

    /// Runtime state of the given edge
    pub fn edge(&self, edge: EdgeKind) -> &EdgeRuntimeState {
        match edge {
            EdgeKind::Header => &self.header,
            EdgeKind::Footer => &self.footer,
        }
    }

    /// Project a host layout report onto the configured axis and evaluate it
    pub fn evaluate_report(&mut self, report: &LayoutReport) -> TickResult {
        let sample = report.project(self.config.axis);
        self.evaluate(&sample)
    }

    /// Evaluate one tick
    pub fn evaluate(&mut self, sample: &GeometrySample) -> TickResult {
        if !sample.is_finite() {
            tracing::debug!("skipping tick with non-finite measurements");
            return self.snapshot(EdgeFlags::default(), EdgeFlags::default(), false);
        }
        if !sample.is_ready() {
            tracing::trace!(
                roles = sample.distinct_roles(),
                "skipping tick, layout not settled"
            );
            return self.snapshot(EdgeFlags::default(), EdgeFlags::default(), false);
        }

        let mut footer_flags = EdgeFlags::default();
        let mut header_flags = EdgeFlags::default();

        match self.config.footer_kind() {
            Some(FooterKind::Auto) => {
                if let Some(step) = footer_auto::evaluate(&self.footer, sample, self.header.state) {
                    footer_flags = self.apply(EdgeKind::Footer, step);
                }
            }
            Some(FooterKind::Back) => {
                if let Some(step) = footer_back::evaluate(&self.footer, sample, self.header.state) {
                    footer_flags = self.apply(EdgeKind::Footer, step);
                }
            }
            None => {}
        }

        if self.config.header.is_some() {
            let footer = FooterView {
                state: self.footer.state,
                kind: self.config.footer_kind(),
            };
            if let Some(step) = header::evaluate(&self.header, sample, footer) {
                if let Some(gap) = step.footer_back_gap {
                    self.footer.padding.gap = gap;
                }
                header_flags = self.apply(EdgeKind::Header, step);
            }
        }

        self.snapshot(header_flags, footer_flags, true)
    }

    /// Tap on the footer. Only an auto footer reacts, and only when it could
    /// also have been triggered by scrolling. Returns true if it fired.
    pub fn tap_footer(&mut self) -> bool {
        if self.config.footer_kind() != Some(FooterKind::Auto)
            || self.header.state.is_refreshing()
            || !self.footer.state.accepts_trigger()
        {
            return false;
        }
        let mut step = EdgeStep::unchanged(&self.footer);
        step.next.state = RefreshState::Refreshing;
        step.fire = true;
        self.apply(EdgeKind::Footer, step).fire
    }

    /// Assign the header state. Not validated.
    pub fn set_header_state(&mut self, state: RefreshState) {
        self.assign(EdgeKind::Header, state);
    }

    /// Assign the footer state. Not validated.
    pub fn set_footer_state(&mut self, state: RefreshState) {
        self.assign(EdgeKind::Footer, state);
    }

    /// Apply a completion drained from a
    /// [`PendingCompletions`](crate::completion::PendingCompletions) queue
    pub fn apply_completion(&mut self, completion: Completion) {
        self.assign(completion.edge, completion.state);
    }

    /// When the header last finished refreshing.
    ///
    /// While the header shows `EndRefresh` this is the current time.
    pub fn header_last_updated(&self) -> Option<SystemTime> {
        if self.header.state == RefreshState::EndRefresh {
            return Some(SystemTime::now());
        }
        let key = &self.config.header.as_ref()?.time_key;
        self.store.as_ref()?.last_updated(key)
    }

    fn assign(&mut self, edge: EdgeKind, state: RefreshState) {
        let runtime = match edge {
            EdgeKind::Header => &mut self.header,
            EdgeKind::Footer => &mut self.footer,
        };
        tracing::debug!(
            edge = edge.as_str(),
            from = %runtime.state,
            to = %state,
            "state assigned by host"
        );
        runtime.state = state;

        if edge == EdgeKind::Header && state == RefreshState::EndRefresh {
            if let (Some(store), Some(header)) = (self.store.as_mut(), self.config.header.as_ref())
            {
                store.record(&header.time_key, SystemTime::now());
            }
        }
    }

    fn apply(&mut self, edge: EdgeKind, step: EdgeStep) -> EdgeFlags {
        let (runtime, action) = match edge {
            EdgeKind::Header => (&mut self.header, &mut self.header_action),
            EdgeKind::Footer => (&mut self.footer, &mut self.footer_action),
        };

        if runtime.state != step.next.state {
            tracing::debug!(
                edge = edge.as_str(),
                from = %runtime.state,
                to = %step.next.state,
                progress = step.next.progress,
                "edge transition"
            );
        }
        if step.layout_reset {
            tracing::debug!(
                edge = edge.as_str(),
                token = step.next.reset_token,
                "layout reset requested"
            );
        }
        *runtime = step.next;

        if step.fire {
            tracing::debug!(edge = edge.as_str(), "firing action");
            if let Some(action) = action.as_mut() {
                action();
            }
        }

        EdgeFlags {
            fire: step.fire,
            layout_reset: step.layout_reset,
        }
    }

    fn snapshot(&self, header: EdgeFlags, footer: EdgeFlags, applied: bool) -> TickResult {
        TickResult {
            header: EdgeOutput::new(&self.header, header.fire, header.layout_reset),
            footer: EdgeOutput::new(&self.footer, footer.fire, footer.layout_reset),
            applied,
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("config", &self.config)
            .field("header", &self.header)
            .field("footer", &self.footer)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}
