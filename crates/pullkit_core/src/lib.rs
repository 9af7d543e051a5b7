//! Pullkit Core
//!
//! Geometry-driven pull-to-refresh and load-more state machines for
//! scrollable containers:
//!
//! - **Refresh State**: one transition table shared by header and footers
//! - **Geometry Samples**: host layout reports projected onto a scroll axis
//! - **Edge Controllers**: pure per-edge evaluation (header, auto footer,
//!   back footer)
//! - **Coordinator**: per-tick orchestration, mutual exclusion and callbacks
//!
//! The host measures its header, footer and content regions once per layout
//! pass, pushes them in as a [`LayoutReport`], and applies the returned
//! [`TickResult`] (state, progress, padding) to its views. Completion of a
//! refresh is reported back by assigning a state.
//!
//! # Example
//!
//! ```rust
//! use pullkit_core::{
//!     EdgeInsets, LayoutReport, Rect, RefreshConfig, RefreshCoordinator, RefreshState,
//!     RegionRole, Size,
//! };
//!
//! let mut coordinator = RefreshCoordinator::new(RefreshConfig::header_and_auto_footer())
//!     .on_footer_action(|| println!("load more"));
//!
//! // Footer scrolled to the bottom of an 800pt viewport
//! let report = LayoutReport::new(Size::new(390.0, 800.0), EdgeInsets::default(), false)
//!     .region(RegionRole::Content, Rect::new(0.0, -1200.0, 390.0, 2000.0))
//!     .region(RegionRole::FooterAuto, Rect::new(0.0, 756.0, 390.0, 44.0));
//!
//! let tick = coordinator.evaluate_report(&report);
//! assert!(tick.footer.fire);
//! assert_eq!(tick.footer.state, RefreshState::Refreshing);
//!
//! // The load finished
//! coordinator.set_footer_state(RefreshState::EndRefresh);
//! ```

pub mod completion;
pub mod config;
pub mod coordinator;
pub mod edge;
pub mod geometry;
pub mod persist;
pub mod state;

pub use completion::{Completion, PendingCompletions, COMPLETION_DELAY};
pub use config::{FooterConfig, FooterKind, HeaderConfig, RefreshConfig, DEFAULT_TIME_KEY};
pub use coordinator::{Action, EdgeOutput, RefreshCoordinator, TickResult};
pub use edge::{EdgeKind, EdgePadding, EdgeRuntimeState, EdgeStep};
pub use geometry::{
    Axis, AxisInsets, Bounds, EdgeInsets, GeometrySample, LayoutReport, Rect, RegionRect,
    RegionRole, Size,
};
pub use persist::{LastUpdatedStore, MemoryStore};
pub use state::{PullEvent, RefreshState};
