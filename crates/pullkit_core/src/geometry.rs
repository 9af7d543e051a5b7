//! Geometry samples
//!
//! The host describes each layout pass with a [`LayoutReport`]: viewport
//! size, safe-area insets, one rectangle per tagged region and whether the
//! user is dragging. The report is projected onto the scroll [`Axis`] to get
//! a [`GeometrySample`], which is all the edge controllers ever look at. The
//! projection is the only place where vertical and horizontal containers
//! differ.
//!
//! Coordinates are relative to the viewport origin (the safe-area corner);
//! regions above or before the viewport have negative positions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// Axis and roles
// ============================================================================

/// Scroll axis of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Top/bottom edges, lengths are heights (default)
    #[default]
    Vertical,
    /// Leading/trailing edges, lengths are widths
    Horizontal,
}

/// Role tag of a measured region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRole {
    Header,
    FooterAuto,
    FooterBack,
    Content,
}

// ============================================================================
// Host-facing layout report
// ============================================================================

/// Two-dimensional size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length along the given axis
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

/// Safe-area insets on all four edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    pub top: f32,
    pub leading: f32,
    pub bottom: f32,
    pub trailing: f32,
}

impl EdgeInsets {
    pub fn new(top: f32, leading: f32, bottom: f32, trailing: f32) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// The pair of insets that bound the given scroll axis
    pub fn along(&self, axis: Axis) -> AxisInsets {
        match axis {
            Axis::Vertical => AxisInsets::new(self.top, self.bottom),
            Axis::Horizontal => AxisInsets::new(self.leading, self.trailing),
        }
    }
}

/// A rectangle tagged with the role of the region it measures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionRect {
    pub role: RegionRole,
    pub rect: Rect,
}

/// Everything the host measured during one layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutReport {
    pub viewport: Size,
    #[serde(default)]
    pub safe_area: EdgeInsets,
    #[serde(default)]
    pub regions: Vec<RegionRect>,
    #[serde(default)]
    pub dragging: bool,
}

impl LayoutReport {
    pub fn new(viewport: Size, safe_area: EdgeInsets, dragging: bool) -> Self {
        Self {
            viewport,
            safe_area,
            regions: Vec::new(),
            dragging,
        }
    }

    /// Add a measured region
    pub fn region(mut self, role: RegionRole, rect: Rect) -> Self {
        self.regions.push(RegionRect { role, rect });
        self
    }

    /// Project the report onto a scroll axis
    pub fn project(&self, axis: Axis) -> GeometrySample {
        let mut sample =
            GeometrySample::new(axis, self.viewport, self.safe_area.along(axis), self.dragging);
        for region in &self.regions {
            sample = sample.with_region(region.role, Bounds::from_rect(&region.rect, axis));
        }
        sample
    }
}

// ============================================================================
// Axis-projected sample
// ============================================================================

/// Insets at the two ends of the scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisInsets {
    /// Inset at the header end (top or leading)
    pub leading: f32,
    /// Inset at the footer end (bottom or trailing)
    pub trailing: f32,
}

impl AxisInsets {
    pub fn new(leading: f32, trailing: f32) -> Self {
        Self { leading, trailing }
    }
}

/// Extent of a region along the scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Edge nearer the header end of the viewport
    pub min: f32,
    /// Edge nearer the footer end of the viewport
    pub max: f32,
    /// Length on the cross axis
    pub cross: f32,
}

impl Bounds {
    pub fn new(min: f32, max: f32, cross: f32) -> Self {
        Self { min, max, cross }
    }

    pub fn from_rect(rect: &Rect, axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self::new(rect.y, rect.max_y(), rect.width),
            Axis::Horizontal => Self::new(rect.x, rect.max_x(), rect.height),
        }
    }

    /// Length along the scroll axis
    pub fn length(&self) -> f32 {
        self.max - self.min
    }

    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.cross.is_finite()
    }
}

/// Immutable snapshot of one evaluation tick
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySample {
    axis: Axis,
    viewport: Size,
    insets: AxisInsets,
    regions: SmallVec<[(RegionRole, Bounds); 4]>,
    dragging: bool,
}

impl GeometrySample {
    /// Create a sample with no regions yet
    pub fn new(axis: Axis, viewport: Size, insets: AxisInsets, dragging: bool) -> Self {
        Self {
            axis,
            viewport,
            insets,
            regions: SmallVec::new(),
            dragging,
        }
    }

    /// Add a region. If the role was already measured the first one wins.
    pub fn with_region(mut self, role: RegionRole, bounds: Bounds) -> Self {
        self.regions.push((role, bounds));
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Viewport length along the scroll axis
    pub fn viewport_length(&self) -> f32 {
        self.viewport.along(self.axis)
    }

    pub fn insets(&self) -> AxisInsets {
        self.insets
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Bounds of the first region with the given role
    pub fn region(&self, role: RegionRole) -> Option<Bounds> {
        self.regions
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, bounds)| *bounds)
    }

    /// Number of distinct roles present
    pub fn distinct_roles(&self) -> usize {
        let mut seen: SmallVec<[RegionRole; 4]> = SmallVec::new();
        for (role, _) in &self.regions {
            if !seen.contains(role) {
                seen.push(*role);
            }
        }
        seen.len()
    }

    /// Layout has settled enough to be evaluated
    pub fn is_ready(&self) -> bool {
        self.distinct_roles() >= 2
    }

    /// All measurements are finite numbers
    pub fn is_finite(&self) -> bool {
        self.viewport.width.is_finite()
            && self.viewport.height.is_finite()
            && self.insets.leading.is_finite()
            && self.insets.trailing.is_finite()
            && self.regions.iter().all(|(_, bounds)| bounds.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> LayoutReport {
        LayoutReport::new(
            Size::new(390.0, 800.0),
            EdgeInsets::new(47.0, 10.0, 34.0, 12.0),
            true,
        )
        .region(RegionRole::Header, Rect::new(0.0, -107.0, 390.0, 60.0))
        .region(RegionRole::Content, Rect::new(0.0, 0.0, 390.0, 1200.0))
    }

    #[test]
    fn test_vertical_projection() {
        let sample = report().project(Axis::Vertical);

        assert_eq!(sample.viewport_length(), 800.0);
        assert_eq!(sample.insets(), AxisInsets::new(47.0, 34.0));
        assert!(sample.dragging());

        let header = sample.region(RegionRole::Header).unwrap();
        assert_eq!(header, Bounds::new(-107.0, -47.0, 390.0));
        assert_eq!(header.length(), 60.0);
    }

    #[test]
    fn test_horizontal_projection() {
        let sample = report().project(Axis::Horizontal);

        assert_eq!(sample.viewport_length(), 390.0);
        assert_eq!(sample.insets(), AxisInsets::new(10.0, 12.0));

        let content = sample.region(RegionRole::Content).unwrap();
        assert_eq!(content, Bounds::new(0.0, 390.0, 1200.0));
    }

    #[test]
    fn test_readiness_counts_distinct_roles() {
        let sample = GeometrySample::new(
            Axis::Vertical,
            Size::new(100.0, 100.0),
            AxisInsets::default(),
            false,
        )
        .with_region(RegionRole::Content, Bounds::new(0.0, 10.0, 100.0))
        .with_region(RegionRole::Content, Bounds::new(0.0, 20.0, 100.0));

        assert_eq!(sample.distinct_roles(), 1);
        assert!(!sample.is_ready());

        let sample = sample.with_region(RegionRole::Header, Bounds::new(-10.0, 0.0, 100.0));
        assert!(sample.is_ready());
    }

    #[test]
    fn test_first_region_wins() {
        let sample = GeometrySample::new(
            Axis::Vertical,
            Size::new(100.0, 100.0),
            AxisInsets::default(),
            false,
        )
        .with_region(RegionRole::Content, Bounds::new(0.0, 10.0, 100.0))
        .with_region(RegionRole::Content, Bounds::new(0.0, 20.0, 100.0));

        assert_eq!(sample.region(RegionRole::Content).unwrap().max, 10.0);
    }

    #[test]
    fn test_non_finite_measurements() {
        let sample = report().project(Axis::Vertical);
        assert!(sample.is_finite());

        let broken = sample.with_region(RegionRole::FooterAuto, Bounds::new(f32::NAN, 0.0, 0.0));
        assert!(!broken.is_finite());

        let mut report = report();
        report.viewport.height = f32::INFINITY;
        assert!(!report.project(Axis::Vertical).is_finite());
    }
}
