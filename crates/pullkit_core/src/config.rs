//! Coordinator configuration

use serde::{Deserialize, Serialize};

use crate::geometry::Axis;
use crate::state::RefreshState;

/// Default key under which the header's last completion time is stored
pub const DEFAULT_TIME_KEY: &str = "pullkit.header.last_updated";

/// Footer behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterKind {
    /// Loads when scrolled into view, or on tap (default)
    #[default]
    Auto,
    /// Loads on drag-and-release past the trailing edge
    Back,
}

/// Header configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// State the header starts in
    pub initial: RefreshState,
    /// Store key for the last completion time
    pub time_key: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            initial: RefreshState::Idle,
            time_key: DEFAULT_TIME_KEY.to_string(),
        }
    }
}

/// Footer configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub kind: FooterKind,
    /// State the footer starts in
    pub initial: RefreshState,
}

impl FooterConfig {
    pub fn auto() -> Self {
        Self {
            kind: FooterKind::Auto,
            initial: RefreshState::Idle,
        }
    }

    pub fn back() -> Self {
        Self {
            kind: FooterKind::Back,
            initial: RefreshState::Idle,
        }
    }
}

/// Configuration for a refresh coordinator
///
/// The default is a vertical container with neither header nor footer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub axis: Axis,
    pub header: Option<HeaderConfig>,
    pub footer: Option<FooterConfig>,
}

impl RefreshConfig {
    /// Vertical container with a pull-to-refresh header
    pub fn header_only() -> Self {
        Self {
            header: Some(HeaderConfig::default()),
            ..Default::default()
        }
    }

    /// Header plus an auto-loading footer
    pub fn header_and_auto_footer() -> Self {
        Self::header_only().with_footer(FooterConfig::auto())
    }

    /// Header plus a drag-to-load footer
    pub fn header_and_back_footer() -> Self {
        Self::header_only().with_footer(FooterConfig::back())
    }

    /// Set the scroll axis
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Enable the header
    pub fn with_header(mut self, header: HeaderConfig) -> Self {
        self.header = Some(header);
        self
    }

    /// Enable the footer
    pub fn with_footer(mut self, footer: FooterConfig) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Kind of the configured footer, if any
    pub fn footer_kind(&self) -> Option<FooterKind> {
        self.footer.map(|footer| footer.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let config = RefreshConfig::header_and_back_footer();
        assert_eq!(config.axis, Axis::Vertical);
        assert_eq!(config.footer_kind(), Some(FooterKind::Back));
        assert_eq!(
            config.header.as_ref().map(|h| h.time_key.as_str()),
            Some(DEFAULT_TIME_KEY)
        );

        let plain = RefreshConfig::default();
        assert!(plain.header.is_none());
        assert_eq!(plain.footer_kind(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RefreshConfig =
            serde_json::from_str(r#"{"axis":"horizontal","footer":{"kind":"back"}}"#).unwrap();

        assert_eq!(config.axis, Axis::Horizontal);
        assert!(config.header.is_none());
        assert_eq!(
            config.footer,
            Some(FooterConfig {
                kind: FooterKind::Back,
                initial: RefreshState::Idle,
            })
        );
    }
}
