//! Scenario file handling
//!
//! A scenario is a TOML file with a coordinator config and a list of steps:
//!
//! ```toml
//! name = "pull to refresh"
//!
//! [config.header]
//!
//! [[steps]]
//! kind = "tick"
//! [steps.report]
//! dragging = true
//! viewport = { width = 390.0, height = 800.0 }
//! [[steps.report.regions]]
//! role = "header"
//! rect = { x = 0.0, y = 12.0, width = 390.0, height = 60.0 }
//! [[steps.report.regions]]
//! role = "content"
//! rect = { x = 0.0, y = 72.0, width = 390.0, height = 1200.0 }
//! [steps.expect]
//! header = "pulling"
//! ```

use anyhow::{Context, Result};
use pullkit_core::{EdgeKind, LayoutReport, RefreshConfig, RefreshState, TickResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tolerance for progress expectations
const PROGRESS_EPSILON: f32 = 1e-3;

/// Top-level scenario file
#[derive(Debug, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: RefreshConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted host action
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Push a layout report through the coordinator
    Tick {
        report: LayoutReport,
        #[serde(default)]
        expect: Expect,
    },
    /// Assign an edge state directly
    SetState { edge: EdgeKind, state: RefreshState },
    /// Queue a deferred completion
    Complete {
        edge: EdgeKind,
        #[serde(default)]
        no_more: bool,
    },
    /// Tap the footer
    Tap {
        #[serde(default)]
        fire: Option<bool>,
    },
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Tick { .. } => "tick",
            Step::SetState { .. } => "set_state",
            Step::Complete { .. } => "complete",
            Step::Tap { .. } => "tap",
        }
    }
}

/// Optional checks on a tick result
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Expect {
    pub header: Option<RefreshState>,
    pub footer: Option<RefreshState>,
    pub header_progress: Option<f32>,
    pub footer_progress: Option<f32>,
    /// Whether any action fired
    pub fire: Option<bool>,
    /// Whether any edge requested a layout reset
    pub layout_reset: Option<bool>,
}

impl Expect {
    /// Describe every expectation the tick does not meet
    pub fn mismatches(&self, tick: &TickResult) -> Vec<String> {
        let mut out = Vec::new();

        let states = [
            ("header", self.header, tick.header.state),
            ("footer", self.footer, tick.footer.state),
        ];
        for (edge, expected, actual) in states {
            if let Some(expected) = expected {
                if expected != actual {
                    out.push(format!("{edge} state: expected {expected}, got {actual}"));
                }
            }
        }

        let progress = [
            ("header", self.header_progress, tick.header.progress),
            ("footer", self.footer_progress, tick.footer.progress),
        ];
        for (edge, expected, actual) in progress {
            if let Some(expected) = expected {
                if (expected - actual).abs() > PROGRESS_EPSILON {
                    out.push(format!(
                        "{edge} progress: expected {expected:.3}, got {actual:.3}"
                    ));
                }
            }
        }

        if let Some(expected) = self.fire {
            if expected != tick.fired() {
                out.push(format!("fire: expected {expected}, got {}", tick.fired()));
            }
        }

        let layout_reset = tick.header.layout_reset || tick.footer.layout_reset;
        if let Some(expected) = self.layout_reset {
            if expected != layout_reset {
                out.push(format!(
                    "layout_reset: expected {expected}, got {layout_reset}"
                ));
            }
        }

        out
    }
}

impl Scenario {
    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        Ok(scenario)
    }

    /// Name for display, falling back to the file stem
    pub fn display_name<'a>(&'a self, path: &'a Path) -> &'a str {
        self.name
            .as_deref()
            .or_else(|| path.file_stem().and_then(|stem| stem.to_str()))
            .unwrap_or("scenario")
    }
}
