//! Scenario replay
//!
//! Runs scenario steps through a coordinator on a virtual clock. Every tick
//! step advances the clock by one frame; deferred completions that have come
//! due are applied before the tick is evaluated, the way a host frame loop
//! would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use pullkit_core::{
    EdgeKind, EdgeOutput, EdgeRuntimeState, LastUpdatedStore, PendingCompletions,
    RefreshCoordinator, RefreshState,
};
use serde::Serialize;

use crate::scenario::{Scenario, Step};

/// Configuration for a replay run
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Virtual time between tick steps
    pub frame: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(16),
        }
    }
}

impl ReplayConfig {
    pub fn with_frame_ms(mut self, millis: u64) -> Self {
        self.frame = Duration::from_millis(millis);
        self
    }
}

/// Edge state after a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub state: RefreshState,
    pub progress: f32,
    pub offset: f32,
    pub gap: f32,
    pub fire: bool,
    pub layout_reset: bool,
}

impl From<EdgeOutput> for EdgeRecord {
    fn from(output: EdgeOutput) -> Self {
        Self {
            state: output.state,
            progress: output.progress,
            offset: output.padding.offset,
            gap: output.padding.gap,
            fire: output.fire,
            layout_reset: output.layout_reset,
        }
    }
}

impl From<&EdgeRuntimeState> for EdgeRecord {
    fn from(edge: &EdgeRuntimeState) -> Self {
        Self {
            state: edge.state,
            progress: edge.progress,
            offset: edge.padding.offset,
            gap: edge.padding.gap,
            fire: false,
            layout_reset: false,
        }
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub kind: &'static str,
    /// Virtual time in milliseconds
    pub at_ms: u64,
    /// False for ticks the coordinator skipped
    pub applied: bool,
    pub header: EdgeRecord,
    pub footer: EdgeRecord,
    pub mismatches: Vec<String>,
}

/// Totals for a finished run
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    pub header_actions: usize,
    pub footer_actions: usize,
    pub failed_steps: usize,
    /// Header last-updated time, in milliseconds since the Unix epoch
    pub header_last_updated_ms: Option<u64>,
}

/// Drives a coordinator through a scenario
pub struct Replay {
    coordinator: RefreshCoordinator,
    pending: PendingCompletions,
    config: ReplayConfig,
    start: Instant,
    elapsed: Duration,
    header_actions: Arc<AtomicUsize>,
    footer_actions: Arc<AtomicUsize>,
    failed_steps: usize,
    steps: usize,
}

impl Replay {
    /// Create a replay for the scenario's config
    pub fn new(scenario: &Scenario, config: ReplayConfig) -> Self {
        Self::with_coordinator(RefreshCoordinator::new(scenario.config.clone()), config)
    }

    /// Create a replay that records header completions in `store`
    pub fn with_store<S: LastUpdatedStore + Send + 'static>(
        scenario: &Scenario,
        config: ReplayConfig,
        store: S,
    ) -> Self {
        let coordinator = RefreshCoordinator::new(scenario.config.clone()).with_store(store);
        Self::with_coordinator(coordinator, config)
    }

    fn with_coordinator(coordinator: RefreshCoordinator, config: ReplayConfig) -> Self {
        let header_actions = Arc::new(AtomicUsize::new(0));
        let footer_actions = Arc::new(AtomicUsize::new(0));
        let (header, footer) = (header_actions.clone(), footer_actions.clone());
        let coordinator = coordinator
            .on_header_action(move || {
                header.fetch_add(1, Ordering::SeqCst);
            })
            .on_footer_action(move || {
                footer.fetch_add(1, Ordering::SeqCst);
            });

        Self {
            coordinator,
            pending: PendingCompletions::new(),
            config,
            start: Instant::now(),
            elapsed: Duration::ZERO,
            header_actions,
            footer_actions,
            failed_steps: 0,
            steps: 0,
        }
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Run one step
    pub fn step(&mut self, index: usize, step: &Step) -> StepRecord {
        let mut applied = true;
        let mut mismatches = Vec::new();
        let mut outputs = None;

        match step {
            Step::Tick { report, expect } => {
                self.elapsed += self.config.frame;
                let now = self.now();
                for completion in self.pending.drain_due(now) {
                    self.coordinator.apply_completion(completion);
                }
                let tick = self.coordinator.evaluate_report(report);
                applied = tick.applied;
                mismatches = expect.mismatches(&tick);
                outputs = Some((EdgeRecord::from(tick.header), EdgeRecord::from(tick.footer)));
            }
            Step::SetState { edge, state } => match edge {
                EdgeKind::Header => self.coordinator.set_header_state(*state),
                EdgeKind::Footer => self.coordinator.set_footer_state(*state),
            },
            Step::Complete { edge, no_more } => {
                let now = self.now();
                self.pending.complete(*edge, *no_more, now);
            }
            Step::Tap { fire } => {
                let fired = self.coordinator.tap_footer();
                if let Some(expected) = fire {
                    if *expected != fired {
                        mismatches.push(format!("tap fire: expected {expected}, got {fired}"));
                    }
                }
                let mut footer = EdgeRecord::from(self.coordinator.footer());
                footer.fire = fired;
                outputs = Some((EdgeRecord::from(self.coordinator.header()), footer));
            }
        }

        let (header, footer) = outputs.unwrap_or_else(|| {
            (
                EdgeRecord::from(self.coordinator.header()),
                EdgeRecord::from(self.coordinator.footer()),
            )
        });

        self.steps += 1;
        if !mismatches.is_empty() {
            self.failed_steps += 1;
            tracing::debug!(index, kind = step.kind(), ?mismatches, "step failed");
        }

        StepRecord {
            index,
            kind: step.kind(),
            at_ms: self.elapsed.as_millis() as u64,
            applied,
            header,
            footer,
            mismatches,
        }
    }

    /// Run every step of the scenario
    pub fn run(&mut self, scenario: &Scenario) -> Vec<StepRecord> {
        scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.step(index, step))
            .collect()
    }

    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            steps: self.steps,
            header_actions: self.header_actions.load(Ordering::SeqCst),
            footer_actions: self.footer_actions.load(Ordering::SeqCst),
            failed_steps: self.failed_steps,
            header_last_updated_ms: self
                .coordinator
                .header_last_updated()
                .and_then(epoch_millis),
        }
    }
}

/// Human-readable line for a step
pub fn format_record(record: &StepRecord) -> String {
    let mut line = format!(
        "#{:<3} {:>6}ms {:<9} header={:<12} {:.3} footer={:<12} {:.3}",
        record.index,
        record.at_ms,
        record.kind,
        record.header.state.as_str(),
        record.header.progress,
        record.footer.state.as_str(),
        record.footer.progress,
    );
    if record.header.fire {
        line.push_str(" [header action]");
    }
    if record.footer.fire {
        line.push_str(" [footer action]");
    }
    if record.header.layout_reset || record.footer.layout_reset {
        line.push_str(" [layout reset]");
    }
    if !record.applied {
        line.push_str(" (skipped)");
    }
    for mismatch in &record.mismatches {
        line.push_str("\n      ! ");
        line.push_str(mismatch);
    }
    line
}

/// Time as milliseconds since the Unix epoch
pub fn epoch_millis(at: SystemTime) -> Option<u64> {
    at.duration_since(UNIX_EPOCH)
        .ok()
        .map(|since| since.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullkit_core::MemoryStore;

    const HEADER_CYCLE: &str = r#"
[config.header]

[[steps]]
kind = "tick"
[steps.report]
dragging = true
viewport = { width = 390.0, height = 800.0 }
[[steps.report.regions]]
role = "header"
rect = { x = 0.0, y = 12.0, width = 390.0, height = 60.0 }
[[steps.report.regions]]
role = "content"
rect = { x = 0.0, y = 72.0, width = 390.0, height = 1200.0 }
[steps.expect]
header = "pulling"
fire = false

[[steps]]
kind = "tick"
[steps.report]
viewport = { width = 390.0, height = 800.0 }
[[steps.report.regions]]
role = "header"
rect = { x = 0.0, y = 12.0, width = 390.0, height = 60.0 }
[[steps.report.regions]]
role = "content"
rect = { x = 0.0, y = 72.0, width = 390.0, height = 1200.0 }
[steps.expect]
header = "refreshing"
header_progress = 0.0
fire = true

[[steps]]
kind = "complete"
edge = "header"

[[steps]]
kind = "tick"
[steps.report]
viewport = { width = 390.0, height = 800.0 }
[[steps.report.regions]]
role = "header"
rect = { x = 0.0, y = 0.0, width = 390.0, height = 60.0 }
[[steps.report.regions]]
role = "content"
rect = { x = 0.0, y = 60.0, width = 390.0, height = 1200.0 }
[steps.expect]
header = "refreshing"
layout_reset = true
"#;

    fn settled_tick() -> &'static str {
        r#"
[[steps]]
kind = "tick"
[steps.report]
viewport = { width = 390.0, height = 800.0 }
[[steps.report.regions]]
role = "header"
rect = { x = 0.0, y = -60.0, width = 390.0, height = 60.0 }
[[steps.report.regions]]
role = "content"
rect = { x = 0.0, y = 0.0, width = 390.0, height = 1200.0 }
"#
    }

    #[test]
    fn test_header_cycle_meets_expectations() {
        let scenario = Scenario::parse(HEADER_CYCLE).unwrap();
        let mut replay = Replay::new(&scenario, ReplayConfig::default());
        let records = replay.run(&scenario);

        assert_eq!(records.len(), 4);
        for record in &records {
            assert!(record.mismatches.is_empty(), "{}", format_record(record));
        }
        assert_eq!(records[0].at_ms, 16);
        assert_eq!(records[2].kind, "complete");

        let summary = replay.summary();
        assert_eq!(summary.header_actions, 1);
        assert_eq!(summary.failed_steps, 0);
    }

    #[test]
    fn test_completion_applies_after_delay() {
        // 100ms delay: the completion queued at 32ms lands on the tick at 144ms
        let mut text = HEADER_CYCLE.to_string();
        for _ in 0..7 {
            text.push_str(settled_tick());
        }
        let scenario = Scenario::parse(&text).unwrap();
        let mut replay = Replay::with_store(&scenario, ReplayConfig::default(), MemoryStore::new());
        let records = replay.run(&scenario);

        let states: Vec<_> = records[4..]
            .iter()
            .map(|r| (r.at_ms, r.header.state))
            .collect();
        assert_eq!(states[0], (64, RefreshState::Refreshing));
        assert_eq!(states[4], (128, RefreshState::Refreshing));
        assert_eq!(states[5], (144, RefreshState::EndRefresh));
        assert_eq!(states[6], (160, RefreshState::EndRefresh));
        assert!(replay.summary().header_last_updated_ms.is_some());
    }

    #[test]
    fn test_mismatch_is_reported() {
        let text = HEADER_CYCLE.replace("header = \"pulling\"", "header = \"idle\"");
        let scenario = Scenario::parse(&text).unwrap();
        let mut replay = Replay::new(&scenario, ReplayConfig::default());
        let records = replay.run(&scenario);

        assert_eq!(
            records[0].mismatches,
            vec!["header state: expected idle, got pulling".to_string()]
        );
        assert_eq!(replay.summary().failed_steps, 1);
        assert!(format_record(&records[0]).contains("! header state"));
    }

    #[test]
    fn test_tap_step() {
        let scenario = Scenario::parse(
            r#"
[config.footer]
kind = "auto"

[[steps]]
kind = "tap"
fire = true

[[steps]]
kind = "tap"
fire = true
"#,
        )
        .unwrap();
        let mut replay = Replay::new(&scenario, ReplayConfig::default());
        let records = replay.run(&scenario);

        assert!(records[0].mismatches.is_empty());
        assert!(records[0].footer.fire);
        assert_eq!(records[0].footer.state, RefreshState::Refreshing);
        assert_eq!(records[1].mismatches.len(), 1);
        assert_eq!(replay.summary().footer_actions, 1);
    }
}
