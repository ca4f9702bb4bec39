//! Runtime Metrics & Instrumentation
//!
//! Lightweight counters and a frame-budget monitor for the AI tick.
//!
//! Counters are lock-free `AtomicU64`s incremented in the hot path and read
//! on export. The frame history sits behind a `parking_lot::Mutex` because it
//! is written once per frame and read rarely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Counters (lock-free)
// ---------------------------------------------------------------------------

/// Atomic counters for high-frequency AI events, shared by every agent of a
/// world through an `Arc`.
#[derive(Debug)]
pub struct AiCounters {
    /// Behavior state changes.
    pub state_transitions: AtomicU64,
    /// Ticks on which an agent saw its target.
    pub sightings: AtomicU64,
    /// Bus-delivered sounds received.
    pub sounds_heard: AtomicU64,
    /// Position alerts that were adopted.
    pub alerts_accepted: AtomicU64,
    /// Position alerts dropped by the investigate roll.
    pub alerts_ignored: AtomicU64,
    /// Attacks that dealt damage.
    pub attacks_landed: AtomicU64,
    /// Stuck paths that were reset and reissued.
    pub stuck_recoveries: AtomicU64,
    /// Roam points chosen.
    pub roam_picks: AtomicU64,
    /// Agents that died.
    pub deaths: AtomicU64,
}

impl AiCounters {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state_transitions: AtomicU64::new(0),
            sightings: AtomicU64::new(0),
            sounds_heard: AtomicU64::new(0),
            alerts_accepted: AtomicU64::new(0),
            alerts_ignored: AtomicU64::new(0),
            attacks_landed: AtomicU64::new(0),
            stuck_recoveries: AtomicU64::new(0),
            roam_picks: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
        }
    }

    /// Add one to `counter`.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            state_transitions: self.state_transitions.load(Ordering::Relaxed),
            sightings: self.sightings.load(Ordering::Relaxed),
            sounds_heard: self.sounds_heard.load(Ordering::Relaxed),
            alerts_accepted: self.alerts_accepted.load(Ordering::Relaxed),
            alerts_ignored: self.alerts_ignored.load(Ordering::Relaxed),
            attacks_landed: self.attacks_landed.load(Ordering::Relaxed),
            stuck_recoveries: self.stuck_recoveries.load(Ordering::Relaxed),
            roam_picks: self.roam_picks.load(Ordering::Relaxed),
            deaths: self.deaths.load(Ordering::Relaxed),
        }
    }
}

impl Default for AiCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Behavior state changes.
    pub state_transitions: u64,
    /// Target sightings.
    pub sightings: u64,
    /// Sounds heard via the bus.
    pub sounds_heard: u64,
    /// Alerts adopted.
    pub alerts_accepted: u64,
    /// Alerts ignored.
    pub alerts_ignored: u64,
    /// Attacks landed.
    pub attacks_landed: u64,
    /// Stuck recoveries.
    pub stuck_recoveries: u64,
    /// Roam points picked.
    pub roam_picks: u64,
    /// Deaths.
    pub deaths: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let rows = [
            ("state_transitions", "Behavior state changes", self.state_transitions),
            ("sightings", "Target sightings", self.sightings),
            ("sounds_heard", "Sounds delivered by the bus", self.sounds_heard),
            ("alerts_accepted", "Position alerts adopted", self.alerts_accepted),
            ("alerts_ignored", "Position alerts ignored", self.alerts_ignored),
            ("attacks_landed", "Attacks that dealt damage", self.attacks_landed),
            ("stuck_recoveries", "Stuck paths reissued", self.stuck_recoveries),
            ("roam_picks", "Roam points picked", self.roam_picks),
            ("deaths", "Agents killed", self.deaths),
        ];
        rows.iter()
            .map(|(name, help, value)| {
                format!(
                    "# HELP haunt_{name}_total {help}\n\
                     # TYPE haunt_{name}_total counter\n\
                     haunt_{name}_total {value}\n"
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Frame Budget Monitor
// ---------------------------------------------------------------------------

const HISTORY_LEN: usize = 256;

/// Tracks wall-clock time spent in the AI tick per frame.
///
/// ```rust,no_run
/// # use haunt_core::metrics::FrameBudgetMonitor;
/// let monitor = FrameBudgetMonitor::new(2.0);
/// {
///     let _guard = monitor.begin_frame();
///     // ... tick every agent ...
/// }
/// assert_eq!(monitor.frame_count(), 1);
/// ```
#[derive(Debug)]
pub struct FrameBudgetMonitor {
    budget_ms: f64,
    history: Mutex<FrameHistory>,
}

#[derive(Debug)]
struct FrameHistory {
    timings: Vec<f64>,
    write_idx: usize,
    count: u64,
    last_over_budget: bool,
}

impl FrameBudgetMonitor {
    /// A monitor with a per-frame budget in milliseconds.
    #[must_use]
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            history: Mutex::new(FrameHistory {
                timings: vec![0.0; HISTORY_LEN],
                write_idx: 0,
                count: 0,
                last_over_budget: false,
            }),
        }
    }

    /// Start timing a frame; the guard records on drop.
    #[must_use]
    pub fn begin_frame(&self) -> FrameGuard<'_> {
        FrameGuard {
            monitor: self,
            start: Instant::now(),
        }
    }

    /// Record one frame timing in milliseconds.
    pub fn record(&self, ms: f64) {
        let mut h = self.history.lock();
        let idx = h.write_idx;
        h.timings[idx] = ms;
        h.write_idx = (idx + 1) % HISTORY_LEN;
        h.count += 1;
        h.last_over_budget = ms > self.budget_ms;
    }

    /// Last recorded frame in milliseconds.
    #[must_use]
    pub fn last_frame_ms(&self) -> f64 {
        let h = self.history.lock();
        if h.count == 0 {
            return 0.0;
        }
        h.timings[(h.write_idx + HISTORY_LEN - 1) % HISTORY_LEN]
    }

    /// Whether the last frame blew the budget.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.history.lock().last_over_budget
    }

    /// P50 / P95 / P99 / max over the recorded history.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn percentiles(&self) -> FramePercentiles {
        let h = self.history.lock();
        let n = usize::try_from(h.count).unwrap_or(usize::MAX).min(HISTORY_LEN);
        if n == 0 {
            return FramePercentiles::default();
        }

        let mut sorted = h.timings[..n].to_vec();
        sorted.sort_by(f64::total_cmp);

        let at = |q: f64| sorted[((n as f64 * q) as usize).min(n - 1)];
        let over = sorted.iter().filter(|&&t| t > self.budget_ms).count();
        FramePercentiles {
            p50: at(0.5),
            p95: at(0.95),
            p99: at(0.99),
            max: sorted[n - 1],
            over_budget_ratio: over as f64 / n as f64,
        }
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.history.lock().count
    }

    /// Budget in milliseconds.
    #[must_use]
    pub fn budget_ms(&self) -> f64 {
        self.budget_ms
    }
}

/// Records the elapsed time into its monitor when dropped.
pub struct FrameGuard<'a> {
    monitor: &'a FrameBudgetMonitor,
    start: Instant,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.monitor.record(self.start.elapsed().as_secs_f64() * 1000.0);
    }
}

/// Frame timing percentiles in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FramePercentiles {
    /// Median.
    pub p50: f64,
    /// 95th percentile.
    pub p95: f64,
    /// 99th percentile.
    pub p99: f64,
    /// Worst frame.
    pub max: f64,
    /// Share of frames over budget (0.0–1.0).
    pub over_budget_ratio: f64,
}

impl FramePercentiles {
    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self, budget_ms: f64) -> String {
        format!(
            "P50={:.3}ms  P95={:.3}ms  P99={:.3}ms  Max={:.3}ms  Budget={budget_ms:.1}ms  Over-budget={:.1}%",
            self.p50,
            self.p95,
            self.p99,
            self.max,
            self.over_budget_ratio * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Tracing Span Names
// ---------------------------------------------------------------------------

/// Span names used with `tracing` spans.
pub mod spans {
    /// One world frame.
    pub const FRAME: &str = "haunt::frame";
    /// One agent tick.
    pub const AGENT_TICK: &str = "haunt::agent::tick";
    /// Sound bus delivery.
    pub const SOUND_EMIT: &str = "haunt::sound::emit";
    /// Scenario loading.
    pub const SCENARIO_LOAD: &str = "haunt::scenario::load";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_snapshot() {
        let c = AiCounters::new();
        AiCounters::bump(&c.sightings);
        AiCounters::bump(&c.sightings);
        AiCounters::bump(&c.deaths);
        let s = c.snapshot();
        assert_eq!(s.sightings, 2);
        assert_eq!(s.deaths, 1);
        assert_eq!(s.attacks_landed, 0);
    }

    #[test]
    fn prometheus_export() {
        let c = AiCounters::new();
        AiCounters::bump(&c.attacks_landed);
        let text = c.snapshot().to_prometheus();
        assert!(text.contains("haunt_attacks_landed_total 1"));
        assert!(text.contains("# TYPE haunt_deaths_total counter"));
    }

    #[test]
    fn frame_monitor_percentiles() {
        let m = FrameBudgetMonitor::new(2.0);
        for i in 1..=100 {
            m.record(f64::from(i) * 0.1);
        }
        let p = m.percentiles();
        assert!((p.max - 10.0).abs() < 1e-9);
        assert!(p.p50 > 4.0 && p.p50 < 6.0);
        assert!((p.over_budget_ratio - 0.8).abs() < 1e-9);
        assert!(m.is_over_budget());
        assert!((m.last_frame_ms() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_monitor() {
        let m = FrameBudgetMonitor::new(2.0);
        assert_eq!(m.frame_count(), 0);
        assert!(m.last_frame_ms().abs() < f64::EPSILON);
        assert_eq!(m.percentiles(), FramePercentiles::default());
    }

    #[test]
    fn guard_records_frame() {
        let m = FrameBudgetMonitor::new(100.0);
        drop(m.begin_frame());
        assert_eq!(m.frame_count(), 1);
        assert!(!m.is_over_budget());
    }
}
