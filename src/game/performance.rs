//! Tick timing
//!
//! Tracks how much of the fixed-step budget each simulation tick uses so the
//! session loop can report when it is falling behind real time.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Performance status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceStatus {
    /// Well inside budget
    Excellent,
    Good,
    /// Close to the budget; frame spikes will start dropping time
    Warning,
    /// Over budget; the accumulator cannot keep up
    Critical,
}

impl PerformanceStatus {
    /// Whether the loop can sustain real time
    pub fn is_healthy(&self) -> bool {
        matches!(self, PerformanceStatus::Excellent | PerformanceStatus::Good)
    }
}

/// Rolling window of tick durations
pub struct TickMonitor {
    tick_durations: VecDeque<Duration>,
    max_samples: usize,
    /// One fixed step of wall time
    target_tick_duration: Duration,
    excellent_threshold: f32,
    warning_threshold: f32,
    critical_threshold: f32,
    status: PerformanceStatus,
    tick_start: Option<Instant>,
    ticks_recorded: u64,
}

impl TickMonitor {
    pub fn new(tick_rate: u32) -> Self {
        let target_tick_duration = Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64);

        Self {
            tick_durations: VecDeque::with_capacity(120), // ~2 seconds at 60Hz
            max_samples: 120,
            target_tick_duration,
            excellent_threshold: 0.3,
            warning_threshold: 0.7,
            critical_threshold: 1.0,
            status: PerformanceStatus::Excellent,
            tick_start: None,
            ticks_recorded: 0,
        }
    }

    /// Start timing a tick
    pub fn tick_start(&mut self) {
        self.tick_start = Some(Instant::now());
    }

    /// End timing a tick and record the duration
    pub fn tick_end(&mut self) {
        if let Some(start) = self.tick_start.take() {
            self.record_tick(start.elapsed());
        }
    }

    fn record_tick(&mut self, duration: Duration) {
        self.tick_durations.push_back(duration);
        while self.tick_durations.len() > self.max_samples {
            self.tick_durations.pop_front();
        }
        self.ticks_recorded += 1;
        self.update_status();
    }

    fn update_status(&mut self) {
        if self.tick_durations.len() < 10 {
            // Not enough data yet
            return;
        }

        let ratio = self.budget_usage_percent() / 100.0;
        self.status = if ratio < self.excellent_threshold {
            PerformanceStatus::Excellent
        } else if ratio < self.warning_threshold {
            PerformanceStatus::Good
        } else if ratio < self.critical_threshold {
            PerformanceStatus::Warning
        } else {
            PerformanceStatus::Critical
        };
    }

    pub fn average_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.tick_durations.iter().sum();
        sum / self.tick_durations.len() as u32
    }

    /// Get the 95th percentile tick duration
    pub fn p95_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<_> = self.tick_durations.iter().copied().collect();
        sorted.sort();
        let idx = (sorted.len() as f32 * 0.95) as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(Duration::ZERO)
    }

    pub fn status(&self) -> PerformanceStatus {
        self.status
    }

    /// Budget usage as percentage (0-100+)
    pub fn budget_usage_percent(&self) -> f32 {
        let avg = self.average_tick_duration();
        (avg.as_secs_f64() / self.target_tick_duration.as_secs_f64()) as f32 * 100.0
    }

    pub fn ticks_recorded(&self) -> u64 {
        self.ticks_recorded
    }

    /// Human-readable status line
    pub fn status_message(&self) -> String {
        format!(
            "{:?} - {:.1}% budget, p95 {:?}",
            self.status,
            self.budget_usage_percent(),
            self.p95_tick_duration()
        )
    }
}

impl Default for TickMonitor {
    fn default() -> Self {
        Self::new(60)
    }
}
