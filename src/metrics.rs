//! Once-per-second frame metrics.
//!
//! Purely observational: the reporter reads counter samples the loop already
//! took and never influences pacing.

use std::fmt;
use std::io::{self, Write};

use crate::time::{elapsed_ms, FrameTiming};

/// Default report interval in milliseconds.
pub const REPORT_INTERVAL_MS: f64 = 1000.0;

/// One metrics report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub ms_per_frame: f64,
    pub fps: f64,
    pub draw_ms: f64,
}

impl FrameMetrics {
    pub fn from_timing(timing: &FrameTiming, frequency: u64) -> Self {
        Self {
            ms_per_frame: timing.elapsed_ms(frequency),
            fps: timing.fps(frequency),
            draw_ms: timing.draw_ms(frequency),
        }
    }
}

impl fmt::Display for FrameMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ms/f: {:.6}, fps: {:.6}, draw-ms/f: {:.6}",
            self.ms_per_frame, self.fps, self.draw_ms
        )
    }
}

/// Emits [`FrameMetrics`] at most once per interval.
#[derive(Debug)]
pub struct MetricsReporter {
    last_report: u64,
    interval_ms: f64,
}

impl MetricsReporter {
    /// Start the interval at counter value `now`.
    pub fn new(now: u64) -> Self {
        Self {
            last_report: now,
            interval_ms: REPORT_INTERVAL_MS,
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: f64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn reset(&mut self, now: u64) {
        self.last_report = now;
    }

    /// Report for `timing` if more than one interval passed since the last one.
    pub fn record(&mut self, timing: &FrameTiming, now: u64, frequency: u64) -> Option<FrameMetrics> {
        if elapsed_ms(self.last_report, now, frequency) > self.interval_ms {
            self.last_report = now;
            Some(FrameMetrics::from_timing(timing, frequency))
        } else {
            None
        }
    }
}

/// Overwrite the current console line with `metrics`.
pub fn print_metrics(out: &mut impl Write, metrics: &FrameMetrics) -> io::Result<()> {
    write!(out, "{}\r", metrics)?;
    out.flush()
}

/// Move past the last metrics line so later output starts on a fresh line.
pub fn end_metrics_line(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    out.flush()
}
