//! Timing facilities for the render loop.
//!
//! Three pieces live here:
//!
//! - [`Clock`]: a monotonic tick counter with a known frequency. The render
//!   loop never reads wall time directly, so tests can drive it with a fake.
//! - [`VirtualClock`]: animation time. Advances by exactly one fixed step per
//!   processed frame, regardless of how long the frame really took.
//! - [`Pacer`]: busy-waits until one target frame duration has passed since
//!   the previous frame ended.
//!
//! # Example
//!
//! ```ignore
//! use plasma::time::{elapsed_ms, Pacer, SystemClock, VirtualClock};
//!
//! let mut pacer = Pacer::new(SystemClock::new(), refresh_hz);
//! let mut time = VirtualClock::new(pacer.target_frame_secs());
//!
//! loop {
//!     time.advance();
//!     draw(time.elapsed_secs());
//!     let (start, end) = pacer.wait();
//!     println!("{:.3} ms", elapsed_ms(start, end, pacer.frequency()));
//! }
//! ```

use std::time::Instant;

/// Refresh rate used when the display does not report one.
pub const DEFAULT_REFRESH_RATE: u32 = 60;

/// A monotonic performance counter.
pub trait Clock {
    /// Current counter value in ticks.
    fn counter(&self) -> u64;

    /// Ticks per second.
    fn frequency(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn counter(&self) -> u64 {
        (**self).counter()
    }

    fn frequency(&self) -> u64 {
        (**self).frequency()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn counter(&self) -> u64 {
        (**self).counter()
    }

    fn frequency(&self) -> u64 {
        (**self).frequency()
    }
}

/// Nanosecond counter over [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn counter(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    #[inline]
    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Seconds between two counter samples.
#[inline]
pub fn elapsed_secs(start: u64, end: u64, frequency: u64) -> f64 {
    end.saturating_sub(start) as f64 / frequency as f64
}

/// Milliseconds between two counter samples.
#[inline]
pub fn elapsed_ms(start: u64, end: u64, frequency: u64) -> f64 {
    end.saturating_sub(start) as f64 * 1000.0 / frequency as f64
}

/// Replace an unknown (zero) refresh rate with [`DEFAULT_REFRESH_RATE`].
#[inline]
pub fn effective_refresh_rate(reported_hz: u32) -> u32 {
    if reported_hz == 0 {
        DEFAULT_REFRESH_RATE
    } else {
        reported_hz
    }
}

/// Fixed-step animation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualClock {
    elapsed_secs: f64,
    step_secs: f64,
    frame_count: u64,
}

impl VirtualClock {
    /// Start at zero with the given step in seconds.
    pub fn new(step_secs: f64) -> Self {
        Self {
            elapsed_secs: 0.0,
            step_secs,
            frame_count: 0,
        }
    }

    /// Advance by one step. Returns the new elapsed time in seconds.
    pub fn advance(&mut self) -> f64 {
        self.frame_count += 1;
        self.elapsed_secs += self.step_secs;
        self.elapsed_secs
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs * 1000.0
    }

    #[inline]
    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }

    /// Number of steps taken.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

/// Counter samples taken during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTiming {
    /// End of the previous frame.
    pub frame_start: u64,
    pub draw_start: u64,
    pub draw_end: u64,
    /// Counter value when the pacing wait finished.
    pub frame_end: u64,
}

impl FrameTiming {
    pub fn elapsed_ms(&self, frequency: u64) -> f64 {
        elapsed_ms(self.frame_start, self.frame_end, frequency)
    }

    pub fn draw_ms(&self, frequency: u64) -> f64 {
        elapsed_ms(self.draw_start, self.draw_end, frequency)
    }

    /// Instantaneous frames per second for this frame.
    pub fn fps(&self, frequency: u64) -> f64 {
        let ticks = self.frame_end.saturating_sub(self.frame_start).max(1);
        frequency as f64 / ticks as f64
    }
}

/// Spin-waiting frame limiter.
///
/// The wait is a busy poll of the counter instead of a sleep, so frame
/// boundaries are not rounded to the OS timer resolution.
#[derive(Debug)]
pub struct Pacer<C: Clock> {
    clock: C,
    refresh_hz: u32,
    target_ticks: u64,
    last_frame_start: u64,
}

impl<C: Clock> Pacer<C> {
    /// Create a pacer for a display reporting `refresh_hz` (0 = unknown).
    pub fn new(clock: C, refresh_hz: u32) -> Self {
        let refresh_hz = effective_refresh_rate(refresh_hz);
        let frequency = clock.frequency();
        // ceil(F / hz): never accept a frame shorter than 1/hz seconds
        let target_ticks = frequency.div_ceil(refresh_hz as u64);
        let last_frame_start = clock.counter();

        Self {
            clock,
            refresh_hz,
            target_ticks,
            last_frame_start,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.clock.counter()
    }

    #[inline]
    pub fn frequency(&self) -> u64 {
        self.clock.frequency()
    }

    pub fn refresh_hz(&self) -> u32 {
        self.refresh_hz
    }

    /// Minimum counter delta between two frame ends.
    pub fn target_ticks(&self) -> u64 {
        self.target_ticks
    }

    /// Target frame duration in seconds, `1 / refresh_hz`.
    pub fn target_frame_secs(&self) -> f64 {
        1.0 / self.refresh_hz as f64
    }

    pub fn last_frame_start(&self) -> u64 {
        self.last_frame_start
    }

    /// Restart the baseline at the current counter value.
    pub fn reset(&mut self) {
        self.last_frame_start = self.clock.counter();
    }

    /// Spin until the target duration has passed since the last frame.
    ///
    /// Returns `(frame_start, frame_end)`; `frame_end` becomes the baseline
    /// for the next call.
    pub fn wait(&mut self) -> (u64, u64) {
        let frame_start = self.last_frame_start;
        let mut now = self.clock.counter();
        while now.saturating_sub(frame_start) < self.target_ticks {
            std::hint::spin_loop();
            now = self.clock.counter();
        }
        self.last_frame_start = now;
        (frame_start, now)
    }
}
