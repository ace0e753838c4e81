//! The per-frame state machine.
//!
//! One [`RenderLoop::step`] is one frame:
//!
//! 1. poll at most one input event (quit ends the loop before drawing)
//! 2. advance the virtual clock by one fixed step
//! 3. let the scene draw
//! 4. spin until the frame duration is reached
//! 5. present
//! 6. report metrics about once a second
//!
//! The loop knows nothing about windows or GPUs. It talks to an
//! [`EventSource`] and a [`Surface`], so the whole state machine runs the
//! same way under winit and in tests.

use std::io;

use crate::error::PresentError;
use crate::input::{Event, EventSource};
use crate::metrics::{end_metrics_line, print_metrics, FrameMetrics, MetricsReporter};
use crate::scene::{Frame, Scene};
use crate::time::{Clock, FrameTiming, Pacer, VirtualClock};

/// Lifecycle of a render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Resources are being acquired.
    Initializing,
    /// Frames are being produced.
    Running,
    /// A quit was requested or a frame failed; resources are being released.
    Draining,
    /// Done. See [`RenderLoop::status`].
    Terminated,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    /// Process exit code.
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

/// Where finished frames go.
pub trait Surface {
    /// Upload and show one frame.
    fn present(&mut self, frame: Frame<'_>) -> Result<(), PresentError>;

    /// The drawable area changed size, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
}

/// Drives a [`Scene`] at a fixed virtual time step.
pub struct RenderLoop<C: Clock> {
    state: LoopState,
    status: ExitStatus,
    scene: Box<dyn Scene>,
    time: VirtualClock,
    pacer: Pacer<C>,
    metrics: MetricsReporter,
    last_timing: Option<FrameTiming>,
    last_metrics: Option<FrameMetrics>,
    console_metrics: bool,
}

impl<C: Clock> RenderLoop<C> {
    /// Create a loop in [`LoopState::Initializing`].
    ///
    /// `refresh_hz` is the display's reported rate; 0 means unknown and
    /// falls back to 60 Hz. The virtual time step is one target frame.
    pub fn new(scene: Box<dyn Scene>, clock: C, refresh_hz: u32) -> Self {
        let pacer = Pacer::new(clock, refresh_hz);
        let time = VirtualClock::new(pacer.target_frame_secs());
        let metrics = MetricsReporter::new(pacer.now());

        Self {
            state: LoopState::Initializing,
            status: ExitStatus::Success,
            scene,
            time,
            pacer,
            metrics,
            last_timing: None,
            last_metrics: None,
            console_metrics: true,
        }
    }

    /// Print metric reports to stdout (the default) or keep them silent.
    pub fn with_console_metrics(mut self, enabled: bool) -> Self {
        self.console_metrics = enabled;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    pub fn time(&self) -> &VirtualClock {
        &self.time
    }

    pub fn pacer(&self) -> &Pacer<C> {
        &self.pacer
    }

    /// Counter samples of the most recent presented frame.
    pub fn last_timing(&self) -> Option<FrameTiming> {
        self.last_timing
    }

    /// Most recent metrics report.
    pub fn last_metrics(&self) -> Option<FrameMetrics> {
        self.last_metrics
    }

    /// Resources are acquired; start producing frames.
    pub fn begin(&mut self) {
        if self.state != LoopState::Initializing {
            return;
        }
        self.pacer.reset();
        self.metrics.reset(self.pacer.now());
        self.state = LoopState::Running;
        log::info!(
            "running {} at {} Hz ({:.3} ms/frame)",
            self.scene.name(),
            self.pacer.refresh_hz(),
            self.pacer.target_frame_secs() * 1000.0
        );
    }

    /// Resource acquisition failed; terminate without running. The window
    /// driver calls this when GPU setup fails after the loop was built.
    pub fn fail(&mut self) {
        self.status = ExitStatus::Failure;
        self.state = LoopState::Terminated;
    }

    /// Run one frame. Does nothing unless the loop is running.
    pub fn step(&mut self, events: &mut impl EventSource, surface: &mut impl Surface) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }

        if let Some(event) = events.poll_event() {
            if event.is_quit() {
                log::info!("quit requested after {} frames", self.time.frame());
                self.state = LoopState::Draining;
                return self.state;
            }
            if let Event::Resized { width, height } = event {
                surface.resize(width, height);
            }
            self.scene.handle_event(&event);
        }

        self.time.advance();

        let draw_start = self.pacer.now();
        let frame = self.scene.draw(&self.time);
        let draw_end = self.pacer.now();

        let (frame_start, frame_end) = self.pacer.wait();

        if let Err(e) = surface.present(frame) {
            log::error!("{}", e);
            self.status = ExitStatus::Failure;
            self.state = LoopState::Draining;
            return self.state;
        }

        let timing = FrameTiming {
            frame_start,
            draw_start,
            draw_end,
            frame_end,
        };
        self.last_timing = Some(timing);

        if let Some(metrics) = self.metrics.record(&timing, frame_end, self.pacer.frequency()) {
            self.last_metrics = Some(metrics);
            if self.console_metrics {
                if let Err(e) = print_metrics(&mut io::stdout().lock(), &metrics) {
                    log::warn!("could not write metrics: {}", e);
                }
            }
        }

        self.state
    }

    /// Resources are released; the loop is over.
    pub fn finish(&mut self) -> ExitStatus {
        if self.state != LoopState::Terminated {
            self.state = LoopState::Terminated;
            if self.console_metrics && self.last_metrics.is_some() {
                // leave the metrics line intact
                if let Err(e) = end_metrics_line(&mut io::stdout().lock()) {
                    log::warn!("could not write metrics: {}", e);
                }
            }
            log::info!("terminated after {} frames", self.time.frame());
        }
        self.status
    }

    /// Drive the whole state machine until a quit or a present failure.
    pub fn run(&mut self, events: &mut impl EventSource, surface: &mut impl Surface) -> ExitStatus {
        self.begin();
        while self.step(events, surface) == LoopState::Running {}
        self.finish()
    }
}
