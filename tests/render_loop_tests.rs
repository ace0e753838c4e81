//! Integration tests for the render loop state machine.
//!
//! The loop runs against a manual clock, a recording surface and scripted
//! events, so no window or GPU is needed.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use plasma::error::PresentError;
use plasma::prelude::*;
use plasma::shader::PlasmaUniforms;

// ============================================================================
// Test doubles
// ============================================================================

/// Counter that only moves when told to, plus `auto_step` per read so the
/// pacer's spin terminates.
struct ManualClock {
    now: Cell<u64>,
    auto_step: u64,
    frequency: u64,
}

impl ManualClock {
    fn new(frequency: u64) -> Rc<Self> {
        Rc::new(Self {
            now: Cell::new(0),
            auto_step: 1,
            frequency,
        })
    }

    fn advance(&self, ticks: u64) {
        self.now.set(self.now.get() + ticks);
    }
}

impl Clock for ManualClock {
    fn counter(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.auto_step);
        now
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }
}

#[derive(Default)]
struct RecordingSurface {
    presented: usize,
    resizes: Vec<(u32, u32)>,
    last_pixels: Option<PixelBuffer>,
    fail_on: Option<usize>,
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: Frame<'_>) -> Result<(), PresentError> {
        if self.fail_on == Some(self.presented + 1) {
            return Err(PresentError("device lost".into()));
        }
        self.presented += 1;
        if let Frame::Pixels(pixels) = frame {
            self.last_pixels = Some(pixels.clone());
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }
}

/// Plays back a script of poll results, then asks to quit.
struct ScriptedEvents {
    script: VecDeque<Option<Event>>,
}

impl ScriptedEvents {
    fn idle_frames(frames: usize) -> Self {
        Self {
            script: std::iter::repeat(None).take(frames).collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<Event> {
        self.script.pop_front().unwrap_or(Some(Event::Quit))
    }
}

/// Records the virtual time of every draw and stalls the clock on request.
struct ProbeScene {
    clock: Rc<ManualClock>,
    times: Rc<RefCell<Vec<f64>>>,
    stall_on_draw: usize,
    stall_ticks: u64,
}

impl Scene for ProbeScene {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn draw(&mut self, time: &VirtualClock) -> Frame<'_> {
        let mut times = self.times.borrow_mut();
        times.push(time.elapsed_secs());
        if times.len() == self.stall_on_draw {
            self.clock.advance(self.stall_ticks);
        }
        Frame::Plasma(PlasmaUniforms {
            resolution: [1.0, 1.0],
            time: time.elapsed_secs() as f32,
            scale: 20.0,
        })
    }
}

fn quiet_loop(scene: Box<dyn Scene>, clock: Rc<ManualClock>, refresh_hz: u32) -> RenderLoop<Rc<ManualClock>> {
    RenderLoop::new(scene, clock, refresh_hz).with_console_metrics(false)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_five_frames_then_quit() {
    let clock = ManualClock::new(1_000_000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::rgb(4, 4)), clock, 0);
    let mut events = EventQueue::new();
    let mut surface = RecordingSurface::default();

    assert_eq!(render_loop.state(), LoopState::Initializing);
    render_loop.begin();
    assert_eq!(render_loop.state(), LoopState::Running);
    assert_eq!(render_loop.pacer().refresh_hz(), 60);

    for _ in 0..5 {
        assert_eq!(render_loop.step(&mut events, &mut surface), LoopState::Running);
    }

    assert_eq!(render_loop.time().frame(), 5);
    assert!((render_loop.time().elapsed_secs() - 5.0 / 60.0).abs() < 1e-12);
    assert_eq!(surface.presented, 5);

    let pixels = surface.last_pixels.as_ref().unwrap();
    assert_eq!((pixels.width(), pixels.height()), (4, 4));

    events.push(Event::Quit);
    assert_eq!(render_loop.step(&mut events, &mut surface), LoopState::Draining);
    assert_eq!(render_loop.finish(), ExitStatus::Success);
    assert_eq!(render_loop.state(), LoopState::Terminated);
    assert_eq!(ExitStatus::Success.code(), 0);

    // the quit frame drew nothing
    assert_eq!(surface.presented, 5);
    assert_eq!(render_loop.time().frame(), 5);
}

#[test]
fn test_virtual_time_ignores_slow_frames() {
    let clock = ManualClock::new(1000);
    let times = Rc::new(RefCell::new(Vec::new()));
    let scene = ProbeScene {
        clock: clock.clone(),
        times: times.clone(),
        stall_on_draw: 2,
        // half a second of real time inside one draw
        stall_ticks: 500,
    };
    let mut render_loop = quiet_loop(Box::new(scene), clock, 60);

    let status = render_loop.run(&mut ScriptedEvents::idle_frames(4), &mut RecordingSurface::default());
    assert!(status.is_success());

    let times = times.borrow();
    assert_eq!(times.len(), 4);
    let step = 1.0 / 60.0;
    for (i, t) in times.iter().enumerate() {
        assert!((t - (i + 1) as f64 * step).abs() < 1e-12, "draw {} at {}", i, t);
    }

    // the stalled frame really was long
    let timing = render_loop.last_timing().unwrap();
    assert!(timing.frame_end > 500);
}

#[test]
fn test_pacer_never_under_waits() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::classic(3, 3)), clock, 60);
    let mut events = EventQueue::new();
    let mut surface = RecordingSurface::default();
    render_loop.begin();

    let target = render_loop.pacer().target_ticks();
    assert_eq!(target, 17);

    let mut previous_end = None;
    for _ in 0..30 {
        render_loop.step(&mut events, &mut surface);
        let timing = render_loop.last_timing().unwrap();
        assert!(timing.frame_end - timing.frame_start >= target);
        assert!(timing.draw_start <= timing.draw_end);
        if let Some(end) = previous_end {
            assert_eq!(timing.frame_start, end);
        }
        previous_end = Some(timing.frame_end);
    }
}

#[test]
fn test_escape_key_quits() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::rgb(2, 2)), clock, 60);
    let mut events = EventQueue::new();
    events.push(Event::KeyDown(KeyCode::Space));
    events.push(Event::KeyDown(KeyCode::Escape));
    let mut surface = RecordingSurface::default();

    assert_eq!(render_loop.run(&mut events, &mut surface), ExitStatus::Success);
    assert_eq!(surface.presented, 1);
}

#[test]
fn test_present_failure_still_tears_down() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::rgb(2, 2)), clock, 60);
    let mut surface = RecordingSurface {
        fail_on: Some(3),
        ..Default::default()
    };

    let status = render_loop.run(&mut ScriptedEvents::idle_frames(10), &mut surface);
    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(render_loop.state(), LoopState::Terminated);
    assert_eq!(surface.presented, 2);
}

#[test]
fn test_resize_reaches_surface_and_scene() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(ShaderPlasma::new(640, 480)), clock, 60);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents {
        script: VecDeque::from([
            None,
            Some(Event::Resized {
                width: 800,
                height: 600,
            }),
        ]),
    };

    render_loop.run(&mut events, &mut surface);
    assert_eq!(surface.resizes, vec![(800, 600)]);
    assert_eq!(render_loop.time().frame(), 2);
}

#[test]
fn test_metrics_reported_after_a_second() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::rgb(2, 2)), clock, 60);
    let mut events = EventQueue::new();
    let mut surface = RecordingSurface::default();
    render_loop.begin();

    for _ in 0..30 {
        render_loop.step(&mut events, &mut surface);
    }
    // 30 frames of at least 17 ms is only about half a second
    assert!(render_loop.last_metrics().is_none());

    for _ in 0..40 {
        render_loop.step(&mut events, &mut surface);
    }
    let metrics = render_loop.last_metrics().unwrap();
    assert!(metrics.ms_per_frame >= 1000.0 / 60.0);
    assert!(metrics.fps <= 60.0);
    assert!(metrics.draw_ms >= 0.0);
}

#[test]
fn test_failed_initialization_never_runs() {
    let clock = ManualClock::new(1000);
    let mut render_loop = quiet_loop(Box::new(FieldPlasma::rgb(2, 2)), clock, 60);
    let mut surface = RecordingSurface::default();

    render_loop.fail();
    assert_eq!(render_loop.step(&mut EventQueue::new(), &mut surface), LoopState::Terminated);
    assert_eq!(render_loop.finish(), ExitStatus::Failure);
    assert_eq!(surface.presented, 0);
}
