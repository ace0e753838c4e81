//! winit driver.
//!
//! Acquires the window and GPU state on `resumed`, queues translated window
//! events, and runs one render loop step per redraw. Resources are released
//! in reverse order: GPU state first, then the window.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::config::PlasmaConfig;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::input::{EventQueue, Input};
use crate::render_loop::{ExitStatus, LoopState, RenderLoop};
use crate::time::SystemClock;

pub struct App {
    config: PlasmaConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    render_loop: Option<RenderLoop<SystemClock>>,
    events: EventQueue,
    input: Input,
    error: Option<RunError>,
    status: ExitStatus,
}

impl App {
    pub fn new(config: PlasmaConfig) -> Self {
        let (width, height) = config.window_size();
        Self {
            config,
            window: None,
            gpu_state: None,
            render_loop: None,
            events: EventQueue::new(),
            input: Input::new(width, height),
            error: None,
            status: ExitStatus::Success,
        }
    }

    /// Window, render loop, then GPU state. The loop starts running once
    /// everything is acquired.
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let (width, height) = self.config.window_size();

        let mut window_attrs = Window::default_attributes()
            .with_title(self.config.variant.title())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(self.config.variant.is_shader());
        if self.config.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        window.set_cursor_visible(self.config.is_interactive());

        // fullscreen and window managers may not honour the requested size
        let size = window.inner_size();
        let surface_size = (size.width.max(1), size.height.max(1));
        log::info!("window created with size {}x{}", surface_size.0, surface_size.1);
        self.input = Input::new(size.width, size.height);

        let refresh_hz = window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz())
            .map(|mhz| mhz / 1000)
            .unwrap_or(0);
        if refresh_hz == 0 {
            log::warn!("display refresh rate unknown, assuming 60 Hz");
        }

        self.window = Some(window.clone());

        let scene = self.config.build_scene(surface_size);
        let render_loop = self
            .render_loop
            .insert(RenderLoop::new(scene, SystemClock::new(), refresh_hz));

        let pass = self.config.pass_config()?;
        let gpu_state = pollster::block_on(GpuState::new(window, pass))?;
        self.gpu_state = Some(gpu_state);

        render_loop.begin();
        Ok(())
    }

    /// Release GPU state, then the window, and stop the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.gpu_state = None;
        self.window = None;
        if let Some(render_loop) = &mut self.render_loop {
            self.status = render_loop.finish();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            self.gpu_state = None;
            self.window = None;
            self.status = match &mut self.render_loop {
                Some(render_loop) => {
                    render_loop.fail();
                    render_loop.finish()
                }
                None => ExitStatus::Failure,
            };
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::RedrawRequested => {
                let state = match (&mut self.render_loop, &mut self.gpu_state) {
                    (Some(render_loop), Some(gpu_state)) => render_loop.step(&mut self.events, gpu_state),
                    _ => return,
                };
                if state == LoopState::Draining {
                    self.shutdown(event_loop);
                }
            }
            other => {
                if let Some(event) = self.input.translate(&other) {
                    self.events.push(event);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open a window and run the configured variant until it quits.
pub fn run(config: PlasmaConfig) -> Result<ExitStatus, RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(app.status),
    }
}
