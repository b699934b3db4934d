//! Window, event loop and per-frame orchestration
//!
//! [`KennelApp`] owns the winit event loop. The GPU context, the scene and
//! the UI are created on the first `resumed` call; any failure there is
//! logged, stops the loop and is returned from [`KennelApp::run`].

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context as _};
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::SceneConfig;
use crate::error::InitError;
use crate::figure::AnimationDriver;
use crate::gfx::camera::CameraManager;
use crate::gfx::rendering::{FrameRenderer, WgpuContext};
use crate::performance::FrameMonitor;
use crate::ui::{control_panel, ControlState, UiManager};

pub struct KennelApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

/// Everything that only exists once a window is open
struct Gpu {
    window: Arc<Window>,
    context: WgpuContext,
    renderer: FrameRenderer,
    ui_manager: UiManager,
    controls: ControlState,
}

struct AppState {
    config: SceneConfig,
    gpu: Option<Gpu>,
    camera_manager: CameraManager,
    driver: AnimationDriver,
    monitor: FrameMonitor,
    started: Instant,
    failure: Option<anyhow::Error>,
}

impl KennelApp {
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create the event loop")?;
        let camera_manager = CameraManager::from_config(&config.camera);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                gpu: None,
                camera_manager,
                driver: AnimationDriver::new(),
                monitor: FrameMonitor::new(),
                started: Instant::now(),
                failure: None,
            },
        })
    }

    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Gpu> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("Kennel")
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .map_err(InitError::from)?;
        let window = Arc::new(window);

        let (width, height) = window.inner_size().into();
        let mut context = pollster::block_on(WgpuContext::new(window.clone(), width, height))?;
        context.set_clear_color(self.config.clear_color);

        let renderer = FrameRenderer::new(&mut context, &self.config)?;
        info!("loading model from {}", renderer.model.path().display());

        let ui_manager = UiManager::new(&context, &window);
        let controls = ControlState::capture(&self.driver, &renderer);

        Ok(Gpu {
            window,
            context,
            renderer,
            ui_manager,
            controls,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) -> bool {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return false;
        }
        self.camera_manager.process_keyboard_event(event)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let seconds = self.started.elapsed().as_secs_f64();
        gpu.controls.apply(&mut self.driver, &mut gpu.renderer, seconds);
        let params = *self.driver.update(seconds);

        // One sample spans scene recording, GPU submission and present
        self.monitor.begin_frame();
        let aspect = gpu.context.aspect_ratio();
        let stats = gpu
            .renderer
            .render(&mut gpu.context, &self.camera_manager.camera, &params, aspect);
        self.monitor.set_draw_calls(stats.draw_calls as u32);

        let Gpu {
            window,
            context,
            ui_manager,
            controls,
            ..
        } = gpu;
        let window: &Window = window;
        let monitor = &self.monitor;
        let result = context.end_frame(|device, queue, encoder, view| {
            ui_manager.build_frame(window, |ui| {
                control_panel(ui, controls, monitor);
            });
            ui_manager.render(device, queue, encoder, view);
        });
        self.monitor.end_frame();
        debug!("{}", self.monitor.diagnostics_text());

        if let Err(err) = result {
            self.fail(event_loop, anyhow!(err).context("surface can no longer be presented"));
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => self.fail(event_loop, err.context("initialization failed")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if gpu.ui_manager.handle_window_event(&gpu.window, window_id, &event) {
            gpu.window.request_redraw();
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if self.handle_key(event_loop, &event) {
                    if let Some(gpu) = self.gpu.as_ref() {
                        gpu.window.request_redraw();
                    }
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                gpu.context.resize(width, height);
                gpu.ui_manager.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };

        // Camera drags must not fire while the cursor is over the panel
        if gpu.ui_manager.wants_input() {
            return;
        }

        if self.camera_manager.process_event(&event) {
            gpu.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.request_redraw();
        }
    }
}
