// src/ui/manager.rs
//! ImGui integration with wgpu and winit: frame timing, input capture and
//! the overlay render pass.

use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use wgpu::{CommandEncoder, Device, Queue, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::gfx::rendering::WgpuContext;

const FONT_SIZE: f32 = 18.0;

/// Owns the ImGui context and its winit/wgpu backends
pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Builds the overlay for `window`, rendering into the context's surface
    /// format.
    ///
    /// DPI is locked to 1.0 so panel sizes are in physical pixels.
    pub fn new(gpu: &WgpuContext, window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: gpu.surface_format(),
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, gpu.device(), gpu.queue(), renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// True while the cursor or keyboard focus belongs to a panel
    pub fn wants_input(&self) -> bool {
        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Feeds input events to ImGui; returns true if the UI captured it
    pub fn handle_window_event(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        if !matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::Focused(_)
        ) {
            return false;
        }

        let event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform.handle_event(self.context.io_mut(), window, &event);
        self.wants_input()
    }

    /// Starts an ImGui frame and runs `run_ui` to build it
    pub fn build_frame<F>(&mut self, window: &Window, run_ui: F)
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("imgui frame preparation failed: {}", err);
        }

        let ui = self.context.frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
    }

    /// Draws the frame built by [`UiManager::build_frame`] over the scene
    pub fn render(&mut self, device: &Device, queue: &Queue, encoder: &mut CommandEncoder, target: &TextureView) {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("UI Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self.renderer.render(draw_data, queue, device, &mut render_pass) {
            warn!("imgui overlay was not rendered: {}", err);
        }
    }
}
