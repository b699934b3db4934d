//! WGPU-backed [`GraphicsContext`]
//!
//! Drawables talk to the context as if it were an immediate-mode device.
//! Behind that, [`WgpuContext`] keeps the bindable state on the CPU and
//! records each `draw_triangles` call: the bound attribute arrays are
//! interleaved into a per-frame vertex arena and the per-draw uniforms are
//! packed into one slot of a dynamic uniform buffer. [`WgpuContext::end_frame`]
//! uploads both and replays the draws in a single render pass, followed by the
//! UI overlay.

use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use crate::error::InitError;
use crate::gfx::context::{
    Attribute, AttributeBinding, BindingState, BufferId, GraphicsContext, TextureId, TextureImage,
    TextureUnit, Uniform, UniformValue,
};
use crate::gfx::resources::{
    DrawUBO, DrawUniforms, GlobalBindings, GlobalUBO, SceneGlobals, TextureResource,
};
use crate::gfx::scene::vertex::Vertex3D;
use crate::wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADER: &str = include_str!("shader.wgsl");
const DEPTH_PIPELINE: &str = "scene";
const NO_DEPTH_PIPELINE: &str = "scene_no_depth";


/// One recorded draw: a range of the vertex arena, its uniform slot and the
/// depth mode that was current when it was issued
#[derive(Debug, Clone, Copy)]
struct PendingDraw {
    first_vertex: u32,
    count: u32,
    slot: usize,
    depth_test: bool,
}

impl PendingDraw {
    fn pipeline_name(&self) -> &'static str {
        if self.depth_test {
            DEPTH_PIPELINE
        } else {
            NO_DEPTH_PIPELINE
        }
    }
}

/// Indices where the replay has to switch pipelines, with the pipeline to set
fn pipeline_switches(draws: &[PendingDraw]) -> Vec<(usize, &'static str)> {
    let mut switches: Vec<(usize, &'static str)> = Vec::new();
    for (index, draw) in draws.iter().enumerate() {
        let name = draw.pipeline_name();
        if switches.last().map_or(true, |&(_, current)| current != name) {
            switches.push((index, name));
        }
    }
    switches
}

#[derive(Default)]
struct FrameRecording {
    vertices: Vec<Vertex3D>,
    draws: Vec<PendingDraw>,
    uniforms: Vec<DrawUniforms>,
}

impl FrameRecording {
    fn reset(&mut self) {
        self.vertices.clear();
        self.draws.clear();
        self.uniforms.clear();
    }
}

pub struct WgpuContext {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,

    global_ubo: GlobalUBO,
    draw_ubo: DrawUBO,
    global_bindings: GlobalBindings,

    texture_layout: BindGroupLayoutWithDesc,
    fallback_texture: TextureResource,
    textures: Vec<TextureResource>,
    texture_group: Option<wgpu::BindGroup>,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    clear_color: wgpu::Color,
    state: BindingState,
    frame: FrameRecording,
}

impl WgpuContext {
    /// Opens the device for `window` and builds the scene pipelines.
    ///
    /// Every failure here is fatal; there is no partial-rendering fallback.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Kennel Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(InitError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let draw_ubo = DrawUBO::new(&device, 256);
        let global_bindings = GlobalBindings::new(&device, &global_ubo, &draw_ubo);

        let texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Scene Textures Layout");
        let fallback_texture = TextureResource::white(&device, &queue);

        let [globals_layout, draw_layout] = global_bindings.layouts();
        let layouts = vec![
            globals_layout.clone(),
            draw_layout.clone(),
            texture_layout.layout.clone(),
        ];

        // The sky cube is drawn with a negative scale, which flips its winding
        let base = PipelineConfig::default_with_shader("shader.wgsl")
            .with_cull_mode(None)
            .with_color_format(format)
            .with_bind_group_layouts(layouts);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("shader.wgsl", SHADER).await?;
        pipeline_manager.register_pipeline(
            DEPTH_PIPELINE,
            base.clone()
                .with_label("Scene Pipeline")
                .with_depth(TextureResource::DEPTH_FORMAT),
        );
        pipeline_manager.register_pipeline(
            NO_DEPTH_PIPELINE,
            base.with_label("Scene Pipeline (no depth)")
                .with_depth_ignored(TextureResource::DEPTH_FORMAT),
        );
        pipeline_manager.create_all_pipelines().await?;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_ubo,
            draw_ubo,
            global_bindings,
            texture_layout,
            fallback_texture,
            textures: Vec::new(),
            texture_group: None,
            vertex_buffer: None,
            vertex_capacity: 0,
            clear_color: wgpu::Color::BLACK,
            state: BindingState::new(),
            frame: FrameRecording::default(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    /// Background behind everything the sky cube does not cover
    pub fn set_clear_color(&mut self, [r, g, b, a]: [f64; 4]) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Ignores zero sizes, which winit reports while minimized
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        debug!("surface resized to {}x{}", width, height);
    }

    /// Number of draws recorded since the last clear
    pub fn recorded_draws(&self) -> usize {
        self.frame.draws.len()
    }

    /// Submits everything recorded this frame, then lets `ui_callback` draw
    /// on top of it.
    ///
    /// A lost or outdated surface is reconfigured and the frame dropped.
    pub fn end_frame<F>(&mut self, ui_callback: F) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.frame.reset();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out waiting for the next surface texture");
                self.frame.reset();
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_frame();
        let texture_group = self.texture_group();

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(vertex_buffer), false) = (&self.vertex_buffer, self.frame.draws.is_empty()) {
                render_pass.set_bind_group(0, self.global_bindings.globals_group(), &[]);
                render_pass.set_bind_group(2, &texture_group, &[]);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));

                let mut switches = pipeline_switches(&self.frame.draws).into_iter().peekable();
                let mut pipeline_ready = false;
                for (index, draw) in self.frame.draws.iter().enumerate() {
                    if let Some((_, name)) = switches.next_if(|&(at, _)| at == index) {
                        match self.pipeline_manager.get_pipeline(name) {
                            Some(pipeline) => {
                                render_pass.set_pipeline(pipeline);
                                pipeline_ready = true;
                            }
                            None => {
                                warn!("pipeline `{}` is missing, skipping its draws", name);
                                pipeline_ready = false;
                            }
                        }
                    }
                    if !pipeline_ready {
                        continue;
                    }
                    render_pass.set_bind_group(
                        1,
                        self.global_bindings.draw_group(),
                        &[self.draw_ubo.offset(draw.slot)],
                    );
                    render_pass.draw(draw.first_vertex..draw.first_vertex + draw.count, 0..1);
                }
            }
        }

        ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        self.texture_group = Some(texture_group);
        self.frame.reset();
        Ok(())
    }

    fn upload_frame(&mut self) {
        self.global_ubo
            .update_content(&self.queue, SceneGlobals::from_state(&self.state));

        if self.draw_ubo.write(&self.device, &self.queue, &self.frame.uniforms) {
            debug!("draw uniform buffer grew to {} slots", self.frame.uniforms.len());
            self.global_bindings.rebind_draws(&self.device, &self.draw_ubo);
        }

        let vertices = &self.frame.vertices;
        if vertices.is_empty() {
            return;
        }
        match &self.vertex_buffer {
            Some(buffer) if vertices.len() <= self.vertex_capacity => {
                self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
            }
            _ => {
                self.vertex_capacity = vertices.len().next_power_of_two();
                let mut contents = bytemuck::cast_slice(vertices).to_vec();
                contents.resize(self.vertex_capacity * std::mem::size_of::<Vertex3D>(), 0);
                self.vertex_buffer = Some(self.device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Frame Vertex Arena"),
                        contents: &contents,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    },
                ));
            }
        }
    }

    /// Reuses last frame's group while texture bindings are unchanged
    fn texture_group(&mut self) -> wgpu::BindGroup {
        if let Some(group) = self.texture_group.take() {
            return group;
        }
        let slot0 = self.bound_resource(TextureUnit::Slot0);
        let slot1 = self.bound_resource(TextureUnit::Slot1);
        BindGroupBuilder::new(&self.texture_layout)
            .texture(&slot0.view)
            .sampler(&slot0.sampler)
            .texture(&slot1.view)
            .sampler(&slot1.sampler)
            .create(&self.device, "Scene Textures")
    }

    fn bound_resource(&self, unit: TextureUnit) -> &TextureResource {
        self.state
            .bound_texture(unit)
            .and_then(|id| self.textures.get(id.0 as usize))
            .unwrap_or(&self.fallback_texture)
    }
}

impl GraphicsContext for WgpuContext {
    fn create_buffer(&mut self) -> BufferId {
        self.state.create_buffer()
    }

    fn upload_buffer(&mut self, buffer: BufferId, data: &[f32]) {
        self.state.upload_buffer(buffer, data);
    }

    fn set_attribute(&mut self, attribute: Attribute, binding: Option<AttributeBinding>) {
        self.state.set_attribute(attribute, binding);
    }

    fn attribute(&self, attribute: Attribute) -> Option<AttributeBinding> {
        self.state.attribute(attribute)
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.state.set_uniform(uniform, value);
    }

    fn create_texture(&mut self, image: &TextureImage) -> Option<TextureId> {
        if !image.is_valid() {
            warn!("rejecting {}x{} texture with {} bytes", image.width, image.height, image.rgba.len());
            return None;
        }
        let id = TextureId(self.textures.len() as u32);
        let label = format!("Scene Texture {}", id.0);
        self.textures
            .push(TextureResource::from_image(&self.device, &self.queue, image, &label));
        Some(id)
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureId) {
        if self.state.bound_texture(unit) != Some(texture) {
            self.texture_group = None;
        }
        self.state.bind_texture(unit, texture);
    }

    fn enable_depth_test(&mut self) {
        self.state.enable_depth_test();
    }

    fn clear(&mut self) {
        self.frame.reset();
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        if count == 0 {
            return;
        }
        let Some(vertices) = self.state.gather_vertices(first, count) else {
            warn!("dropping draw of {} vertices from {}: attributes not drawable", count, first);
            return;
        };
        self.frame.draws.push(PendingDraw {
            first_vertex: self.frame.vertices.len() as u32,
            count,
            slot: self.frame.uniforms.len(),
            depth_test: self.state.depth_test(),
        });
        self.frame.vertices.extend(vertices);
        self.frame.uniforms.push(DrawUniforms::from_state(&self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(slot: usize, depth_test: bool) -> PendingDraw {
        PendingDraw {
            first_vertex: slot as u32 * 36,
            count: 36,
            slot,
            depth_test,
        }
    }

    #[test]
    fn test_depth_mode_is_kept_per_draw() {
        assert_eq!(draw(0, true).pipeline_name(), DEPTH_PIPELINE);
        assert_eq!(draw(0, false).pipeline_name(), NO_DEPTH_PIPELINE);
    }

    #[test]
    fn test_pipeline_switches_only_when_depth_mode_changes() {
        let draws = [draw(0, false), draw(1, false), draw(2, true), draw(3, true), draw(4, false)];
        assert_eq!(
            pipeline_switches(&draws),
            vec![(0, NO_DEPTH_PIPELINE), (2, DEPTH_PIPELINE), (4, NO_DEPTH_PIPELINE)]
        );
        assert!(pipeline_switches(&[]).is_empty());
    }
}
