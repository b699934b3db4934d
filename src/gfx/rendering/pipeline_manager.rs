//! Render pipeline management for wgpu
//!
//! Shaders and pipeline configurations are registered by name, then created
//! together inside a validation error scope so a bad shader surfaces as an
//! [`InitError::Pipeline`] at startup instead of a panic mid-frame.

use std::{collections::HashMap, sync::Arc};

use log::{debug, error};
use wgpu::*;

use crate::error::InitError;
use crate::gfx::scene::vertex::Vertex3D;

/// Everything needed to build one render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    /// `None` builds a pipeline without a depth attachment
    pub depth_format: Option<TextureFormat>,
    pub depth_write: bool,
    pub depth_compare: CompareFunction,
    pub color_format: TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "shader.wgsl".to_string(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_write: true,
            depth_compare: CompareFunction::Less,
            color_format: TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Depth tested against `format`
    pub fn with_depth(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self.depth_write = true;
        self.depth_compare = CompareFunction::Less;
        self
    }

    /// Keeps a depth attachment of `format` but neither tests nor writes it
    pub fn with_depth_ignored(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self.depth_write = false;
        self.depth_compare = CompareFunction::Always;
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }
}

pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration; it is built by
    /// [`PipelineManager::create_all_pipelines`]
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL module, reporting validation errors
    pub async fn load_shader(&mut self, name: &str, source: &str) -> Result<(), InitError> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(err) = self.device.pop_error_scope().await {
            error!("shader `{}` failed to compile: {}", name, err);
            return Err(InitError::Pipeline(format!("shader `{}`: {}", name, err)));
        }

        debug!("compiled shader `{}`", name);
        self.shader_modules.insert(name.to_string(), shader_module);
        Ok(())
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates every pending pipeline, stopping at the first failure
    pub async fn create_all_pipelines(&mut self) -> Result<(), InitError> {
        for name in std::mem::take(&mut self.pending_pipelines) {
            let Some(config) = self.pipeline_configs.get(&name) else {
                continue;
            };

            self.device.push_error_scope(ErrorFilter::Validation);
            let pipeline = self.create_pipeline_from_config(&name, config);
            let validation = self.device.pop_error_scope().await;

            let pipeline = match (pipeline, validation) {
                (Ok(pipeline), None) => pipeline,
                (Err(message), _) => return Err(InitError::Pipeline(message)),
                (Ok(_), Some(err)) => {
                    error!("pipeline `{}` rejected: {}", name, err);
                    return Err(InitError::Pipeline(format!("pipeline `{}`: {}", name, err)));
                }
            };
            debug!("created pipeline `{}`", name);
            self.pipelines.insert(name, pipeline);
        }
        Ok(())
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("shader `{}` was never loaded", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", name)),
            bind_group_layouts: &bind_group_layout_refs,
            push_constant_ranges: &[],
        });

        let color_targets = [Some(ColorTargetState {
            format: config.color_format,
            blend: Some(BlendState::ALPHA_BLENDING),
            write_mask: ColorWrites::ALL,
        })];

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write,
            depth_compare: config.depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        Ok(self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        }))
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }
}
