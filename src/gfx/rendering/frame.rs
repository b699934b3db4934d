//! # Frame Orchestration
//!
//! [`FrameRenderer`] owns the scene contents and issues one frame against any
//! [`GraphicsContext`]: camera and global uniforms, a clear, the lights, and
//! then the draws in a fixed order.
//!
//! ```text
//! projection -> view -> global rotation (+ its normal matrix) -> clear
//!   -> lights and camera position -> world -> figure -> loaded model
//! ```
//!
//! Depth testing handles occlusion, so the order is not back-to-front.

use cgmath::{Matrix4, Vector3};
use log::{debug, warn};

use crate::config::{LightConfig, ProjectionConfig, SceneConfig, SpotlightConfig};
use crate::error::RigError;
use crate::figure::{Figure, PoseParameters};
use crate::gfx::camera::{projection_matrix, FlyCamera};
use crate::gfx::context::{GraphicsContext, TextureImage, TextureUnit, Uniform, UniformValue};
use crate::gfx::scene::{LoadedModel, SharedMeshes, World};
use crate::gfx::transform::{normal_matrix, rotation, scale, translation};

/// Switches and sliders that change how a frame is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Degrees the whole scene is turned about the world y axis
    pub global_angle: f32,
    pub normal_view: bool,
    pub light: LightConfig,
    pub spotlight: SpotlightConfig,
}

impl RenderSettings {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            global_angle: 0.0,
            normal_view: false,
            light: config.light,
            spotlight: config.spotlight,
        }
    }
}

/// What one frame issued; wall-clock timing belongs to the caller, which
/// also owns submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub draw_calls: usize,
}

pub struct FrameRenderer {
    projection: ProjectionConfig,
    meshes: SharedMeshes,
    pub world: World,
    pub figure: Figure,
    pub model: LoadedModel,
    pub settings: RenderSettings,
}

impl FrameRenderer {
    /// Builds the scene and starts loading the configured model
    pub fn new<C: GraphicsContext + ?Sized>(ctx: &mut C, config: &SceneConfig) -> Result<Self, RigError> {
        Self::with_model(ctx, config, LoadedModel::load(config.model_path.clone()))
    }

    pub fn with_model<C: GraphicsContext + ?Sized>(
        ctx: &mut C,
        config: &SceneConfig,
        mut model: LoadedModel,
    ) -> Result<Self, RigError> {
        ctx.enable_depth_test();
        let meshes = SharedMeshes::new(ctx);
        bind_textures(ctx);

        model.set_transform(translation(config.model_offset) * scale([config.model_scale; 3]));

        Ok(Self {
            projection: config.projection,
            meshes,
            world: World::new(),
            figure: Figure::chihuahua(config.figure_origin)?,
            model,
            settings: RenderSettings::from_config(config),
        })
    }

    pub fn meshes(&self) -> &SharedMeshes {
        &self.meshes
    }

    /// Issues one complete frame
    pub fn render<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        camera: &FlyCamera,
        params: &PoseParameters,
        aspect: f32,
    ) -> FrameStats {
        self.model.poll();

        self.upload_camera(ctx, camera, aspect);
        ctx.clear();
        self.upload_lights(ctx, camera);

        let normal_view = self.settings.normal_view;
        let mut draw_calls = self.world.draw(ctx, &mut self.meshes, normal_view);
        draw_calls += self.figure.draw(ctx, &mut self.meshes, params, normal_view);
        if self.model.draw(ctx, normal_view) {
            draw_calls += 1;
        }

        debug!("frame: {} draws", draw_calls);
        FrameStats { draw_calls }
    }

    fn upload_camera<C: GraphicsContext + ?Sized>(&self, ctx: &mut C, camera: &FlyCamera, aspect: f32) {
        let projection = projection_matrix(&self.projection, aspect);
        ctx.set_uniform(Uniform::ProjectionMatrix, UniformValue::matrix(&projection));
        ctx.set_uniform(Uniform::ViewMatrix, UniformValue::matrix(&camera.view_matrix()));

        let global = global_rotation(self.settings.global_angle);
        ctx.set_uniform(Uniform::GlobalRotation, UniformValue::matrix(&global));
        ctx.set_uniform(
            Uniform::GlobalNormalMatrix,
            UniformValue::matrix(&normal_matrix(&global)),
        );
    }

    fn upload_lights<C: GraphicsContext + ?Sized>(&self, ctx: &mut C, camera: &FlyCamera) {
        let RenderSettings { light, spotlight, .. } = self.settings;
        ctx.set_uniform(Uniform::LightPosition, UniformValue::Vec3(light.position));
        ctx.set_uniform(Uniform::LightOn, UniformValue::flag(light.enabled));
        ctx.set_uniform(Uniform::SpotPosition, UniformValue::Vec3(spotlight.position));
        ctx.set_uniform(Uniform::SpotDirection, UniformValue::Vec3(spotlight.direction));
        ctx.set_uniform(
            Uniform::SpotCosineCutoff,
            UniformValue::Float(spotlight.cosine_cutoff()),
        );
        ctx.set_uniform(Uniform::SpotExponent, UniformValue::Float(spotlight.exponent));
        ctx.set_uniform(Uniform::SpotOn, UniformValue::flag(spotlight.enabled));
        ctx.set_uniform(Uniform::CameraPosition, UniformValue::Vec3(camera.eye.into()));
    }
}

pub fn global_rotation(degrees: f32) -> Matrix4<f32> {
    rotation(degrees, Vector3::unit_y())
}

/// Sky gradient in slot 0, UV grid checker in slot 1
fn bind_textures<C: GraphicsContext + ?Sized>(ctx: &mut C) {
    let images = [
        (TextureUnit::Slot0, TextureImage::gradient(256, [90, 140, 230], [235, 240, 255])),
        (TextureUnit::Slot1, TextureImage::checker(256, 8, [40, 40, 40], [220, 220, 220])),
    ];
    for (unit, image) in images {
        match ctx.create_texture(&image) {
            Some(texture) => ctx.bind_texture(unit, texture),
            None => warn!("texture for {:?} was not created", unit),
        }
    }
}
