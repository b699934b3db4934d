//! # Shape Instances
//!
//! A [`Shape`] pairs one of the primitive meshes with a placement and an
//! appearance. Shapes are cheap values: the figure and the world build fresh
//! ones every frame, draw them and drop them.
//!
//! Primitive vertex data lives in [`SharedMeshes`], a single set of position,
//! UV and normal buffers the attribute slots stay pointed at. Drawing a shape
//! uploads its mesh into those buffers (skipped when that mesh is already
//! resident) and issues the draw; it never touches the attribute bindings.

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use crate::gfx::context::{
    Attribute, AttributeBinding, BufferId, GraphicsContext, Uniform, UniformValue,
};
use crate::gfx::geometry::{generate_cube, generate_sphere, MeshData};
use crate::gfx::transform::normal_matrix;

/// Color source selected in the fragment shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureMode {
    /// Surface normal mapped to RGB, a debug view
    NormalColor,
    /// Flat [`Appearance::color`]
    #[default]
    SolidColor,
    /// Texture coordinates mapped to RG
    UvColor,
    Texture0,
    Texture1,
}

impl TextureMode {
    /// Integer the shader switches on
    pub fn shader_value(self) -> i32 {
        match self {
            TextureMode::NormalColor => -3,
            TextureMode::SolidColor => -2,
            TextureMode::UvColor => -1,
            TextureMode::Texture0 => 0,
            TextureMode::Texture1 => 1,
        }
    }

    /// Applies the global normal-view toggle, which wins over any per-shape mode
    pub fn resolve(self, normal_view: bool) -> Self {
        if normal_view {
            TextureMode::NormalColor
        } else {
            self
        }
    }
}

/// Model matrix together with the normal matrix derived from it.
///
/// The matrix can only be replaced through [`ModelTransform::set`], so the
/// normal matrix is never stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    matrix: Matrix4<f32>,
    normal: Matrix4<f32>,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
            normal: Matrix4::identity(),
        }
    }
}

impl ModelTransform {
    pub fn new(matrix: Matrix4<f32>) -> Self {
        Self {
            matrix,
            normal: normal_matrix(&matrix),
        }
    }

    pub fn set(&mut self, matrix: Matrix4<f32>) {
        self.matrix = matrix;
        self.normal = normal_matrix(&matrix);
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    pub fn normal(&self) -> &Matrix4<f32> {
        &self.normal
    }
}

/// Surface parameters shared by every drawable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub color: [f32; 4],
    pub texture_mode: TextureMode,
    pub specular: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            texture_mode: TextureMode::SolidColor,
            specular: true,
        }
    }
}

impl Appearance {
    pub fn new(color: [f32; 4], texture_mode: TextureMode) -> Self {
        Self {
            color,
            texture_mode,
            ..Default::default()
        }
    }

    /// Uploads the per-draw uniforms for one draw call
    pub fn apply<C: GraphicsContext + ?Sized>(
        &self,
        ctx: &mut C,
        transform: &ModelTransform,
        normal_view: bool,
    ) {
        let mode = self.texture_mode.resolve(normal_view);
        ctx.set_uniform(Uniform::TextureMode, UniformValue::Int(mode.shader_value()));
        ctx.set_uniform(Uniform::UseSpecular, UniformValue::flag(self.specular));
        ctx.set_uniform(Uniform::NormalMatrix, UniformValue::matrix(transform.normal()));
        ctx.set_uniform(Uniform::FragColor, UniformValue::Vec4(self.color));
        ctx.set_uniform(Uniform::ModelMatrix, UniformValue::matrix(transform.matrix()));
    }
}

/// Primitive meshes drawn through the shared buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    Sphere,
}

/// The shared vertex buffers and the primitive mesh data uploaded into them
pub struct SharedMeshes {
    positions: BufferId,
    uvs: BufferId,
    normals: BufferId,
    cube: MeshData,
    sphere: MeshData,
    resident: Option<MeshKind>,
}

impl SharedMeshes {
    /// Creates the shared buffers and points every attribute slot at them
    pub fn new<C: GraphicsContext + ?Sized>(ctx: &mut C) -> Self {
        let meshes = Self {
            positions: ctx.create_buffer(),
            uvs: ctx.create_buffer(),
            normals: ctx.create_buffer(),
            cube: generate_cube(),
            sphere: generate_sphere(),
            resident: None,
        };
        meshes.bind(ctx);
        meshes
    }

    /// Points the attribute slots at the shared buffers
    pub fn bind<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) {
        ctx.set_attribute(
            Attribute::Position,
            Some(AttributeBinding::new(self.positions, Attribute::Position)),
        );
        ctx.set_attribute(
            Attribute::Uv,
            Some(AttributeBinding::new(self.uvs, Attribute::Uv)),
        );
        ctx.set_attribute(
            Attribute::Normal,
            Some(AttributeBinding::new(self.normals, Attribute::Normal)),
        );
    }

    pub fn mesh(&self, kind: MeshKind) -> &MeshData {
        match kind {
            MeshKind::Cube => &self.cube,
            MeshKind::Sphere => &self.sphere,
        }
    }

    pub fn resident(&self) -> Option<MeshKind> {
        self.resident
    }

    /// Makes `kind` the content of the shared buffers, returning its vertex count
    pub fn upload<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, kind: MeshKind) -> u32 {
        if self.resident != Some(kind) {
            debug!("uploading {:?} into shared buffers", kind);
            let mesh = match kind {
                MeshKind::Cube => &self.cube,
                MeshKind::Sphere => &self.sphere,
            };
            ctx.upload_buffer(self.positions, mesh.position_floats());
            ctx.upload_buffer(self.uvs, mesh.uv_floats().unwrap_or_default());
            ctx.upload_buffer(self.normals, mesh.normal_floats().unwrap_or_default());
            self.resident = Some(kind);
        }
        self.mesh(kind).vertex_count() as u32
    }
}

/// A primitive mesh with a placement and an appearance
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub mesh: MeshKind,
    pub appearance: Appearance,
    transform: ModelTransform,
}

impl Shape {
    pub fn new(mesh: MeshKind) -> Self {
        Self {
            mesh,
            appearance: Appearance::default(),
            transform: ModelTransform::default(),
        }
    }

    pub fn cube() -> Self {
        Self::new(MeshKind::Cube)
    }

    pub fn sphere() -> Self {
        Self::new(MeshKind::Sphere)
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.appearance.color = color;
        self
    }

    pub fn with_texture_mode(mut self, mode: TextureMode) -> Self {
        self.appearance.texture_mode = mode;
        self
    }

    pub fn with_specular(mut self, specular: bool) -> Self {
        self.appearance.specular = specular;
        self
    }

    pub fn with_transform(mut self, matrix: Matrix4<f32>) -> Self {
        self.transform.set(matrix);
        self
    }

    pub fn set_transform(&mut self, matrix: Matrix4<f32>) {
        self.transform.set(matrix);
    }

    pub fn transform(&self) -> &Matrix4<f32> {
        self.transform.matrix()
    }

    pub fn normal_matrix(&self) -> &Matrix4<f32> {
        self.transform.normal()
    }

    /// Uploads uniforms and mesh data, then draws the whole mesh
    pub fn draw<C: GraphicsContext + ?Sized>(
        &self,
        ctx: &mut C,
        meshes: &mut SharedMeshes,
        normal_view: bool,
    ) {
        self.appearance.apply(ctx, &self.transform, normal_view);
        let count = meshes.upload(ctx, self.mesh);
        ctx.draw_triangles(0, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::HeadlessContext;
    use crate::gfx::transform::tests::assert_matrix_eq;
    use crate::gfx::transform::{rotation, scale, translation};
    use cgmath::{Matrix, Vector3};

    #[test]
    fn test_texture_mode_values() {
        let values: Vec<i32> = [
            TextureMode::NormalColor,
            TextureMode::SolidColor,
            TextureMode::UvColor,
            TextureMode::Texture0,
            TextureMode::Texture1,
        ]
        .iter()
        .map(|m| m.shader_value())
        .collect();
        assert_eq!(values, vec![-3, -2, -1, 0, 1]);
    }

    #[test]
    fn test_normal_matrix_follows_transform_changes() {
        let mut shape = Shape::cube().with_transform(scale([2.0, 2.0, 2.0]));
        assert_matrix_eq(shape.normal_matrix(), &scale([0.5, 0.5, 0.5]), 1e-6);

        let model = translation([1.0, 2.0, 3.0]) * rotation(30.0, Vector3::unit_y()) * scale([1.0, 4.0, 1.0]);
        shape.set_transform(model);
        let expected = model.invert().unwrap().transpose();
        assert_matrix_eq(shape.normal_matrix(), &expected, 1e-5);
    }

    #[test]
    fn test_draw_uploads_uniforms_and_whole_mesh() {
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        let shape = Shape::sphere()
            .with_color([0.1, 0.2, 0.3, 1.0])
            .with_texture_mode(TextureMode::UvColor)
            .with_specular(false);
        shape.draw(&mut ctx, &mut meshes, false);

        let draw = &ctx.draws()[0];
        assert_eq!(draw.count, 2400);
        assert_eq!(draw.texture_mode(), Some(-1));
        assert_eq!(draw.color(), Some([0.1, 0.2, 0.3, 1.0]));
        assert_eq!(draw.uniform(Uniform::UseSpecular), Some(UniformValue::Int(0)));
    }

    #[test]
    fn test_normal_view_overrides_every_mode() {
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        for mode in [TextureMode::SolidColor, TextureMode::Texture1, TextureMode::UvColor] {
            Shape::cube()
                .with_texture_mode(mode)
                .draw(&mut ctx, &mut meshes, true);
        }
        assert!(ctx.draws().iter().all(|d| d.texture_mode() == Some(-3)));
    }

    #[test]
    fn test_switching_meshes_reuploads_shared_buffers() {
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        Shape::cube().draw(&mut ctx, &mut meshes, false);
        assert_eq!(meshes.resident(), Some(MeshKind::Cube));
        Shape::sphere().draw(&mut ctx, &mut meshes, false);
        Shape::cube().draw(&mut ctx, &mut meshes, false);

        let draws = ctx.draws();
        assert_eq!(draws.iter().map(|d| d.count).collect::<Vec<_>>(), vec![36, 2400, 36]);
        let cube = generate_cube();
        assert_eq!(draws[2].vertices[7].position, cube.positions[7]);
        assert_eq!(draws[2].vertices[7].normal, cube.normals.as_ref().unwrap()[7]);
    }
}
