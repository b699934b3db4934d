//! In-memory context that records every draw instead of rasterizing it.

use std::collections::HashMap;

use log::{trace, warn};

use super::{
    Attribute, AttributeBinding, AttributeSet, BindingState, BufferId, GraphicsContext,
    TextureId, TextureImage, TextureUnit, Uniform, UniformValue,
};
use crate::gfx::scene::vertex::Vertex3D;

/// One `draw_triangles` call and the state it saw
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub first: u32,
    pub count: u32,
    pub attributes: AttributeSet,
    pub uniforms: HashMap<Uniform, UniformValue>,
    pub vertices: Vec<Vertex3D>,
}

impl DrawRecord {
    pub fn uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.uniforms.get(&uniform).copied()
    }

    pub fn texture_mode(&self) -> Option<i32> {
        self.uniform(Uniform::TextureMode)?.as_int()
    }

    pub fn color(&self) -> Option<[f32; 4]> {
        self.uniform(Uniform::FragColor)?.as_vec4()
    }

    pub fn model_matrix(&self) -> Option<[[f32; 4]; 4]> {
        self.uniform(Uniform::ModelMatrix)?.as_mat4()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessContext {
    state: BindingState,
    textures: Vec<TextureImage>,
    draws: Vec<DrawRecord>,
    clears: usize,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.state.depth_test()
    }

    pub fn uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.state.uniform(uniform)
    }

    pub fn buffer(&self, buffer: BufferId) -> Option<&[f32]> {
        self.state.buffer(buffer)
    }

    pub fn bound_texture(&self, unit: TextureUnit) -> Option<TextureId> {
        self.state.bound_texture(unit)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl GraphicsContext for HeadlessContext {
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
            warn!("rejecting {}x{} texture image", image.width, image.height);
            return None;
        }
        self.textures.push(image.clone());
        Some(TextureId(self.textures.len() as u32 - 1))
    }

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureId) {
        self.state.bind_texture(unit, texture);
    }

    fn enable_depth_test(&mut self) {
        self.state.enable_depth_test();
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_triangles(&mut self, first: u32, count: u32) {
        let Some(vertices) = self.state.gather_vertices(first, count) else {
            warn!("draw of {} vertices skipped: incomplete bindings", count);
            return;
        };
        trace!("recorded draw of {} vertices", count);

        let uniforms = [
            Uniform::ModelMatrix,
            Uniform::NormalMatrix,
            Uniform::FragColor,
            Uniform::TextureMode,
            Uniform::UseSpecular,
        ]
        .into_iter()
        .filter_map(|u| self.state.uniform(u).map(|v| (u, v)))
        .collect();

        self.draws.push(DrawRecord {
            first,
            count,
            attributes: self.state.attributes(),
            uniforms,
            vertices,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind_triangle(ctx: &mut HeadlessContext) -> BufferId {
        let buffer = ctx.create_buffer();
        ctx.upload_buffer(buffer, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        ctx.set_attribute(
            Attribute::Position,
            Some(AttributeBinding::new(buffer, Attribute::Position)),
        );
        buffer
    }

    #[test]
    fn test_draw_captures_per_draw_uniforms() {
        let mut ctx = HeadlessContext::new();
        bind_triangle(&mut ctx);
        ctx.set_uniform(Uniform::TextureMode, UniformValue::Int(-2));
        ctx.set_uniform(Uniform::FragColor, UniformValue::Vec4([1.0, 0.0, 0.0, 1.0]));
        ctx.draw_triangles(0, 3);
        ctx.set_uniform(Uniform::TextureMode, UniformValue::Int(-1));
        ctx.draw_triangles(0, 3);

        let draws = ctx.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].texture_mode(), Some(-2));
        assert_eq!(draws[1].texture_mode(), Some(-1));
        assert_eq!(draws[1].color(), Some([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_incomplete_draw_is_not_recorded() {
        let mut ctx = HeadlessContext::new();
        ctx.draw_triangles(0, 3);
        bind_triangle(&mut ctx);
        ctx.draw_triangles(0, 6);
        assert!(ctx.draws().is_empty());
    }

    #[test]
    fn test_invalid_texture_is_rejected() {
        let mut ctx = HeadlessContext::new();
        let bad = TextureImage {
            width: 0,
            height: 4,
            rgba: Vec::new(),
        };
        assert!(ctx.create_texture(&bad).is_none());
        let good = TextureImage::gradient(4, [0, 0, 0], [255, 255, 255]);
        let id = ctx.create_texture(&good).unwrap();
        ctx.bind_texture(TextureUnit::Slot1, id);
        assert_eq!(ctx.bound_texture(TextureUnit::Slot1), Some(id));
        assert_eq!(ctx.texture_count(), 1);
    }
}
