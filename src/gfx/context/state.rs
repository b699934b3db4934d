//! CPU-side mirror of the bindable state shared by every context
//! implementation.

use std::collections::HashMap;

use log::warn;

use super::{
    Attribute, AttributeBinding, AttributeSet, BufferId, TextureId, TextureUnit, Uniform,
    UniformValue,
};
use crate::gfx::scene::vertex::Vertex3D;

#[derive(Debug, Default)]
pub struct BindingState {
    buffers: HashMap<BufferId, Vec<f32>>,
    next_buffer: u32,
    attributes: AttributeSet,
    uniforms: HashMap<Uniform, UniformValue>,
    textures: [Option<TextureId>; 2],
    depth_test: bool,
}

impl BindingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        self.buffers.insert(id, Vec::new());
        id
    }

    pub fn upload_buffer(&mut self, buffer: BufferId, data: &[f32]) {
        match self.buffers.get_mut(&buffer) {
            Some(contents) => {
                contents.clear();
                contents.extend_from_slice(data);
            }
            None => warn!("upload to unknown buffer {:?} ignored", buffer),
        }
    }

    pub fn buffer(&self, buffer: BufferId) -> Option<&[f32]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    pub fn set_attribute(&mut self, attribute: Attribute, binding: Option<AttributeBinding>) {
        self.attributes[attribute.index()] = binding;
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<AttributeBinding> {
        self.attributes[attribute.index()]
    }

    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    pub fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.uniforms.insert(uniform, value);
    }

    pub fn uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.uniforms.get(&uniform).copied()
    }

    pub fn bind_texture(&mut self, unit: TextureUnit, texture: TextureId) {
        self.textures[unit.index()] = Some(texture);
    }

    pub fn bound_texture(&self, unit: TextureUnit) -> Option<TextureId> {
        self.textures[unit.index()]
    }

    pub fn enable_depth_test(&mut self) {
        self.depth_test = true;
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Interleaves the bound attribute arrays for vertices
    /// `first..first + count`.
    ///
    /// Disabled UV or normal attributes read as zero. Returns `None` when
    /// positions are not bound or a bound buffer is too short, matching a
    /// GPU rejecting the draw.
    pub fn gather_vertices(&self, first: u32, count: u32) -> Option<Vec<Vertex3D>> {
        let range = first as usize..(first as usize + count as usize);
        let positions = self.attribute_slice(Attribute::Position, &range)?;
        let uvs = self.optional_slice(Attribute::Uv, &range)?;
        let normals = self.optional_slice(Attribute::Normal, &range)?;

        let vertices = (0..range.len())
            .map(|i| Vertex3D {
                position: [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]],
                uv: uvs.map_or([0.0; 2], |uv| [uv[i * 2], uv[i * 2 + 1]]),
                normal: normals.map_or([0.0; 3], |n| [n[i * 3], n[i * 3 + 1], n[i * 3 + 2]]),
            })
            .collect();
        Some(vertices)
    }

    fn attribute_slice(
        &self,
        attribute: Attribute,
        range: &std::ops::Range<usize>,
    ) -> Option<&[f32]> {
        let binding = self.attribute(attribute)?;
        let components = binding.components as usize;
        if components != attribute.components() as usize {
            warn!("{:?} bound with {} components", attribute, components);
            return None;
        }
        let data = self.buffer(binding.buffer)?;
        let slice = data.get(range.start * components..range.end * components);
        if slice.is_none() {
            warn!(
                "{:?} buffer holds {} vertices, draw needs {}",
                attribute,
                data.len() / components,
                range.end
            );
        }
        slice
    }

    /// `Some(None)` for a disabled attribute, `None` for a broken binding
    fn optional_slice(
        &self,
        attribute: Attribute,
        range: &std::ops::Range<usize>,
    ) -> Option<Option<&[f32]>> {
        match self.attribute(attribute) {
            None => Some(None),
            Some(_) => self.attribute_slice(attribute, range).map(Some),
        }
    }
}
