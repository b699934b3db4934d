//! # Graphics Context
//!
//! The device interface every drawable talks to. It mirrors a small,
//! state-machine style GPU API: buffers are uploaded, attributes point at
//! buffers, uniforms are set by slot, and `draw_triangles` consumes whatever
//! is bound at that moment.
//!
//! Two implementations exist:
//!
//! - [`HeadlessContext`] keeps everything in memory and records each draw
//! - [`crate::gfx::rendering::WgpuContext`] replays the recorded draws on the GPU
//!
//! Components that bind private buffers must hand the previous attribute
//! bindings back untouched; [`ScopedAttributes`] does that on drop.

pub mod headless;
pub mod scoped;
pub mod state;

pub use headless::{DrawRecord, HeadlessContext};
pub use scoped::ScopedAttributes;
pub use state::BindingState;

use cgmath::Matrix4;

/// Handle to a vertex buffer owned by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub(crate) u32);

/// Handle to a 2D texture owned by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Vertex shader inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Uv,
    Normal,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Position, Attribute::Uv, Attribute::Normal];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Components per vertex the shader expects for this input
    pub fn components(self) -> u8 {
        match self {
            Attribute::Position | Attribute::Normal => 3,
            Attribute::Uv => 2,
        }
    }
}

/// An enabled attribute: read `components` floats per vertex from `buffer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    pub buffer: BufferId,
    pub components: u8,
}

impl AttributeBinding {
    pub fn new(buffer: BufferId, attribute: Attribute) -> Self {
        Self {
            buffer,
            components: attribute.components(),
        }
    }
}

/// Snapshot of every attribute slot; `None` means disabled
pub type AttributeSet = [Option<AttributeBinding>; 3];

/// Shader uniform slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    // Per draw
    ModelMatrix,
    NormalMatrix,
    FragColor,
    TextureMode,
    UseSpecular,
    // Per frame
    ProjectionMatrix,
    ViewMatrix,
    GlobalRotation,
    GlobalNormalMatrix,
    CameraPosition,
    LightPosition,
    LightOn,
    SpotPosition,
    SpotDirection,
    SpotCosineCutoff,
    SpotExponent,
    SpotOn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    pub fn matrix(matrix: &Matrix4<f32>) -> Self {
        UniformValue::Mat4((*matrix).into())
    }

    pub fn flag(enabled: bool) -> Self {
        UniformValue::Int(enabled as i32)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            UniformValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<[f32; 4]> {
        match self {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<[[f32; 4]; 4]> {
        match self {
            UniformValue::Mat4(v) => Some(*v),
            _ => None,
        }
    }
}

/// Texture units the shader samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureUnit {
    Slot0,
    Slot1,
}

impl TextureUnit {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Decoded RGBA8 pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.rgba.len() == (self.width * self.height * 4) as usize
    }

    /// Vertical gradient from `top` to `bottom`
    pub fn gradient(size: u32, top: [u8; 3], bottom: [u8; 3]) -> Self {
        let size = size.max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            let t = y as f32 / (size - 1).max(1) as f32;
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            let pixel = [mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255];
            for _ in 0..size {
                rgba.extend_from_slice(&pixel);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Checkerboard of `cells` x `cells` squares
    pub fn checker(size: u32, cells: u32, dark: [u8; 3], light: [u8; 3]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let c = if (x / cell + y / cell) % 2 == 0 { dark } else { light };
                rgba.extend_from_slice(&[c[0], c[1], c[2], 255]);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }
}

/// The capability set the scene needs from a GPU
pub trait GraphicsContext {
    fn create_buffer(&mut self) -> BufferId;

    /// Replaces the whole content of `buffer`
    fn upload_buffer(&mut self, buffer: BufferId, data: &[f32]);

    /// Points `attribute` at a buffer, or disables it with `None`
    fn set_attribute(&mut self, attribute: Attribute, binding: Option<AttributeBinding>);

    fn attribute(&self, attribute: Attribute) -> Option<AttributeBinding>;

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue);

    /// Returns `None` when the image cannot become a texture
    fn create_texture(&mut self, image: &TextureImage) -> Option<TextureId>;

    fn bind_texture(&mut self, unit: TextureUnit, texture: TextureId);

    fn enable_depth_test(&mut self);

    /// Clears color and depth
    fn clear(&mut self);

    /// Draws `count` vertices as a triangle list starting at `first`
    fn draw_triangles(&mut self, first: u32, count: u32);

    fn attributes(&self) -> AttributeSet {
        Attribute::ALL.map(|attribute| self.attribute(attribute))
    }

    fn restore_attributes(&mut self, saved: &AttributeSet) {
        for attribute in Attribute::ALL {
            self.set_attribute(attribute, saved[attribute.index()]);
        }
    }
}
