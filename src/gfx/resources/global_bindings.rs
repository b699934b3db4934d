//! Uniform blocks shared with `shader.wgsl`
//!
//! The context keeps uniforms as loose slots in a [`BindingState`]. Right
//! before the GPU sees them they are packed into two blocks: [`SceneGlobals`]
//! once per frame and [`DrawUniforms`] once per draw. Both MUST match the
//! WGSL structs of the same names field for field.

use cgmath::Matrix4;

use crate::{
    gfx::camera::OPENGL_TO_WGPU_MATRIX,
    gfx::context::{BindingState, Uniform, UniformValue},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::{DynamicUniformBuffer, UniformBuffer},
    },
};

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Texture mode used when a draw never set one; renders the solid color
const DEFAULT_TEXTURE_MODE: i32 = -2;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneGlobals {
    /// Already converted to wgpu clip space
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub global_rotation: [[f32; 4]; 4],
    pub global_normal: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    pub spot_position: [f32; 4],
    pub spot_direction: [f32; 4],
    pub light_on: i32,
    pub spot_on: i32,
    pub spot_cosine_cutoff: f32,
    pub spot_exponent: f32,
}
// 4 * 64 + 4 * 16 + 16 = 336 bytes

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub texture_mode: i32,
    pub use_specular: i32,
    pub _padding: [i32; 2],
}
// 2 * 64 + 16 + 16 = 160 bytes

fn mat4(state: &BindingState, uniform: Uniform) -> [[f32; 4]; 4] {
    state
        .uniform(uniform)
        .and_then(|v| v.as_mat4())
        .unwrap_or(IDENTITY)
}

fn point(state: &BindingState, uniform: Uniform) -> [f32; 4] {
    match state.uniform(uniform) {
        Some(UniformValue::Vec3([x, y, z])) => [x, y, z, 1.0],
        Some(UniformValue::Vec4(v)) => v,
        _ => [0.0, 0.0, 0.0, 1.0],
    }
}

fn int(state: &BindingState, uniform: Uniform, fallback: i32) -> i32 {
    state
        .uniform(uniform)
        .and_then(|v| v.as_int())
        .unwrap_or(fallback)
}

fn float(state: &BindingState, uniform: Uniform, fallback: f32) -> f32 {
    state
        .uniform(uniform)
        .and_then(|v| v.as_float())
        .unwrap_or(fallback)
}

impl SceneGlobals {
    /// Packs the per-frame slots; unset matrices read as identity
    pub fn from_state(state: &BindingState) -> Self {
        let projection = OPENGL_TO_WGPU_MATRIX * Matrix4::from(mat4(state, Uniform::ProjectionMatrix));
        let mut spot_direction = point(state, Uniform::SpotDirection);
        spot_direction[3] = 0.0;

        Self {
            projection: projection.into(),
            view: mat4(state, Uniform::ViewMatrix),
            global_rotation: mat4(state, Uniform::GlobalRotation),
            global_normal: mat4(state, Uniform::GlobalNormalMatrix),
            camera_position: point(state, Uniform::CameraPosition),
            light_position: point(state, Uniform::LightPosition),
            spot_position: point(state, Uniform::SpotPosition),
            spot_direction,
            light_on: int(state, Uniform::LightOn, 0),
            spot_on: int(state, Uniform::SpotOn, 0),
            spot_cosine_cutoff: float(state, Uniform::SpotCosineCutoff, 1.0),
            spot_exponent: float(state, Uniform::SpotExponent, 1.0),
        }
    }
}

impl DrawUniforms {
    /// Snapshot of the per-draw slots as they stand at draw time
    pub fn from_state(state: &BindingState) -> Self {
        let color = match state.uniform(Uniform::FragColor) {
            Some(UniformValue::Vec4(c)) => c,
            Some(UniformValue::Vec3([r, g, b])) => [r, g, b, 1.0],
            _ => [1.0; 4],
        };
        Self {
            model: mat4(state, Uniform::ModelMatrix),
            normal_matrix: mat4(state, Uniform::NormalMatrix),
            color,
            texture_mode: int(state, Uniform::TextureMode, DEFAULT_TEXTURE_MODE),
            use_specular: int(state, Uniform::UseSpecular, 0),
            _padding: [0; 2],
        }
    }
}

impl Default for SceneGlobals {
    fn default() -> Self {
        Self::from_state(&BindingState::new())
    }
}

pub type GlobalUBO = UniformBuffer<SceneGlobals>;
pub type DrawUBO = DynamicUniformBuffer<DrawUniforms>;

/// Group 0 holds [`SceneGlobals`], group 1 one [`DrawUniforms`] slot
/// selected by dynamic offset.
pub struct GlobalBindings {
    globals_layout: BindGroupLayoutWithDesc,
    draw_layout: BindGroupLayoutWithDesc,
    globals_group: wgpu::BindGroup,
    draw_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, globals: &GlobalUBO, draws: &DrawUBO) -> Self {
        let globals_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Scene Globals Layout");
        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_dynamic(wgpu::BufferSize::new(
                std::mem::size_of::<DrawUniforms>() as u64,
            )))
            .create(device, "Draw Uniforms Layout");

        let globals_group = BindGroupBuilder::new(&globals_layout)
            .resource(globals.binding_resource())
            .create(device, "Scene Globals");
        let draw_group = BindGroupBuilder::new(&draw_layout)
            .resource(draws.binding_resource())
            .create(device, "Draw Uniforms");

        Self {
            globals_layout,
            draw_layout,
            globals_group,
            draw_group,
        }
    }

    /// Must be called whenever the draw buffer was reallocated
    pub fn rebind_draws(&mut self, device: &wgpu::Device, draws: &DrawUBO) {
        self.draw_group = BindGroupBuilder::new(&self.draw_layout)
            .resource(draws.binding_resource())
            .create(device, "Draw Uniforms");
    }

    pub fn layouts(&self) -> [&wgpu::BindGroupLayout; 2] {
        [&self.globals_layout.layout, &self.draw_layout.layout]
    }

    pub fn globals_group(&self) -> &wgpu::BindGroup {
        &self.globals_group
    }

    pub fn draw_group(&self) -> &wgpu::BindGroup {
        &self.draw_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_block_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<SceneGlobals>(), 336);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 160);
    }

    #[test]
    fn test_empty_state_packs_safe_defaults() {
        let globals = SceneGlobals::default();
        assert_eq!(globals.view, IDENTITY);
        assert_eq!(globals.light_on, 0);
        assert_eq!(globals.spot_on, 0);
        // Depth is remapped from [-1, 1] to [0, 1]
        assert_eq!(globals.projection[2][2], 0.5);
        assert_eq!(globals.projection[3][2], 0.5);

        let draw = DrawUniforms::from_state(&BindingState::new());
        assert_eq!(draw.texture_mode, DEFAULT_TEXTURE_MODE);
        assert_eq!(draw.color, [1.0; 4]);
    }

    #[test]
    fn test_state_slots_are_packed() {
        let mut state = BindingState::new();
        let model = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        state.set_uniform(Uniform::ModelMatrix, UniformValue::matrix(&model));
        state.set_uniform(Uniform::FragColor, UniformValue::Vec4([0.1, 0.2, 0.3, 1.0]));
        state.set_uniform(Uniform::TextureMode, UniformValue::Int(-1));
        state.set_uniform(Uniform::UseSpecular, UniformValue::flag(true));
        state.set_uniform(Uniform::LightPosition, UniformValue::Vec3([0.0, 5.0, 0.0]));
        state.set_uniform(Uniform::SpotDirection, UniformValue::Vec3([0.0, -1.0, 0.0]));
        state.set_uniform(Uniform::LightOn, UniformValue::flag(true));
        state.set_uniform(Uniform::SpotCosineCutoff, UniformValue::Float(0.9));

        let draw = DrawUniforms::from_state(&state);
        assert_eq!(draw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(draw.normal_matrix, IDENTITY);
        assert_eq!(draw.color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(draw.texture_mode, -1);
        assert_eq!(draw.use_specular, 1);

        let globals = SceneGlobals::from_state(&state);
        assert_eq!(globals.light_position, [0.0, 5.0, 0.0, 1.0]);
        assert_eq!(globals.spot_direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(globals.light_on, 1);
        assert_eq!(globals.spot_cosine_cutoff, 0.9);
    }
}
