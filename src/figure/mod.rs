//! # Articulated Figure
//!
//! The quadruped is a table of cube parts ([`chihuahua`]) validated into a
//! [`Rig`], posed from [`PoseParameters`] by the [`poser`] and animated by the
//! [`AnimationDriver`].
//!
//! ```rust
//! use kennel::figure::{AnimationDriver, Figure};
//!
//! let figure = Figure::chihuahua([0.0, 0.0, 0.0]).unwrap();
//! let mut driver = AnimationDriver::new();
//! driver.set_walking(true);
//! let posed = figure.pose(driver.update(0.5));
//! assert_eq!(posed.len(), figure.rig().len() - 1); // tongue hidden
//! ```

pub mod animation;
pub mod chihuahua;
pub mod joints;
pub mod poser;
pub mod rig;

pub use animation::AnimationDriver;
pub use joints::{Joint, PoseParameters};
pub use poser::PosedPart;
pub use rig::{PartSpec, Rig};

use cgmath::Matrix4;

use crate::error::RigError;
use crate::gfx::context::GraphicsContext;
use crate::gfx::scene::shape::{Shape, SharedMeshes, TextureMode};
use crate::gfx::transform::translation;

/// A rig placed in the world
#[derive(Debug, Clone)]
pub struct Figure {
    rig: Rig,
    root: Matrix4<f32>,
}

impl Figure {
    pub fn new(rig: Rig, root: Matrix4<f32>) -> Self {
        Self { rig, root }
    }

    pub fn chihuahua(origin: [f32; 3]) -> Result<Self, RigError> {
        Ok(Self::new(chihuahua::rig()?, translation(origin)))
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn root(&self) -> &Matrix4<f32> {
        &self.root
    }

    pub fn pose(&self, params: &PoseParameters) -> Vec<PosedPart> {
        poser::pose(&self.rig, self.root, params)
    }

    /// Draws every visible part as a solid-colored cube; returns the part count
    pub fn draw<C: GraphicsContext + ?Sized>(
        &self,
        ctx: &mut C,
        meshes: &mut SharedMeshes,
        params: &PoseParameters,
        normal_view: bool,
    ) -> usize {
        let parts = self.pose(params);
        for part in &parts {
            Shape::cube()
                .with_color(part.color)
                .with_texture_mode(TextureMode::SolidColor)
                .with_transform(part.model)
                .draw(ctx, meshes, normal_view);
        }
        parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::{HeadlessContext, Uniform, UniformValue};

    #[test]
    fn test_figure_draws_one_cube_per_visible_part() {
        let figure = Figure::chihuahua([-0.3, -0.6, 0.0]).unwrap();
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        let mut params = PoseParameters::rest();

        let drawn = figure.draw(&mut ctx, &mut meshes, &params, false);
        assert_eq!(drawn, 86);
        assert_eq!(ctx.draws().len(), 86);
        assert!(ctx.draws().iter().all(|d| d.count == 36 && d.texture_mode() == Some(-2)));

        params[Joint::TongueOut] = 0.5;
        let drawn = figure.draw(&mut ctx, &mut meshes, &params, true);
        assert_eq!(drawn, 87);
        assert!(ctx.draws()[86..].iter().all(|d| d.texture_mode() == Some(-3)));
    }

    #[test]
    fn test_part_colors_reach_the_shader() {
        let figure = Figure::chihuahua([0.0; 3]).unwrap();
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        figure.draw(&mut ctx, &mut meshes, &PoseParameters::rest(), false);

        let colors: Vec<_> = ctx
            .draws()
            .iter()
            .filter_map(|d| d.uniform(Uniform::FragColor))
            .collect();
        assert!(colors.contains(&UniformValue::Vec4(chihuahua::BLACK)));
        assert!(colors.contains(&UniformValue::Vec4(chihuahua::WHITE)));
        assert!(!colors.contains(&UniformValue::Vec4(chihuahua::TONGUE)));
    }
}
