//! Static world geometry and the two-segment demo arm.

use cgmath::{Matrix4, Vector3};

use super::shape::{Shape, SharedMeshes, TextureMode};
use crate::gfx::context::GraphicsContext;
use crate::gfx::transform::{rotation, scale, translation};

pub const MAP_SIZE: usize = 29;

const WALL_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const SKY_COLOR: [f32; 4] = [1.0, 0.5, 0.5, 1.0];
const FLOOR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Column heights of the wall map, indexed `[z][x]`
pub type HeightMap = [[u8; MAP_SIZE]; MAP_SIZE];

/// A square room: every border cell is one cube tall
pub fn walled_map() -> HeightMap {
    let mut map = [[0; MAP_SIZE]; MAP_SIZE];
    for (z, row) in map.iter_mut().enumerate() {
        for (x, height) in row.iter_mut().enumerate() {
            if z == 0 || x == 0 || z == MAP_SIZE - 1 || x == MAP_SIZE - 1 {
                *height = 1;
            }
        }
    }
    map
}

/// Slider-driven angles of the demo arm, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArmAngles {
    pub yellow: f32,
    pub magenta: f32,
}

/// Shoulder frame of the yellow segment, captured before its scale
pub fn arm_frame(angles: &ArmAngles) -> Matrix4<f32> {
    translation([0.0, -0.5, 0.0])
        * rotation(-5.0, Vector3::new(1.0, 0.0, 1.0))
        * rotation(-angles.yellow, Vector3::unit_z())
}

/// Everything in the scene that is not the figure or the loaded model
#[derive(Debug, Clone)]
pub struct World {
    pub map: HeightMap,
    pub arm: ArmAngles,
}

impl Default for World {
    fn default() -> Self {
        Self {
            map: walled_map(),
            arm: ArmAngles::default(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wall_shapes(&self) -> Vec<Shape> {
        let mut walls = Vec::new();
        for (z, row) in self.map.iter().enumerate() {
            for (x, &height) in row.iter().enumerate() {
                for h in 0..height {
                    let offset = [x as f32 - 14.5, -0.75 + h as f32, z as f32 - 15.0];
                    walls.push(
                        Shape::cube()
                            .with_color(WALL_COLOR)
                            .with_texture_mode(TextureMode::UvColor)
                            .with_transform(translation(offset)),
                    );
                }
            }
        }
        walls
    }

    /// Shapes in draw order: walls, sky, floor, sphere, demo body, arm, box
    pub fn shapes(&self) -> Vec<Shape> {
        let mut shapes = self.wall_shapes();

        // Negative scale turns the cube inside out so it is seen from within
        shapes.push(
            Shape::cube()
                .with_color(SKY_COLOR)
                .with_transform(scale([-32.0; 3]) * translation([-0.5, -0.5, -0.5])),
        );

        shapes.push(
            Shape::cube()
                .with_color(FLOOR_COLOR)
                .with_texture_mode(TextureMode::UvColor)
                .with_transform(
                    translation([0.0, -0.75, 0.0])
                        * scale([31.0, 0.01, 31.0])
                        * translation([-0.5, 1.0, -0.5]),
                ),
        );

        shapes.push(
            Shape::sphere()
                .with_color([1.0; 4])
                .with_transform(translation([0.75, 0.2, 0.0]) * scale([0.3; 3])),
        );

        shapes.push(
            Shape::cube()
                .with_color(WALL_COLOR)
                .with_transform(
                    translation([-0.25, -0.75, 0.0])
                        * rotation(-5.0, Vector3::unit_x())
                        * scale([0.5, 0.3, 0.5]),
                ),
        );

        let frame = arm_frame(&self.arm);
        shapes.push(
            Shape::cube()
                .with_color(YELLOW)
                .with_transform(frame * scale([0.25, 0.7, 0.5]) * translation([-0.5, 0.0, 0.0])),
        );
        shapes.push(
            Shape::cube().with_color(MAGENTA).with_transform(
                frame
                    * translation([0.0, 0.9, 0.0])
                    * rotation(45.0, Vector3::unit_z())
                    * rotation(self.arm.magenta, Vector3::unit_z())
                    * scale([0.3; 3])
                    * translation([-0.5, 0.0, -0.001]),
            ),
        );
        shapes
    }

    /// Draws every world shape; returns how many were drawn
    pub fn draw<C: GraphicsContext + ?Sized>(
        &self,
        ctx: &mut C,
        meshes: &mut SharedMeshes,
        normal_view: bool,
    ) -> usize {
        let shapes = self.shapes();
        for shape in &shapes {
            shape.draw(ctx, meshes, normal_view);
        }
        shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::HeadlessContext;
    use crate::gfx::scene::shape::MeshKind;
    use cgmath::{InnerSpace, Vector4};

    const WALL_COUNT: usize = 4 * (MAP_SIZE - 1);

    #[test]
    fn test_walled_map_has_a_border_only() {
        let map = walled_map();
        let total: usize = map.iter().flatten().map(|&h| h as usize).sum();
        assert_eq!(total, WALL_COUNT);
        assert_eq!(map[0][5], 1);
        assert_eq!(map[14][14], 0);
    }

    #[test]
    fn test_draw_order_and_modes() {
        let world = World::new();
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        let drawn = world.draw(&mut ctx, &mut meshes, false);
        assert_eq!(drawn, WALL_COUNT + 6);

        let draws = ctx.draws();
        assert!(draws[..WALL_COUNT].iter().all(|d| d.texture_mode() == Some(-1)));
        let rest = &draws[WALL_COUNT..];
        let modes: Vec<_> = rest.iter().map(|d| d.texture_mode()).collect();
        assert_eq!(modes, [-2, -1, -2, -2, -2, -2].map(Some));
        assert_eq!(rest[2].count, meshes.mesh(MeshKind::Sphere).vertex_count() as u32);
        assert_eq!(rest[3].color(), Some(WALL_COLOR));
        assert_eq!(rest[4].color(), Some(YELLOW));
        assert_eq!(rest[5].color(), Some(MAGENTA));
        assert_eq!(rest[5].count, 36);
    }

    #[test]
    fn test_normal_view_overrides_every_shape() {
        let world = World::new();
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        world.draw(&mut ctx, &mut meshes, true);
        assert!(ctx.draws().iter().all(|d| d.texture_mode() == Some(-3)));
    }

    #[test]
    fn test_box_follows_the_yellow_joint() {
        let mut world = World::new();
        let box_origin = |world: &World| {
            let shapes = world.shapes();
            let m = *shapes[shapes.len() - 1].transform();
            (m * Vector4::new(0.5, 0.0, 0.001, 1.0)).truncate()
        };
        let shoulder = Vector3::new(0.0, -0.5, 0.0);

        let rest = box_origin(&world);
        world.arm.yellow = 30.0;
        let bent = box_origin(&world);
        // The box pivots with the arm, keeping its distance from the shoulder
        assert!(((rest - shoulder).magnitude() - 0.9).abs() < 1e-4);
        assert!(((bent - shoulder).magnitude() - 0.9).abs() < 1e-4);
        assert!((rest - bent).magnitude() > 0.1);

        // The wrist angle spins the box in place
        world.arm.yellow = 0.0;
        world.arm.magenta = 60.0;
        assert!((box_origin(&world) - rest).magnitude() < 1e-4);
    }
}
