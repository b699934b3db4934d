use cgmath::*;
use log::info;

use crate::config::CameraConfig;
use crate::gfx::transform::rotation;

/// First-person camera described by an eye point, a look-at point and an up
/// direction.
///
/// Translations move `eye` and `at` together so the view direction is kept;
/// rotations swing `at` around `eye`. Outside fly mode, movement stays in the
/// horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub eye: Point3<f32>,
    pub at: Point3<f32>,
    pub up: Vector3<f32>,
    pub fly_mode: bool,
    pub move_speed: f32,
    pub pan_degrees: f32,
    pub ground_level: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl FlyCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            eye: Point3::from(config.eye),
            at: Point3::from(config.at),
            up: Vector3::from(config.up),
            fly_mode: false,
            move_speed: config.move_speed,
            pan_degrees: config.pan_degrees,
            ground_level: config.ground_level,
        }
    }

    /// Unnormalized view direction `at - eye`
    pub fn direction(&self) -> Vector3<f32> {
        self.at - self.eye
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.at, self.up)
    }

    fn travel(&mut self, direction: Vector3<f32>) {
        let mut direction = direction;
        if !self.fly_mode {
            direction -= self.up.normalize() * direction.dot(self.up.normalize());
        }
        if direction.magnitude2() == 0.0 {
            return;
        }
        let step = direction.normalize() * self.move_speed;
        self.eye += step;
        self.at += step;
    }

    pub fn forward(&mut self) {
        self.travel(self.direction());
    }

    pub fn back(&mut self) {
        self.travel(-self.direction());
    }

    pub fn left(&mut self) {
        self.travel(self.up.cross(self.direction()));
    }

    pub fn right(&mut self) {
        self.travel(self.direction().cross(self.up));
    }

    /// Turns the view direction about `up` by `degrees` (positive turns left)
    pub fn rotate_horizontal(&mut self, degrees: f32) {
        self.rotate_direction(degrees, self.up);
    }

    /// Tilts the view direction about the camera's side axis (positive looks down)
    pub fn rotate_vertical(&mut self, degrees: f32) {
        let side = self.up.cross(self.direction());
        self.rotate_direction(degrees, side);
    }

    fn rotate_direction(&mut self, degrees: f32, axis: Vector3<f32>) {
        let turned = rotation(degrees, axis) * self.direction().extend(0.0);
        self.at = self.eye + turned.truncate();
    }

    pub fn pan_left(&mut self) {
        self.rotate_horizontal(self.pan_degrees);
    }

    pub fn pan_right(&mut self) {
        self.rotate_horizontal(-self.pan_degrees);
    }

    /// Flips fly mode. Leaving it drops the camera to ground level if it is
    /// above it, keeping the view direction.
    pub fn toggle_fly_mode(&mut self) -> bool {
        self.fly_mode = !self.fly_mode;
        info!("fly mode {}", if self.fly_mode { "on" } else { "off" });
        if !self.fly_mode && self.eye.y > self.ground_level {
            let drop = self.eye.y - self.ground_level;
            self.eye.y -= drop;
            self.at.y -= drop;
        }
        self.fly_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_point(actual: Point3<f32>, expected: [f32; 3]) {
        let expected = Point3::from(expected);
        assert!(
            (actual - expected).magnitude() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn camera() -> FlyCamera {
        FlyCamera {
            eye: Point3::new(0.0, 0.0, 3.0),
            at: Point3::new(0.0, 0.0, 0.0),
            ..FlyCamera::default()
        }
    }

    #[test]
    fn test_forward_and_back_keep_direction() {
        let mut cam = camera();
        let direction = cam.direction();
        cam.forward();
        assert_point(cam.eye, [0.0, 0.0, 2.8]);
        assert_point(cam.at, [0.0, 0.0, -0.2]);
        cam.back();
        cam.back();
        assert_point(cam.eye, [0.0, 0.0, 3.2]);
        assert!((cam.direction() - direction).magnitude() < EPSILON);
    }

    #[test]
    fn test_strafe_is_perpendicular() {
        let mut cam = camera();
        cam.left();
        assert_point(cam.eye, [-0.2, 0.0, 3.0]);
        cam.right();
        cam.right();
        assert_point(cam.eye, [0.2, 0.0, 3.0]);
    }

    #[test]
    fn test_pan_rotates_about_up() {
        let mut cam = camera();
        cam.pan_degrees = 90.0;
        cam.pan_left();
        // Looking down -z, a left turn looks down -x
        assert_point(cam.at, [-3.0, 0.0, 3.0]);
        cam.pan_right();
        assert_point(cam.at, [0.0, 0.0, 0.0]);
        assert_point(cam.eye, [0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_vertical_rotation_tilts_view() {
        let mut cam = camera();
        // Positive angles turn about up x forward, which tilts the view down
        cam.rotate_vertical(90.0);
        assert_point(cam.at, [0.0, -3.0, 3.0]);

        let mut cam = camera();
        cam.rotate_vertical(-90.0);
        assert_point(cam.at, [0.0, 3.0, 3.0]);
    }

    #[test]
    fn test_walking_stays_level() {
        let mut cam = camera();
        cam.at = Point3::new(0.0, -3.0, 0.0);
        cam.forward();
        assert!((cam.eye.y - 0.0).abs() < EPSILON);

        cam.toggle_fly_mode();
        cam.forward();
        assert!(cam.eye.y < 0.0);
    }

    #[test]
    fn test_leaving_fly_mode_drops_to_ground() {
        let mut cam = camera();
        assert!(cam.toggle_fly_mode());
        cam.eye.y = 4.0;
        cam.at.y = 5.0;
        assert!(!cam.toggle_fly_mode());
        assert!((cam.eye.y - 1.0).abs() < EPSILON);
        assert!((cam.at.y - 2.0).abs() < EPSILON);

        // Below ground level nothing moves
        cam.toggle_fly_mode();
        cam.eye.y = 0.5;
        cam.toggle_fly_mode();
        assert!((cam.eye.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let cam = camera();
        let p = cam.view_matrix() * cam.eye.to_homogeneous();
        assert!(p.truncate().magnitude() < EPSILON);
    }
}
