use cgmath::{perspective, Deg, Matrix4};
use winit::event::{DeviceEvent, KeyEvent};

use super::{camera_controller::CameraController, fly_camera::FlyCamera};
use crate::config::{CameraConfig, ProjectionConfig};

/// Remaps clip-space depth from [-1, 1] to the [0, 1] range wgpu expects
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            FlyCamera::from_config(config),
            CameraController::new(config.drag_sensitivity),
        )
    }

    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.process_events(event, &mut self.camera)
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) -> bool {
        self.controller
            .process_keyed_events(event, &mut self.camera)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.view_matrix()
    }
}

/// Right-handed perspective with depth in [-1, 1]
pub fn projection_matrix(config: &ProjectionConfig, aspect: f32) -> Matrix4<f32> {
    perspective(Deg(config.fov_deg), aspect, config.near, config.far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_projection_maps_near_and_far() {
        let config = ProjectionConfig::default();
        let proj = projection_matrix(&config, 1.5);
        let near = proj * Vector4::new(0.0, 0.0, -config.near, 1.0);
        let far = proj * Vector4::new(0.0, 0.0, -config.far, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);

        let wgpu_near = OPENGL_TO_WGPU_MATRIX * near;
        assert!((wgpu_near.z / wgpu_near.w).abs() < 1e-5);
    }

    #[test]
    fn test_manager_starts_from_config() {
        let config = CameraConfig::default();
        let manager = CameraManager::from_config(&config);
        assert_eq!(manager.camera.eye, config.eye.into());
        assert_eq!(manager.controller.drag_sensitivity, config.drag_sensitivity);
    }
}
