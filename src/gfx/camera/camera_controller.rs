use log::debug;
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::FlyCamera;

/// Maps keyboard and mouse input onto [`FlyCamera`] moves
pub struct CameraController {
    /// Degrees of rotation per pixel of drag
    pub drag_sensitivity: f32,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(drag_sensitivity: f32) -> Self {
        Self {
            drag_sensitivity,
            is_mouse_pressed: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.is_mouse_pressed
    }

    /// Returns true when the camera moved
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut FlyCamera) -> bool {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                false
            }
            DeviceEvent::MouseMotion { delta } => self.drag(delta.0, delta.1, camera),
            _ => false,
        }
    }

    /// Turns the camera by a drag of `dx`, `dy` pixels while the button is held
    pub fn drag(&mut self, dx: f64, dy: f64, camera: &mut FlyCamera) -> bool {
        if !self.is_mouse_pressed || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        camera.rotate_horizontal(-dx as f32 * self.drag_sensitivity);
        camera.rotate_vertical(-dy as f32 * self.drag_sensitivity);
        true
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut FlyCamera) -> bool {
        match event.physical_key {
            PhysicalKey::Code(code) => self.process_key(code, event.state, camera),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    /// Applies one key press; releases and unbound keys are ignored
    pub fn process_key(&mut self, code: KeyCode, state: ElementState, camera: &mut FlyCamera) -> bool {
        if state != ElementState::Pressed {
            return false;
        }
        match code {
            KeyCode::KeyW => camera.forward(),
            KeyCode::KeyS => camera.back(),
            KeyCode::KeyA => camera.left(),
            KeyCode::KeyD => camera.right(),
            KeyCode::KeyQ => camera.pan_left(),
            KeyCode::KeyE => camera.pan_right(),
            KeyCode::KeyF => {
                camera.toggle_fly_mode();
            }
            _ => return false,
        }
        debug!("camera eye {:?} at {:?}", camera.eye, camera.at);
        true
    }
}
