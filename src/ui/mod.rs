//! # User Interface
//!
//! A Dear ImGui overlay drawn after the scene. [`UiManager`] wires ImGui to
//! winit and wgpu; [`control_panel`] is the one window the demo shows.
//!
//! While ImGui wants the mouse or keyboard, the app keeps those events away
//! from the camera.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, ControlState};
