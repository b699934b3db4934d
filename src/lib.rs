// src/lib.rs
//! Kennel
//!
//! An interactive 3D scene on wgpu and winit: a cube-built chihuahua that
//! walks and pokes its tongue out, a walled yard, a two-segment demo arm and a
//! triangle mesh loaded in the background.

pub mod app;
pub mod config;
pub mod error;
pub mod figure;
pub mod gfx;
pub mod performance;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::KennelApp;
pub use config::SceneConfig;
