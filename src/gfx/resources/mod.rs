// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform blocks, and bind groups for rendering.

pub mod global_bindings;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{DrawUBO, DrawUniforms, GlobalBindings, GlobalUBO, SceneGlobals};
pub use texture_resource::TextureResource;
