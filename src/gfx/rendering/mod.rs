// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! [`FrameRenderer`] decides what a frame contains; [`WgpuContext`] puts it on
//! screen through the pipelines held by the [`PipelineManager`].

pub mod frame;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use frame::{global_rotation, FrameRenderer, FrameStats, RenderSettings};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::WgpuContext;
