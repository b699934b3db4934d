//! # Graphics Module
//!
//! - **Context** ([`context`]) - the state-machine device every drawable uses
//! - **Geometry** ([`geometry`]) - cube and sphere generators, mesh parsing
//! - **Scene** ([`scene`]) - shapes, the static world and the loaded model
//! - **Camera** ([`camera`]) - first-person fly camera and its input
//! - **Rendering** ([`rendering`]) - frame orchestration and the wgpu backend
//! - **Resources** ([`resources`]) - uniform blocks and textures on the GPU
//!
//! Everything above [`rendering`] only sees [`context::GraphicsContext`], so the
//! whole scene can be driven against a [`context::HeadlessContext`].

pub mod camera;
pub mod context;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod transform;

pub use camera::FlyCamera;
pub use rendering::{FrameRenderer, WgpuContext};
