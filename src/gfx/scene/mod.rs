//! # Scene Contents
//!
//! Everything drawn each frame that is not the articulated figure:
//!
//! - [`Shape`] - a primitive mesh with a placement and an [`Appearance`]
//! - [`SharedMeshes`] - the cube and sphere data behind every shape draw
//! - [`LoadedModel`] - a mesh read from disk on a background thread
//! - [`World`] - the wall map, sky, floor and demo arm
//! - [`Vertex3D`] - interleaved vertex layout used by the GPU path

pub mod model;
pub mod shape;
pub mod vertex;
pub mod world;

pub use model::{load_mesh_file, LoadedModel};
pub use shape::{Appearance, MeshKind, ModelTransform, Shape, SharedMeshes, TextureMode};
pub use vertex::Vertex3D;
pub use world::{ArmAngles, World};
