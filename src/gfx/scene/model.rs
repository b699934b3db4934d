//! # File-Backed Mesh
//!
//! [`LoadedModel`] reads and parses a mesh file on a background thread. The
//! render thread polls once per frame; the model flips from pending to ready
//! in a single step, so a frame either sees no mesh at all or the complete
//! one. Until then, and forever after a failed load, drawing is a no-op.
//!
//! The model owns private position and normal buffers. Drawing rebinds the
//! attribute slots to them inside a [`ScopedAttributes`] guard, so the
//! shared bindings are back in place as soon as the draw returns.

use std::path::{Path, PathBuf};
use std::thread;

use cgmath::Matrix4;
use futures::channel::oneshot;
use log::{error, info};

use super::shape::{Appearance, ModelTransform};
use crate::error::LoadError;
use crate::gfx::context::{
    Attribute, AttributeBinding, BufferId, GraphicsContext, ScopedAttributes,
};
use crate::gfx::geometry::{parse_mesh, MeshData};

type LoadResult = Result<MeshData, LoadError>;

struct PrivateBuffers {
    positions: BufferId,
    normals: BufferId,
}

enum ModelState {
    Pending(oneshot::Receiver<LoadResult>),
    Ready {
        mesh: MeshData,
        buffers: Option<PrivateBuffers>,
    },
    Failed,
}

pub struct LoadedModel {
    path: PathBuf,
    state: ModelState,
    transform: ModelTransform,
    pub appearance: Appearance,
}

/// Reads and parses a mesh file, blocking the calling thread
pub fn load_mesh_file(path: &Path) -> LoadResult {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mesh(&source).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl LoadedModel {
    /// Starts loading `path` on a background thread
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let thread_path = path.clone();
        let spawned = thread::Builder::new()
            .name("mesh-loader".into())
            .spawn(move || {
                // The receiver may be gone if the model was dropped first
                let _ = sender.send(load_mesh_file(&thread_path));
            });

        if let Err(e) = spawned {
            error!("could not start loader for {}: {}", path.display(), e);
        }
        Self::from_receiver(path, receiver)
    }

    /// Wraps an externally driven load; the model becomes ready when the
    /// sender delivers
    pub fn from_receiver(path: impl Into<PathBuf>, receiver: oneshot::Receiver<LoadResult>) -> Self {
        Self {
            path: path.into(),
            state: ModelState::Pending(receiver),
            transform: ModelTransform::default(),
            appearance: Appearance::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ModelState::Failed)
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.state {
            ModelState::Ready { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    pub fn set_transform(&mut self, matrix: Matrix4<f32>) {
        self.transform.set(matrix);
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }

    /// Checks for a finished load. Returns `true` once the mesh is ready.
    pub fn poll(&mut self) -> bool {
        let ModelState::Pending(receiver) = &mut self.state else {
            return self.is_ready();
        };

        let outcome = match receiver.try_recv() {
            Ok(None) => return false,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(LoadError::Abandoned {
                path: self.path.clone(),
            }),
        };

        match outcome {
            Ok(mesh) => {
                info!(
                    "loaded {} ({} triangles)",
                    self.path.display(),
                    mesh.triangle_count()
                );
                self.state = ModelState::Ready {
                    mesh,
                    buffers: None,
                };
                true
            }
            Err(e) => {
                error!("{}", e);
                self.state = ModelState::Failed;
                false
            }
        }
    }

    /// Draws the mesh through its private buffers, or does nothing if the
    /// load has not completed. Returns whether a draw was issued.
    pub fn draw<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C, normal_view: bool) -> bool {
        let ModelState::Ready { mesh, buffers } = &mut self.state else {
            return false;
        };

        let buffers = buffers.get_or_insert_with(|| {
            let positions = ctx.create_buffer();
            let normals = ctx.create_buffer();
            ctx.upload_buffer(positions, mesh.position_floats());
            ctx.upload_buffer(normals, mesh.normal_floats().unwrap_or_default());
            PrivateBuffers { positions, normals }
        });

        let mut ctx = ScopedAttributes::new(ctx);
        self.appearance.apply(&mut *ctx, &self.transform, normal_view);
        ctx.set_attribute(
            Attribute::Position,
            Some(AttributeBinding::new(buffers.positions, Attribute::Position)),
        );
        ctx.set_attribute(
            Attribute::Normal,
            Some(AttributeBinding::new(buffers.normals, Attribute::Normal)),
        );
        ctx.set_attribute(Attribute::Uv, None);
        ctx.draw_triangles(0, mesh.vertex_count() as u32);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::gfx::context::HeadlessContext;
    use crate::gfx::scene::shape::{Shape, SharedMeshes};
    use std::time::{Duration, Instant};

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";

    fn triangle() -> MeshData {
        parse_mesh(TRIANGLE).unwrap()
    }

    fn wait_until_settled(model: &mut LoadedModel) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !model.poll() && !model.is_failed() {
            assert!(Instant::now() < deadline, "load did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_pending_model_draws_nothing() {
        let (_sender, receiver) = oneshot::channel();
        let mut model = LoadedModel::from_receiver("pending.obj", receiver);
        let mut ctx = HeadlessContext::new();

        assert!(!model.poll());
        model.draw(&mut ctx, false);
        assert!(ctx.draws().is_empty());
    }

    #[test]
    fn test_ready_flag_flips_on_delivery() {
        let (sender, receiver) = oneshot::channel();
        let mut model = LoadedModel::from_receiver("tri.obj", receiver);
        assert!(!model.poll());
        sender.send(Ok(triangle())).unwrap();
        assert!(model.poll());
        assert!(model.is_ready());
        assert_eq!(model.mesh().unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_parse_failure_leaves_model_unready() {
        let (sender, receiver) = oneshot::channel();
        let mut model = LoadedModel::from_receiver("bad.obj", receiver);
        sender
            .send(Err(LoadError::Parse {
                path: "bad.obj".into(),
                source: ParseError::MissingField { line: 1, record: "v" },
            }))
            .unwrap();
        assert!(!model.poll());
        assert!(model.is_failed());
        assert!(!model.poll());
    }

    #[test]
    fn test_dropped_sender_fails_the_load() {
        let (sender, receiver) = oneshot::channel::<LoadResult>();
        let mut model = LoadedModel::from_receiver("gone.obj", receiver);
        drop(sender);
        assert!(!model.poll());
        assert!(model.is_failed());
    }

    #[test]
    fn test_private_draw_restores_shared_bindings() {
        let mut ctx = HeadlessContext::new();
        let mut meshes = SharedMeshes::new(&mut ctx);
        let (sender, receiver) = oneshot::channel();
        let mut model = LoadedModel::from_receiver("tri.obj", receiver);
        sender.send(Ok(triangle())).unwrap();
        model.poll();

        Shape::cube().draw(&mut ctx, &mut meshes, false);
        let before = ctx.attributes();
        model.draw(&mut ctx, false);
        assert_eq!(ctx.attributes(), before);
        Shape::cube().draw(&mut ctx, &mut meshes, false);

        let draws = ctx.draws();
        assert_eq!(draws.len(), 3);
        // The model draw ran on its own buffers with UVs disabled
        assert_eq!(draws[1].count, 3);
        assert!(draws[1].attributes[Attribute::Uv.index()].is_none());
        assert_ne!(draws[1].attributes, before);
        // The following cube sees exactly the bindings and data of the first
        assert_eq!(draws[2].attributes, draws[0].attributes);
        assert_eq!(draws[2].vertices, draws[0].vertices);
    }

    #[test]
    fn test_private_buffers_are_created_once() {
        let mut ctx = HeadlessContext::new();
        let (sender, receiver) = oneshot::channel();
        let mut model = LoadedModel::from_receiver("tri.obj", receiver);
        sender.send(Ok(triangle())).unwrap();
        model.poll();

        model.draw(&mut ctx, false);
        model.draw(&mut ctx, true);
        let draws = ctx.draws();
        assert_eq!(draws[0].attributes, draws[1].attributes);
        assert_eq!(draws[1].texture_mode(), Some(-3));
        assert_eq!(draws[0].vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("kennel-model-{}.obj", std::process::id()));
        std::fs::write(&path, TRIANGLE).unwrap();

        let mut model = LoadedModel::load(&path);
        wait_until_settled(&mut model);
        assert!(model.is_ready());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_fails() {
        let mut model = LoadedModel::load("/nonexistent/kennel/missing.obj");
        wait_until_settled(&mut model);
        assert!(model.is_failed());
        assert!(matches!(
            load_mesh_file(Path::new("/nonexistent/kennel/missing.obj")),
            Err(LoadError::Io { .. })
        ));
    }
}
