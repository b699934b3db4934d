//! Error types for the Kennel demo
//!
//! Three failure classes exist: initialization (fatal to startup), resource
//! loading (the resource never becomes ready) and mesh parsing (surfaced as a
//! distinct error instead of indexing invalid data). None of them is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Which per-vertex array a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Position,
    Normal,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Position => f.write_str("vertex"),
            IndexKind::Normal => f.write_str("normal"),
        }
    }
}

/// Malformed mesh text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: `{record}` record is missing a field")]
    MissingField { line: usize, record: &'static str },

    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: face token `{token}` needs a position and a normal index")]
    MalformedFace { line: usize, token: String },

    #[error("line {line}: face has {count} corners, only triangles are supported")]
    NonTriangularFace { line: usize, count: usize },

    /// `index` is the 1-based index as written in the file
    #[error("line {line}: {kind} index {index} is out of range ({available} defined so far)")]
    IndexOutOfRange {
        line: usize,
        kind: IndexKind,
        index: i64,
        available: usize,
    },
}

/// A file-backed resource could not be produced
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("loader for `{path}` stopped before delivering a mesh")]
    Abandoned { path: PathBuf },
}

/// Startup failures; none of these allow a partial-rendering fallback
#[derive(Error, Debug)]
pub enum InitError {
    #[error("failed to create the rendering surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open the graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("the surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("shader pipeline rejected: {0}")]
    Pipeline(String),

    #[error("failed to create the window")]
    Window(#[from] winit::error::OsError),
}

/// Inconsistent articulated-figure table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    #[error("part `{part}` names unknown parent `{parent}`")]
    UnknownParent { part: String, parent: String },

    #[error("part `{part}` is declared before its parent `{parent}`")]
    ParentAfterChild { part: String, parent: String },

    #[error("part name `{0}` is used twice")]
    DuplicateName(String),
}
