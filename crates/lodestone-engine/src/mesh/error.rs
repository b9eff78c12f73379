use std::path::PathBuf;

use thiserror::Error;

/// A failure to produce vertex data from a mesh source.
///
/// All variants are fatal for initialization: the pipeline cannot be built
/// without geometry.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed OBJ data at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("mesh contains no triangles")]
    NoGeometry,
}
