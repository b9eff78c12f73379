use thiserror::Error;

use crate::mesh::MeshError;
use crate::shader::ShaderError;

/// A failure while constructing the render pipeline and its resources.
///
/// Any failure aborts the whole build; no partially constructed pipeline is
/// ever returned.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load shader")]
    Shader(#[from] ShaderError),

    #[error("failed to load geometry")]
    Geometry(#[from] MeshError),
}
