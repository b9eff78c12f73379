//! GPU rendering subsystem.
//!
//! One fixed pipeline draws one loaded mesh with a per-frame uniform block.
//! All session-lifetime GPU objects (pipeline, buffers, bind group, depth
//! target) are built exactly once by [`MeshPipeline::build`] and live until
//! the session ends.

mod depth;
mod error;
mod pipeline;
mod uniform;

pub use depth::{DEPTH_FORMAT, DepthTarget};
pub use error::RenderError;
pub use pipeline::MeshPipeline;
pub use uniform::{SceneUniforms, ViewParams};
