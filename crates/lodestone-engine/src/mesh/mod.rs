//! Mesh loading.
//!
//! Supplies the flat per-vertex attribute array the render pipeline consumes.
//! The only supported container is a Wavefront OBJ subset; see [`obj`] for
//! the grammar.

mod error;
mod obj;

pub use error::MeshError;
pub use obj::{load_obj, parse_obj};

use bytemuck::{Pod, Zeroable};

/// GPU vertex format for loaded meshes.
///
/// Layout matches the pipeline's vertex buffer description: three tightly
/// packed `vec3<f32>` attributes, per-vertex step mode.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_nine_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn layout_attributes_are_consecutive_vec3s() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 36);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
    }
}
