/// Represents a single acquired frame.
///
/// This object is short-lived and must be handed back to [`Gpu::submit`]
/// before the next acquisition: holding the surface texture prevents the
/// presentation engine from making progress, and an unfinished encoder keeps
/// transient GPU objects alive across frames.
///
/// [`Gpu::submit`]: super::Gpu::submit
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
