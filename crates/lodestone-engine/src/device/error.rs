use thiserror::Error;

/// Fatal failures while establishing the GPU session.
///
/// Every variant aborts initialization; there is no degraded mode.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("window has zero size ({width}x{height})")]
    ZeroWindowSize { width: u32, height: u32 },

    #[error("failed to create rendering surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    AdapterUnavailable(#[source] wgpu::RequestAdapterError),

    #[error("required limit `{limit}` ({required}) exceeds adapter support ({supported})")]
    UnsupportedLimits {
        limit: String,
        required: u64,
        supported: u64,
    },

    #[error("failed to create device/queue")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("surface advertises no texture formats")]
    NoSurfaceFormat,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface must be reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
