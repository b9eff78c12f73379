use super::SessionError;

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces the loop to the display.
    pub present_mode: wgpu::PresentMode,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// These are upper bounds the application needs (vertex attribute count,
    /// buffer sizes, bind group count). They are validated against the
    /// adapter's advertised limits before device creation.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Checks that every required limit is within what the adapter supports.
///
/// The first offending limit is reported by name so the failure identifies
/// the capability gap, not just "device creation failed".
pub(crate) fn validate_limits(
    required: &wgpu::Limits,
    supported: &wgpu::Limits,
) -> Result<(), SessionError> {
    let mut failure: Option<SessionError> = None;

    required.check_limits_with_fail_fn(supported, false, |name, requested, allowed| {
        if failure.is_none() {
            failure = Some(SessionError::UnsupportedLimits {
                limit: name.to_string(),
                required: requested,
                supported: allowed,
            });
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_within_support_pass() {
        let supported = wgpu::Limits::default();
        assert!(validate_limits(&wgpu::Limits::downlevel_defaults(), &supported).is_ok());
    }

    #[test]
    fn identical_limits_pass() {
        let limits = wgpu::Limits::default();
        assert!(validate_limits(&limits, &limits).is_ok());
    }

    #[test]
    fn excessive_limits_are_rejected_by_name() {
        let supported = wgpu::Limits::default();
        let required = wgpu::Limits {
            max_texture_dimension_2d: supported.max_texture_dimension_2d * 2,
            ..supported.clone()
        };

        match validate_limits(&required, &supported) {
            Err(SessionError::UnsupportedLimits {
                limit,
                required: req,
                supported: sup,
            }) => {
                assert!(limit.contains("exture"), "unexpected limit name: {limit}");
                assert!(req > sup);
            }
            other => panic!("expected UnsupportedLimits, got {other:?}"),
        }
    }
}
