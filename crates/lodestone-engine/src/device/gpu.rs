use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::init::validate_limits;
use super::surface;
use super::{GpuFrame, GpuInit, SessionError, SurfaceErrorAction};

/// Owns wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - acquires the Adapter, then the Device/Queue
/// - creates and configures the Surface (swapchain)
/// - acquires frames and provides an encoder + view for rendering
///
/// The adapter and instance handles are not stored: once the device exists
/// and the surface is configured, nothing needs them again, and the surface
/// keeps the backend context alive internally.
pub struct Gpu<'w> {
    /// Field order is teardown order: queue, then surface, then device.
    queue: wgpu::Queue,

    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; architecture must ensure the
    /// window outlives the `Gpu` instance.
    surface: wgpu::Surface<'w>,

    /// Logical device.
    device: wgpu::Device,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels, fixed at creation (the window is not
    /// resizable in this scope).
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers bridge
    /// with `pollster::block_on`. Construction sequencing is load-bearing:
    /// the surface must exist before adapter selection (compatibility
    /// constraint) and must be configured after the device exists, before the
    /// first present.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self, SessionError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(SessionError::ZeroWindowSize {
                width: size.width,
                height: size.height,
            });
        }

        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Surface lifetime is tied to `window` via `'w`.
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(SessionError::AdapterUnavailable)?;

        log_adapter(&adapter);

        // Reject up front instead of letting device creation fail with an
        // opaque backend error.
        validate_limits(&init.required_limits, &adapter.limits())?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lodestone device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await?;

        // Device loss is terminal for the session; no recovery is attempted.
        device.set_device_lost_callback(|reason, message| {
            if message.is_empty() {
                log::error!("device lost: {reason:?}");
            } else {
                log::error!("device lost: {reason:?} ({message})");
            }
        });

        // Uncaptured errors are logged and the session continues; the
        // triggering operation may have partially failed.
        device.on_uncaptured_error(std::sync::Arc::new(|err| {
            log::error!("uncaptured device error: {err}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(SessionError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        // The adapter (and the instance) have served their purpose; drop them
        // here rather than carrying them for the whole session.
        drop(adapter);
        drop(instance);

        Ok(Self {
            queue,
            surface,
            device,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// The returned frame owns the surface texture and must be passed to
    /// [`submit`](Self::submit) to be presented.
    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lodestone frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    ///
    /// Consumes every transient per-frame object (view, encoder, surface
    /// texture) so nothing GPU-side accumulates across iterations, then pumps
    /// the device's internal work queue.
    pub fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        frame.surface_texture.present();

        let _ = self.device.poll(wgpu::PollType::Poll);
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when that is the remedy.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                log::warn!("surface {err}; reconfiguring");
                self.surface.configure(&self.device, &self.config);
            }
            SurfaceErrorAction::SkipFrame => {
                log::warn!("surface {err}; skipping frame");
            }
            SurfaceErrorAction::Fatal => {
                log::error!("surface {err}; cannot continue");
            }
        }
        action
    }
}

/// Logs which adapter was negotiated and a digest of its limits.
fn log_adapter(adapter: &wgpu::Adapter) {
    let info = adapter.get_info();
    log::info!(
        "using adapter: {} ({:?} on {:?})",
        info.name,
        info.device_type,
        info.backend
    );

    let limits = adapter.limits();
    log::debug!(
        "adapter limits: max_texture_dimension_2d={} max_bind_groups={} \
         max_vertex_attributes={} max_uniform_buffer_binding_size={}",
        limits.max_texture_dimension_2d,
        limits.max_bind_groups,
        limits.max_vertex_attributes,
        limits.max_uniform_buffer_binding_size,
    );
}
