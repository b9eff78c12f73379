use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::DepthTarget;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-frame context passed to [`App::on_frame`].
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
///
/// [`App::on_frame`]: super::App::on_frame
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Runs one frame of the render protocol around `draw`:
    ///
    /// 1. acquire the next presentable surface view (a transient failure
    ///    skips this frame; an OOM-class failure exits)
    /// 2. one render pass: color cleared to `clear`, depth cleared via
    ///    `depth`, `draw` records the pass contents
    /// 3. submit, present, and pump the device
    ///
    /// Every transient object (view, encoder, surface texture) is consumed
    /// before this returns; nothing frame-local survives into the next
    /// iteration.
    pub fn render<F>(&mut self, clear: wgpu::Color, depth: &DepthTarget, draw: F) -> AppControl
    where
        F: FnOnce(&mut wgpu::RenderPass<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                // Reconfigured or transient: this frame is lost, the next
                // iteration decides whether the loop continues.
                return AppControl::Continue;
            }
        };

        // Scoped so the pass borrow of `frame.encoder` ends before submit()
        // takes the frame by value.
        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lodestone mesh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(depth.attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            draw(&mut rpass);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
