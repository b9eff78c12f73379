use std::path::PathBuf;

use lodestone_engine::core::{App, AppControl, FrameCtx};
use lodestone_engine::render::{MeshPipeline, ViewParams};

/// Everything the viewer scene is parameterized on.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub shader_path: PathBuf,
    pub mesh_path: PathBuf,
    pub clear_color: wgpu::Color,
    pub view: ViewParams,
}

impl ViewerConfig {
    pub fn new(shader_path: impl Into<PathBuf>, mesh_path: impl Into<PathBuf>) -> Self {
        Self {
            shader_path: shader_path.into(),
            mesh_path: mesh_path.into(),
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.05,
                a: 1.0,
            },
            view: ViewParams::default(),
        }
    }
}

/// The single-scene application: one pipeline, one mesh, spinning forever.
pub struct ViewerApp {
    config: ViewerConfig,
    scene: Option<MeshPipeline>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            scene: None,
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // The pipeline needs the device, so it is built on the first frame,
        // once, and reused for the rest of the session.
        if self.scene.is_none() {
            let built = MeshPipeline::build(
                ctx.gpu.device(),
                ctx.gpu.queue(),
                ctx.gpu.surface_format(),
                ctx.gpu.size(),
                self.config.view,
                &self.config.shader_path,
                &self.config.mesh_path,
            );

            match built {
                Ok(scene) => {
                    log::info!("scene ready: {} vertices", scene.vertex_count());
                    self.scene = Some(scene);
                }
                Err(err) => {
                    ctx.runtime
                        .fail(anyhow::Error::new(err).context("pipeline construction failed"));
                    return AppControl::Continue;
                }
            }
        }

        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };

        scene.advance(ctx.gpu.queue(), ctx.time.elapsed);
        ctx.render(self.config.clear_color, scene.depth(), |rpass| {
            scene.draw(rpass);
        })
    }
}
