//! Lodestone viewer.
//!
//! Opens one fixed-size window, builds the mesh pipeline once, and spins the
//! loaded model until the window is closed. Exits non-zero on any fatal
//! initialization or frame error.

mod app;

use std::path::Path;

use anyhow::Result;
use winit::dpi::LogicalSize;

use lodestone_engine::device::GpuInit;
use lodestone_engine::logging::{self, LoggingConfig};
use lodestone_engine::window::{Runtime, RuntimeConfig};

use crate::app::{ViewerApp, ViewerConfig};

const WINDOW_TITLE: &str = "lodestone";
const WINDOW_WIDTH: f64 = 800.0;
const WINDOW_HEIGHT: f64 = 600.0;

const SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/mesh.wgsl");
const MESH_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/pyramid.obj");

fn main() -> Result<()> {
    logging::init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: WINDOW_TITLE.to_string(),
        initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    };

    let gpu_init = GpuInit {
        // Broadly supported baseline; everything this scene needs fits in it.
        required_limits: wgpu::Limits::downlevel_defaults(),
        ..GpuInit::default()
    };

    let app = ViewerApp::new(ViewerConfig::new(
        Path::new(SHADER_PATH),
        Path::new(MESH_PATH),
    ));

    Runtime::run(config, gpu_init, app)
}
