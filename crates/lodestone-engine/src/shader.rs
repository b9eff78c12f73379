//! Shader source loading.
//!
//! The engine treats WGSL text as an opaque blob: it is read here and handed
//! to `create_shader_module` unchanged. Compilation errors surface through
//! the device's uncaptured-error callback.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A failure to read shader source text.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads WGSL source from a file.
pub fn load_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/lodestone-test.wgsl");
        match load_source(path) {
            Err(ShaderError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
