//! Error types for asset loading, configuration and renderer setup.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load one model file.
///
/// Load failures are diagnostic only: the scene keeps running without the
/// asset, so these are logged and never propagated out of the frame loop.
#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OBJ '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to parse glTF '{path}': {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("unsupported model format '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("model '{path}' contains no triangle meshes")]
    Empty { path: PathBuf },
}

/// Failure to read or parse the scene configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while bringing up the GPU surface and device.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
