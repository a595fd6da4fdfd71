use std::path::PathBuf;

use crate::texture::TextureSource;

/// Shader and texture inputs for a single scene.
///
/// Paths are already resolved through the asset catalog; the renderer only
/// reads and uploads them.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Vertex stage source file (no `#version` line; the builder injects it).
    pub vertex_shader: PathBuf,
    /// Fragment stage source file (no `#version` line; the builder injects it).
    pub fragment_shader: PathBuf,
    /// Panorama sampled by the fragment stage on texture unit 0.
    pub texture: TextureSource,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and tells the renderer which scene to
/// compile and how large the initial surface should be.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Title of the preview window.
    pub window_title: String,
    /// Scene inputs resolved by the caller.
    pub scene: SceneConfig,
}

impl Default for RendererConfig {
    /// Provides a 1280x720 window with no scene selected.
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            window_title: "crosspano".to_string(),
            scene: SceneConfig {
                vertex_shader: PathBuf::new(),
                fragment_shader: PathBuf::new(),
                texture: TextureSource {
                    path: PathBuf::new(),
                    hdr: true,
                },
            },
        }
    }
}
