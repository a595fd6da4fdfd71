//! Renderer crate for crosspano.
//!
//! The module glues the windowed platform shell, the OpenGL shader build
//! pipeline, and the HDR panorama loader together. The overall flow is:
//!
//! ```text
//!   CLI / crosspano
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window::run ──▶ winit event loop ──▶ RenderDriver::draw()
//!          ▲                                   │
//!          │                                   └─▶ SceneRenderer ─▶ uniforms ─▶ draw call
//! ```
//!
//! `SceneRenderer` owns all GPU objects (program, VAO, texture) and the frame
//! state, while `Renderer` is the thin entry point that opens the preview
//! window. Shader sources are compiled at runtime with a `#version` directive
//! derived from the live context, so the same GLSL runs on both desktop and
//! embedded profiles.

pub mod program;
pub mod scene;
pub mod texture;
pub mod timeline;
pub mod types;
pub mod window;

use anyhow::Result;

pub use program::{ShaderProgram, ShadingApi, UniformLocations};
pub use scene::{DrawOutcome, FrameState, RenderDriver, SceneRenderer};
pub use texture::{DecodedImage, SceneTexture, TextureSource};
pub use timeline::{FrameClock, FRAME_STEP};
pub use types::{RendererConfig, SceneConfig};

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside [`window::run`]; `Renderer` simply forwards
/// the request so callers do not need to know about the event loop.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the preview window and drives frames until the window closes.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
