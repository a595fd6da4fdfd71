//! GPU-side scene state and the per-frame draw path.
//!
//! `SceneRenderer` owns the program, the panorama texture, and one vertex
//! array object. No vertex buffer exists: the vertex stage synthesises the
//! full-screen triangle from `gl_VertexID`, so the VAO is only there because
//! core profiles refuse to draw without one bound.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use cgmath::{perspective, Deg, Matrix4, SquareMatrix};
use glow::HasContext;
use tracing::{debug, info};

use crate::program::{self, ProgramSources, ShaderProgram, ShadingApi};
use crate::texture::SceneTexture;
use crate::timeline::FrameClock;
use crate::types::SceneConfig;

/// Mutable per-frame record: viewport size and the last pointer position,
/// both in backing pixels with the origin at the lower left.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameState {
    viewport: (u32, u32),
    pointer: [f32; 2],
}

impl FrameState {
    /// Records a new viewport size; zero-sized requests are ignored so a
    /// minimised window cannot wedge the GL viewport.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.viewport = (width, height);
        true
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Records the last pointer position in lower-left-origin pixels.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = [x, y];
    }

    pub fn pointer(&self) -> [f32; 2] {
        self.pointer
    }
}

/// Result of asking the driver for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Rendered,
    /// The scene was not initialised yet; nothing touched the GPU.
    Skipped,
}

/// Owns every GPU object needed to present one frame.
pub struct SceneRenderer {
    gl: Arc<glow::Context>,
    default_framebuffer: Option<glow::Framebuffer>,
    program: ShaderProgram,
    texture: SceneTexture,
    vao: glow::VertexArray,
    frame: FrameState,
    clock: FrameClock,
    /// Recomputed on resize for parity with the other samples; the shader
    /// never reads it.
    _projection: Matrix4<f32>,
}

impl SceneRenderer {
    /// Loads the panorama, builds the shader program, resolves uniforms, and
    /// allocates the VAO.
    pub fn new(
        gl: Arc<glow::Context>,
        default_framebuffer: Option<glow::Framebuffer>,
        api: ShadingApi,
        config: &SceneConfig,
    ) -> Result<Self> {
        let texture = SceneTexture::load(&gl, &config.texture)?;
        let program = program::build_program(
            &gl,
            api,
            &ProgramSources {
                vertex: config.vertex_shader.clone(),
                fragment: config.fragment_shader.clone(),
            },
        )?;

        // Point the panorama sampler at texture unit 0 up front.
        unsafe {
            let sampler = gl.get_uniform_location(program.raw(), "u_panorama");
            if sampler.is_some() {
                gl.use_program(Some(program.raw()));
                gl.uniform_1_i32(sampler.as_ref(), 0);
                gl.use_program(None);
            }
        }

        let vao = unsafe { gl.create_vertex_array() }
            .map_err(|err| anyhow!("failed to create vertex array object: {err}"))?;

        let (width, height) = texture.resolution();
        info!(
            linked = program.linked(),
            texture_width = width,
            texture_height = height,
            "scene renderer ready"
        );

        Ok(Self {
            gl,
            default_framebuffer,
            program,
            texture,
            vao,
            frame: FrameState::default(),
            clock: FrameClock::new(),
            _projection: Matrix4::identity(),
        })
    }

    /// Records the new viewport size and refreshes the (unused) projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.frame.set_viewport(width, height) {
            return;
        }
        let aspect = width as f32 / height as f32;
        self._projection = perspective(Deg(65.0), aspect, 1.0, 5000.0);
        debug!(width, height, "recorded viewport size");
    }

    /// Forwards a pointer position already expressed in lower-left-origin
    /// backing pixels.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.frame.set_pointer(x, y);
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Advances the clock one fixed step and issues the single draw call.
    pub fn draw(&mut self) {
        let time = self.clock.tick();
        let (width, height) = self.frame.viewport();
        let pointer = self.frame.pointer();
        let gl = &self.gl;

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, self.default_framebuffer);
            gl.clear_color(0.5, 0.5, 0.5, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.viewport(0, 0, width as i32, height as i32);

            gl.bind_vertex_array(Some(self.vao));
            gl.use_program(Some(self.program.raw()));

            let uniforms = &self.program.uniforms;
            gl.uniform_2_f32(uniforms.resolution.as_ref(), width as f32, height as f32);
            gl.uniform_1_f32(uniforms.time.as_ref(), time);
            gl.uniform_2_f32(uniforms.mouse.as_ref(), pointer[0], pointer[1]);

            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture.raw()));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);

            gl.use_program(None);
            gl.bind_vertex_array(None);
        }
    }
}

impl Drop for SceneRenderer {
    fn drop(&mut self) {
        self.program.destroy(&self.gl);
        self.texture.destroy(&self.gl);
        unsafe {
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

/// Guards the draw path against the platform timer firing before the scene
/// finishes constructing: until a renderer is installed, `draw` is a no-op.
#[derive(Default)]
pub struct RenderDriver {
    scene: Option<SceneRenderer>,
}

impl RenderDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, scene: SceneRenderer) {
        self.scene = Some(scene);
    }

    pub fn is_ready(&self) -> bool {
        self.scene.is_some()
    }

    pub fn draw(&mut self) -> DrawOutcome {
        match self.scene.as_mut() {
            Some(scene) => {
                scene.draw();
                DrawOutcome::Rendered
            }
            None => DrawOutcome::Skipped,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.resize(width, height);
        }
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.set_pointer(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_before_initialisation_is_a_noop() {
        let mut driver = RenderDriver::new();
        assert!(!driver.is_ready());
        assert_eq!(driver.draw(), DrawOutcome::Skipped);
        // Resize and pointer updates are equally harmless before install.
        driver.resize(1920, 1080);
        driver.set_pointer(12.0, 34.0);
        assert_eq!(driver.draw(), DrawOutcome::Skipped);
    }

    #[test]
    fn frame_state_records_viewport_exactly() {
        let mut frame = FrameState::default();
        assert!(frame.set_viewport(1280, 720));
        assert_eq!(frame.viewport(), (1280, 720));
    }

    #[test]
    fn zero_sized_viewport_is_ignored() {
        let mut frame = FrameState::default();
        frame.set_viewport(800, 600);
        assert!(!frame.set_viewport(0, 600));
        assert!(!frame.set_viewport(800, 0));
        assert_eq!(frame.viewport(), (800, 600));
    }

    #[test]
    fn pointer_coordinates_round_trip() {
        let mut frame = FrameState::default();
        frame.set_pointer(640.0, 360.0);
        assert_eq!(frame.pointer(), [640.0, 360.0]);
    }
}
