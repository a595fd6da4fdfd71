//! Windowed platform shell: context/surface setup and input forwarding.
//!
//! The shell owns the one capability set the renderer needs from a platform
//! ([`SurfaceControl`]): making the context current, presenting a frame, and
//! resizing the surface. The glutin-backed implementation is the only one
//! compiled on desktop; injecting it through the trait keeps the draw path
//! free of platform branching.
//!
//! Frames are paced by the swapchain: swap interval 1 blocks `present` until
//! vsync, and `AboutToWait` requests the next redraw, so `draw()` runs once
//! per refresh on the thread that owns the context. A late callback simply
//! means a skipped frame; there is no compensation.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use tracing::{info, warn};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::program::ShadingApi;
use crate::scene::{DrawOutcome, RenderDriver, SceneRenderer};
use crate::types::RendererConfig;

/// Capability set the renderer needs from a platform surface.
pub trait SurfaceControl {
    fn make_current(&self) -> Result<()>;
    fn present(&self) -> Result<()>;
    fn resize_surface(&self, size: PhysicalSize<u32>);
}

/// Desktop implementation backed by a glutin context and window surface.
struct GlutinSurface {
    context: PossiblyCurrentContext,
    surface: glutin::surface::Surface<WindowSurface>,
}

impl SurfaceControl for GlutinSurface {
    fn make_current(&self) -> Result<()> {
        self.context
            .make_current(&self.surface)
            .context("failed to make GL context current")
    }

    fn present(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to present frame")
    }

    fn resize_surface(&self, size: PhysicalSize<u32>) {
        let width = NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN);
        let height = NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN);
        self.surface.resize(&self.context, width, height);
    }
}

/// Tracks cursor position and press state so only presses and drags update
/// the shader's pointer uniform, as in the original sample.
#[derive(Default)]
struct PointerState {
    position: Option<PhysicalPosition<f64>>,
    is_pressed: bool,
}

impl PointerState {
    /// Records the cursor position; returns it when a drag is in progress.
    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<PhysicalPosition<f64>> {
        self.position = Some(position);
        self.is_pressed.then_some(position)
    }

    /// Notes a primary-button transition; returns the position on press.
    fn button(&mut self, state: ElementState) -> Option<PhysicalPosition<f64>> {
        match state {
            ElementState::Pressed => {
                self.is_pressed = true;
                self.position
            }
            ElementState::Released => {
                self.is_pressed = false;
                None
            }
        }
    }
}

/// Converts a top-left-origin pixel position to the lower-left-origin space
/// the fragment shader expects.
fn to_lower_left(position: PhysicalPosition<f64>, surface_height: f32) -> [f32; 2] {
    [position.x as f32, surface_height - position.y as f32]
}

/// Opens the preview window, builds the GL context, and drives the scene
/// until the window closes.
pub fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window_builder = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size);

    let template = ConfigTemplateBuilder::new().with_depth_size(24);
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let (window, gl_config) = display_builder
        .build(&event_loop, template, |mut configs| {
            configs
                .next()
                .expect("no OpenGL framebuffer configurations available")
        })
        .map_err(|err| anyhow!("failed to create window and GL display: {err}"))?;
    let window = window.context("display builder returned no window")?;

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    // Prefer a desktop core context; fall back to the embedded API, which
    // changes the version directive the program builder injects.
    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let fallback_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::Gles(None))
        .build(Some(raw_window_handle));
    let not_current = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .or_else(|_| gl_display.create_context(&gl_config, &fallback_attributes))
    }
    .context("failed to create GL context")?;

    let surface_attributes =
        window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new());
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
        .context("failed to create window surface")?;
    let context = not_current
        .make_current(&surface)
        .context("failed to make GL context current")?;

    if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
        warn!(error = %err, "failed to enable vsync; frames may tear");
    }

    let api = match context.context_api() {
        ContextApi::Gles(_) => ShadingApi::Es,
        _ => ShadingApi::Core,
    };
    info!(?api, "created GL context");

    let gl = Arc::new(unsafe {
        glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
    });

    let shell: Box<dyn SurfaceControl> = Box::new(GlutinSurface { context, surface });

    // The driver starts empty so a redraw delivered before construction
    // completes is a guaranteed no-op.
    let mut driver = RenderDriver::new();
    let scene = SceneRenderer::new(gl, None, api, &config.scene)?;
    driver.install(scene);

    let initial = window.inner_size();
    shell.resize_surface(initial);
    driver.resize(initial.width, initial.height);

    let mut pointer = PointerState::default();
    let mut surface_height = initial.height as f32;

    window.request_redraw();
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                        WindowEvent::Resized(new_size) => {
                            surface_height = new_size.height as f32;
                            shell.resize_surface(new_size);
                            driver.resize(new_size.width, new_size.height);
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            if let Some(active) = pointer.cursor_moved(position) {
                                let coords = to_lower_left(active, surface_height);
                                driver.set_pointer(coords[0], coords[1]);
                            }
                        }
                        WindowEvent::MouseInput {
                            state,
                            button: MouseButton::Left,
                            ..
                        } => {
                            if let Some(position) = pointer.button(state) {
                                let coords = to_lower_left(position, surface_height);
                                driver.set_pointer(coords[0], coords[1]);
                            }
                        }
                        WindowEvent::Touch(touch) => {
                            if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                                let coords = to_lower_left(touch.location, surface_height);
                                driver.set_pointer(coords[0], coords[1]);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Err(err) = shell.make_current() {
                                warn!(error = %err, "skipping frame");
                                return;
                            }
                            if driver.draw() == DrawOutcome::Rendered {
                                if let Err(err) = shell.present() {
                                    warn!(error = %err, "failed to present frame");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Schedule the next frame once winit is about to wait;
                    // the vsync'd swap above provides the pacing.
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}
