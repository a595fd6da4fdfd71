//! Runtime shader program build pipeline.
//!
//! Shader sources ship without a `#version` line; the builder derives one from
//! the live context's `SHADING_LANGUAGE_VERSION` string so the same GLSL runs
//! on desktop core profiles and the embedded API. Compile and link failures
//! are diagnostic-only: the full info log is emitted through `tracing` and the
//! program handle is still returned, so a broken shader renders garbage
//! instead of crashing the process.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use assets::{AssetError, ShaderStage};
use glow::HasContext;
use tracing::{debug, error, warn};

/// Vendor prefix the embedded API prepends to its version string.
const ES_VERSION_PREFIX: &str = "OpenGL ES GLSL ES ";

/// Directive fallback when the context reports an unparseable version.
const FALLBACK_VERSION: u32 = 330;

/// Which flavour of the shading language the live context speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingApi {
    /// Desktop core profile; the version token starts the string.
    Core,
    /// Embedded profile; the version token follows a vendor prefix and the
    /// directive needs an ` es` suffix.
    Es,
}

/// Vertex and fragment source files for one program.
#[derive(Debug, Clone)]
pub struct ProgramSources {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Uniform locations resolved once after a successful link.
///
/// A uniform the shader does not declare (or that the compiler eliminated)
/// resolves to `None`; every upload passes the `Option` through, which the GL
/// treats as a no-op.
#[derive(Debug, Clone, Default)]
pub struct UniformLocations {
    pub resolution: Option<glow::UniformLocation>,
    pub mouse: Option<glow::UniformLocation>,
    pub time: Option<glow::UniformLocation>,
}

/// Linked GPU program plus its cached uniform locations.
pub struct ShaderProgram {
    raw: glow::Program,
    pub uniforms: UniformLocations,
    linked: bool,
}

impl ShaderProgram {
    pub fn raw(&self) -> glow::Program {
        self.raw
    }

    /// Whether the link step reported success. A failed link still yields a
    /// handle; draws through it render nothing.
    pub fn linked(&self) -> bool {
        self.linked
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.raw);
        }
    }
}

/// Builds a linked program from the supplied source files.
///
/// Missing or unreadable sources are fatal ([`AssetError`] carries the exit
/// status); compile and link diagnostics are logged and tolerated.
pub fn build_program(
    gl: &glow::Context,
    api: ShadingApi,
    sources: &ProgramSources,
) -> Result<ShaderProgram> {
    let raw_version = unsafe { gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION) };
    let directive = version_directive(&raw_version, api);
    debug!(version = %raw_version, directive = %directive, "derived shading language directive");

    let vertex_source = load_stage_source(&sources.vertex, ShaderStage::Vertex)?;
    let fragment_source = load_stage_source(&sources.fragment, ShaderStage::Fragment)?;

    let program = unsafe { gl.create_program() }
        .map_err(|err| anyhow!("failed to create program object: {err}"))?;

    let vertex_shader = compile_stage(
        gl,
        glow::VERTEX_SHADER,
        ShaderStage::Vertex,
        &prepend_directive(&directive, &vertex_source),
    )?;
    let fragment_shader = compile_stage(
        gl,
        glow::FRAGMENT_SHADER,
        ShaderStage::Fragment,
        &prepend_directive(&directive, &fragment_source),
    )?;

    let linked = unsafe {
        // Attach whatever compiled, then mark the shader objects for deletion;
        // the GL keeps them alive until they are detached from the program.
        if let Some(shader) = vertex_shader {
            gl.attach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if let Some(shader) = fragment_shader {
            gl.attach_shader(program, shader);
            gl.delete_shader(shader);
        }

        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        if !linked {
            let log = gl.get_program_info_log(program);
            error!(log = %log, "program link failed");
        }
        linked
    };

    let uniforms = if linked {
        resolve_uniforms(gl, program)
    } else {
        UniformLocations::default()
    };

    Ok(ShaderProgram {
        raw: program,
        uniforms,
        linked,
    })
}

fn load_stage_source(path: &PathBuf, stage: ShaderStage) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::UnreadableShader {
        stage,
        path: path.clone(),
        source,
    })?;
    Ok(text)
}

fn prepend_directive(directive: &str, source: &str) -> String {
    format!("{directive}\n{source}")
}

/// Compiles one stage, logging the info log on failure and continuing without
/// the shader object (the eventual link will fail and be logged as well).
fn compile_stage(
    gl: &glow::Context,
    kind: u32,
    stage: ShaderStage,
    source: &str,
) -> Result<Option<glow::Shader>> {
    let shader = unsafe { gl.create_shader(kind) }
        .map_err(|err| anyhow!("failed to create {stage} shader object: {err}"))?;

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            error!(%stage, log = %log, "shader compile failed");
            gl.delete_shader(shader);
            return Ok(None);
        }
    }

    Ok(Some(shader))
}

fn resolve_uniforms(gl: &glow::Context, program: glow::Program) -> UniformLocations {
    let locations = unsafe {
        UniformLocations {
            resolution: gl.get_uniform_location(program, "u_resolution"),
            mouse: gl.get_uniform_location(program, "u_mouse"),
            time: gl.get_uniform_location(program, "u_time"),
        }
    };
    if locations.resolution.is_none() || locations.mouse.is_none() || locations.time.is_none() {
        warn!(
            resolution = locations.resolution.is_some(),
            mouse = locations.mouse.is_some(),
            time = locations.time.is_some(),
            "one or more standard uniforms missing; uploads become no-ops"
        );
    }
    locations
}

/// Derives the `#version` directive from a raw `SHADING_LANGUAGE_VERSION`
/// string.
///
/// The embedded API buries the numeric token behind a vendor prefix; the
/// desktop API starts the string with it. `"3.30"` becomes `#version 330` and
/// `"4.1"` becomes `#version 410` (single-digit minors count as tens).
pub fn version_directive(raw: &str, api: ShadingApi) -> String {
    let token = match api {
        ShadingApi::Es => raw.strip_prefix(ES_VERSION_PREFIX).unwrap_or(raw),
        ShadingApi::Core => raw,
    };

    let number = parse_version_number(token).unwrap_or_else(|| {
        warn!(version = %raw, fallback = FALLBACK_VERSION, "unparseable shading language version");
        FALLBACK_VERSION
    });

    match api {
        ShadingApi::Core => format!("#version {number}"),
        ShadingApi::Es => format!("#version {number} es"),
    }
}

/// Parses the leading `<major>.<minor>` token into `major*100 + minor`,
/// normalising single-digit minors ("4.1" reads as minor 10, not 1).
fn parse_version_number(token: &str) -> Option<u32> {
    let lead = token.split_whitespace().next()?;
    let (major, rest) = match lead.split_once('.') {
        Some((major, rest)) => (major, rest),
        None => (lead, ""),
    };

    let major: u32 = major.parse().ok()?;
    let minor_digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let minor = match minor_digits.len() {
        0 => 0,
        1 => minor_digits.parse::<u32>().ok()? * 10,
        _ => minor_digits[..2].parse().ok()?,
    };

    Some(major * 100 + minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_digit_minor_maps_directly() {
        assert_eq!(version_directive("3.30", ShadingApi::Core), "#version 330");
        assert_eq!(version_directive("4.60", ShadingApi::Core), "#version 460");
    }

    #[test]
    fn single_digit_minor_counts_as_tens() {
        assert_eq!(version_directive("4.1", ShadingApi::Core), "#version 410");
    }

    #[test]
    fn trailing_vendor_text_is_ignored() {
        assert_eq!(
            version_directive("4.60 NVIDIA", ShadingApi::Core),
            "#version 460"
        );
    }

    #[test]
    fn embedded_prefix_is_skipped_and_suffix_appended() {
        assert_eq!(
            version_directive("OpenGL ES GLSL ES 3.20", ShadingApi::Es),
            "#version 320 es"
        );
    }

    #[test]
    fn unparseable_version_falls_back() {
        assert_eq!(
            version_directive("garbage", ShadingApi::Core),
            "#version 330"
        );
    }

    #[test]
    fn directive_is_prepended_on_its_own_line() {
        let combined = prepend_directive("#version 330", "void main() {}\n");
        assert!(combined.starts_with("#version 330\nvoid main()"));
    }

    #[test]
    fn missing_minor_reads_as_zero() {
        assert_eq!(parse_version_number("4"), Some(400));
    }
}
