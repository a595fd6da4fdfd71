//! Panorama texture loading.
//!
//! The HDR path decodes a Radiance (`.hdr`) file into float RGB texels and
//! uploads them as `RGB32F`; the standard path decodes PNG/JPEG into RGBA8.
//! Both paths flip the image so the texture origin sits at the lower left,
//! matching the UVs the vertex stage derives procedurally.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use glow::HasContext;
use image::imageops::flip_vertical_in_place;
use tracing::info;

/// A texture file plus the flag selecting the decode path.
#[derive(Debug, Clone)]
pub struct TextureSource {
    pub path: PathBuf,
    pub hdr: bool,
}

/// CPU-side texel storage produced by the decoders.
#[derive(Debug, Clone)]
enum Texels {
    /// Tightly packed RGB float triples, bottom row first.
    FloatRgb(Vec<f32>),
    /// Tightly packed RGBA bytes, bottom row first.
    Rgba8(Vec<u8>),
}

/// Decoded image ready for upload, with its pixel resolution.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    texels: Texels,
}

/// Decodes a Radiance HDR file into bottom-left-origin float RGB texels.
pub fn decode_hdr(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode HDR panorama at {}", path.display()))?;
    let mut rgb = image.into_rgb32f();
    flip_vertical_in_place(&mut rgb);
    let (width, height) = rgb.dimensions();
    Ok(DecodedImage {
        width,
        height,
        texels: Texels::FloatRgb(rgb.into_raw()),
    })
}

/// Decodes a standard (PNG/JPEG) file into bottom-left-origin RGBA8 texels.
pub fn decode_standard(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode texture at {}", path.display()))?;
    let mut rgba = image.into_rgba8();
    flip_vertical_in_place(&mut rgba);
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        texels: Texels::Rgba8(rgba.into_raw()),
    })
}

/// GPU texture handle plus the resolution reported by the decoder.
pub struct SceneTexture {
    raw: glow::Texture,
    width: u32,
    height: u32,
}

impl SceneTexture {
    /// Decodes `source` and uploads it to a 2D texture.
    pub fn load(gl: &glow::Context, source: &TextureSource) -> Result<Self> {
        let decoded = if source.hdr {
            decode_hdr(&source.path)?
        } else {
            decode_standard(&source.path)?
        };
        let texture = Self::upload(gl, &decoded)?;
        info!(
            path = %source.path.display(),
            width = texture.width,
            height = texture.height,
            hdr = source.hdr,
            "loaded panorama texture"
        );
        Ok(texture)
    }

    /// Uploads decoded texels to a new 2D texture with linear filtering and
    /// edge clamping.
    pub fn upload(gl: &glow::Context, decoded: &DecodedImage) -> Result<Self> {
        let raw = unsafe { gl.create_texture() }
            .map_err(|err| anyhow::anyhow!("failed to create texture object: {err}"))?;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(raw));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );

            match &decoded.texels {
                Texels::FloatRgb(pixels) => {
                    gl.tex_image_2d(
                        glow::TEXTURE_2D,
                        0,
                        glow::RGB32F as i32,
                        decoded.width as i32,
                        decoded.height as i32,
                        0,
                        glow::RGB,
                        glow::FLOAT,
                        Some(bytemuck::cast_slice(pixels)),
                    );
                }
                Texels::Rgba8(pixels) => {
                    gl.tex_image_2d(
                        glow::TEXTURE_2D,
                        0,
                        glow::RGBA8 as i32,
                        decoded.width as i32,
                        decoded.height as i32,
                        0,
                        glow::RGBA,
                        glow::UNSIGNED_BYTE,
                        Some(pixels),
                    );
                }
            }
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(Self {
            raw,
            width: decoded.width,
            height: decoded.height,
        })
    }

    pub fn raw(&self) -> glow::Texture {
        self.raw
    }

    /// Decoded resolution in pixels.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_texture(self.raw);
        }
    }
}
