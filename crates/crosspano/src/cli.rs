use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "crosspano",
    author,
    version,
    about = "Renders a horizontal-cross HDR cubemap panorama with a single full-screen triangle"
)]
pub struct Args {
    /// Scene directory containing a `scene.toml` (defaults to the bundled
    /// horizontal-cross scene).
    #[arg(value_name = "SCENE")]
    pub scene: Option<PathBuf>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Override the panorama named by the scene manifest (base name +
    /// extension, resolved through the asset roots).
    #[arg(long, value_name = "FILE")]
    pub texture: Option<String>,

    /// Treat the texture override as a standard (non-HDR) image.
    #[arg(long, requires = "texture")]
    pub ldr: bool,

    /// Window title override.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Parses a `WxH` size specification.
pub fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_sizes() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 1920 X 1080 ").unwrap(), (1920, 1080));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("1280x0").is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_surface_size("1280").is_err());
    }
}
