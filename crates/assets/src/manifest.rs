//! Defines the `scene.toml` schema for crosspano scenes so the CLI and the
//! renderer agree on which shader pair and panorama a scene pulls in. The
//! original samples hard-coded these file names; here they are data with serde
//! defaults that tolerate sparse manifests.
//!
//! Types:
//!
//! - `SceneManifest` names the vertex/fragment sources and the texture.
//! - `TextureRef` pairs a texture file name with its HDR flag.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name a scene directory is expected to carry.
pub const MANIFEST_FILE_NAME: &str = "scene.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SceneManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_vertex")]
    pub vertex: String,
    #[serde(default = "default_fragment")]
    pub fragment: String,
    pub texture: TextureRef,
}

fn default_vertex() -> String {
    "VertexShader.glsl".to_string()
}

fn default_fragment() -> String {
    "FragmentShader.glsl".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TextureRef {
    /// Base name + extension, resolved through the asset catalog.
    pub file: String,
    /// Radiance float RGB when true, 8-bit RGBA otherwise.
    #[serde(default = "default_hdr")]
    pub hdr: bool,
}

fn default_hdr() -> bool {
    true
}

impl SceneManifest {
    /// Parses a manifest from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse scene manifest")
    }

    /// Loads `scene.toml` from a scene directory.
    pub fn load(scene_dir: &Path) -> Result<Self> {
        let path = scene_dir.join(MANIFEST_FILE_NAME);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scene manifest at {}", path.display()))?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_manifest() {
        let manifest = SceneManifest::from_toml(
            r#"
            name = "horizontal-cross"
            vertex = "Tri.glsl"
            fragment = "Cross.glsl"

            [texture]
            file = "HorizontalCross.hdr"
            hdr = true
            "#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("horizontal-cross"));
        assert_eq!(manifest.vertex, "Tri.glsl");
        assert_eq!(manifest.fragment, "Cross.glsl");
        assert_eq!(manifest.texture.file, "HorizontalCross.hdr");
        assert!(manifest.texture.hdr);
    }

    #[test]
    fn sparse_manifest_falls_back_to_default_shader_names() {
        let manifest = SceneManifest::from_toml(
            r#"
            [texture]
            file = "Panorama.hdr"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.vertex, "VertexShader.glsl");
        assert_eq!(manifest.fragment, "FragmentShader.glsl");
        assert!(manifest.texture.hdr);
    }

    #[test]
    fn manifest_without_texture_is_rejected() {
        assert!(SceneManifest::from_toml("name = \"x\"").is_err());
    }
}
