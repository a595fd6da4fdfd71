use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Which shader stage an asset lookup or load was performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal asset failures. The demo has no degraded mode without its single
/// shader pair and panorama, so each category maps to a distinct process
/// exit status.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("HDR panorama '{name}' was not found in any asset root")]
    MissingHdrTexture { name: String },
    #[error("texture '{name}' was not found in any asset root")]
    MissingTexture { name: String },
    #[error("{stage} shader '{name}' was not found in any asset root")]
    MissingShader { stage: ShaderStage, name: String },
    #[error("failed to read {stage} shader at {path}: {source}")]
    UnreadableShader {
        stage: ShaderStage,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("asset name '{name}' must be of the form <base>.<extension>")]
    MalformedName { name: String },
}

impl AssetError {
    /// Process exit status for this failure category.
    pub fn exit_code(&self) -> i32 {
        match self {
            AssetError::MissingHdrTexture { .. } => 1,
            AssetError::MissingTexture { .. } => 2,
            AssetError::MissingShader { .. } | AssetError::UnreadableShader { .. } => 3,
            AssetError::MalformedName { .. } => 4,
        }
    }
}

/// Ordered list of directories that asset lookups walk through.
///
/// Roots earlier in the list shadow later ones, so a scene directory can
/// override a shader that also ships with the installed defaults.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    roots: Vec<PathBuf>,
}

impl AssetCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Prepends a root so it takes precedence over the existing ones.
    pub fn push_front(&mut self, root: PathBuf) {
        self.roots.insert(0, root);
    }

    /// Splits `name` into base and extension, rejecting names that carry no
    /// extension at all.
    fn split_name<'n>(&self, name: &'n str) -> Result<(&'n str, &'n str), AssetError> {
        match name.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() && !ext.is_empty() => Ok((base, ext)),
            _ => Err(AssetError::MalformedName {
                name: name.to_string(),
            }),
        }
    }

    /// Resolves `name` (base + extension) against the search roots in order.
    fn find(&self, name: &str) -> Result<Option<PathBuf>, AssetError> {
        let (base, ext) = self.split_name(name)?;
        let file_name = format!("{base}.{ext}");
        for root in &self.roots {
            let candidate = root.join(&file_name);
            if candidate.is_file() {
                debug!(asset = name, path = %candidate.display(), "resolved asset");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Locates a texture file, classifying a miss by the HDR flag so the
    /// caller exits with the right status.
    pub fn locate_texture(&self, name: &str, hdr: bool) -> Result<PathBuf, AssetError> {
        match self.find(name)? {
            Some(path) => Ok(path),
            None if hdr => Err(AssetError::MissingHdrTexture {
                name: name.to_string(),
            }),
            None => Err(AssetError::MissingTexture {
                name: name.to_string(),
            }),
        }
    }

    /// Locates a shader source file for the given stage.
    pub fn locate_shader(&self, name: &str, stage: ShaderStage) -> Result<PathBuf, AssetError> {
        match self.find(name)? {
            Some(path) => Ok(path),
            None => Err(AssetError::MissingShader {
                stage,
                name: name.to_string(),
            }),
        }
    }

    /// Locates and reads a shader source as text.
    pub fn load_shader_source(
        &self,
        name: &str,
        stage: ShaderStage,
    ) -> Result<String, AssetError> {
        let path = self.locate_shader(name, stage)?;
        fs::read_to_string(&path).map_err(|source| AssetError::UnreadableShader {
            stage,
            path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_with(files: &[(&str, &str)]) -> (TempDir, AssetCatalog) {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let catalog = AssetCatalog::new(vec![dir.path().to_path_buf()]);
        (dir, catalog)
    }

    #[test]
    fn locates_texture_by_base_name_and_extension() {
        let (_dir, catalog) = catalog_with(&[("HorizontalCross.hdr", "not-a-real-hdr")]);
        let path = catalog.locate_texture("HorizontalCross.hdr", true).unwrap();
        assert!(path.ends_with("HorizontalCross.hdr"));
    }

    #[test]
    fn earlier_roots_shadow_later_ones() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("Shader.glsl"), "first").unwrap();
        fs::write(second.path().join("Shader.glsl"), "second").unwrap();

        let catalog = AssetCatalog::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let source = catalog
            .load_shader_source("Shader.glsl", ShaderStage::Vertex)
            .unwrap();
        assert_eq!(source, "first");
    }

    #[test]
    fn missing_hdr_texture_uses_exit_code_one() {
        let (_dir, catalog) = catalog_with(&[]);
        let err = catalog.locate_texture("Missing.hdr", true).unwrap_err();
        assert!(matches!(err, AssetError::MissingHdrTexture { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_standard_texture_uses_exit_code_two() {
        let (_dir, catalog) = catalog_with(&[]);
        let err = catalog.locate_texture("Missing.png", false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_shader_reports_stage_and_exit_code_three() {
        let (_dir, catalog) = catalog_with(&[]);
        let err = catalog
            .locate_shader("FragmentShader.glsl", ShaderStage::Fragment)
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("fragment"));
    }

    #[test]
    fn name_without_extension_is_rejected() {
        let (_dir, catalog) = catalog_with(&[]);
        let err = catalog.locate_texture("NoExtension", true).unwrap_err();
        assert!(matches!(err, AssetError::MalformedName { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
