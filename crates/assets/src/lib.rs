//! Asset resolution for crosspano scenes.
//!
//! A scene is a directory holding a `scene.toml` manifest plus the shader
//! sources and panorama image it names. Assets are always referenced by base
//! name + extension (`HorizontalCross.hdr`, `FragmentShader.glsl`) and looked
//! up across an ordered list of search roots, mirroring how the renderer's
//! packaged samples resolve bundle resources.
//!
//! Missing assets are unrecoverable for a demo that has exactly one shader
//! pair and one texture, so every miss carries a category-specific process
//! exit code (see [`AssetError::exit_code`]).

mod catalog;
mod manifest;

pub use catalog::{AssetCatalog, AssetError, ShaderStage};
pub use manifest::{SceneManifest, TextureRef, MANIFEST_FILE_NAME};
