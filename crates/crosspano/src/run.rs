use std::path::PathBuf;

use anyhow::{bail, Result};
use assets::{AssetCatalog, SceneManifest, ShaderStage, MANIFEST_FILE_NAME};
use renderer::{Renderer, RendererConfig, SceneConfig, TextureSource};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, Args};
use crate::paths::AppPaths;

/// Scene used when the CLI names none.
const DEFAULT_SCENE: &str = "horizontal-cross";

/// Repo-relative scene location so a checkout runs without installing.
const BUNDLED_SCENE_ROOT: &str = "assets/scenes";

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    let scene_dir = resolve_scene_dir(&args, &paths)?;
    info!(scene = %scene_dir.display(), "loading scene");

    let manifest = SceneManifest::load(&scene_dir)?;

    let mut catalog = AssetCatalog::new(paths.scene_roots());
    catalog.push_front(scene_dir.clone());

    let vertex_shader = catalog.locate_shader(&manifest.vertex, ShaderStage::Vertex)?;
    let fragment_shader = catalog.locate_shader(&manifest.fragment, ShaderStage::Fragment)?;

    let (texture_name, hdr) = match args.texture.as_deref() {
        Some(name) => (name, !args.ldr),
        None => (manifest.texture.file.as_str(), manifest.texture.hdr),
    };
    let texture_path = catalog.locate_texture(texture_name, hdr)?;

    let surface_size = args
        .size
        .as_deref()
        .map(parse_surface_size)
        .transpose()?
        .unwrap_or((1280, 720));

    let window_title = args
        .title
        .clone()
        .or_else(|| manifest.name.clone())
        .unwrap_or_else(|| "crosspano".to_string());

    debug!(
        vertex = %vertex_shader.display(),
        fragment = %fragment_shader.display(),
        texture = %texture_path.display(),
        hdr,
        "resolved scene assets"
    );

    let config = RendererConfig {
        surface_size,
        window_title,
        scene: SceneConfig {
            vertex_shader,
            fragment_shader,
            texture: TextureSource {
                path: texture_path,
                hdr,
            },
        },
    };

    let mut renderer = Renderer::new(config);
    renderer.run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn resolve_scene_dir(args: &Args, paths: &AppPaths) -> Result<PathBuf> {
    if let Some(dir) = args.scene.as_ref() {
        if dir.join(MANIFEST_FILE_NAME).is_file() {
            return Ok(dir.clone());
        }
        bail!(
            "scene directory {} does not contain a {}",
            dir.display(),
            MANIFEST_FILE_NAME
        );
    }

    let mut candidates: Vec<PathBuf> = paths
        .scene_roots()
        .into_iter()
        .map(|root| root.join(DEFAULT_SCENE))
        .collect();
    candidates.push(PathBuf::from(BUNDLED_SCENE_ROOT).join(DEFAULT_SCENE));

    for candidate in &candidates {
        if candidate.join(MANIFEST_FILE_NAME).is_file() {
            debug!(scene = %candidate.display(), "resolved default scene");
            return Ok(candidate.clone());
        }
    }

    bail!("no scene specified and the default '{DEFAULT_SCENE}' scene was not found in any scene root")
}
