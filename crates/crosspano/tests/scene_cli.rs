use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const MANIFEST: &str = r#"
name = "test-scene"

[texture]
file = "Panorama.hdr"
hdr = true
"#;

fn write_scene(dir: &Path, with_vertex: bool, with_fragment: bool, with_texture: bool) {
    fs::write(dir.join("scene.toml"), MANIFEST).unwrap();
    if with_vertex {
        fs::write(dir.join("VertexShader.glsl"), "void main() {}\n").unwrap();
    }
    if with_fragment {
        fs::write(dir.join("FragmentShader.glsl"), "void main() {}\n").unwrap();
    }
    if with_texture {
        fs::write(dir.join("Panorama.hdr"), "placeholder").unwrap();
    }
}

fn crosspano(scene: &Path, roots: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_crosspano"));
    command
        .env("CROSSPANO_CONFIG_DIR", roots.path().join("config"))
        .env("CROSSPANO_DATA_DIR", roots.path().join("data"))
        .env("CROSSPANO_SHARE_DIR", roots.path().join("share"))
        .arg(scene);
    command
}

#[test]
fn missing_hdr_panorama_exits_with_code_one() {
    let roots = TempDir::new().unwrap();
    let scene = TempDir::new().unwrap();
    write_scene(scene.path(), true, true, false);

    let status = crosspano(scene.path(), &roots)
        .status()
        .expect("failed to run crosspano");

    assert_eq!(status.code(), Some(1));
}

#[test]
fn missing_shader_source_exits_with_code_three() {
    let roots = TempDir::new().unwrap();
    let scene = TempDir::new().unwrap();
    write_scene(scene.path(), true, false, true);

    let status = crosspano(scene.path(), &roots)
        .status()
        .expect("failed to run crosspano");

    assert_eq!(status.code(), Some(3));
}

#[test]
fn scene_directory_without_manifest_is_rejected() {
    let roots = TempDir::new().unwrap();
    let scene = TempDir::new().unwrap();

    let status = crosspano(scene.path(), &roots)
        .status()
        .expect("failed to run crosspano");

    assert!(!status.success());
}

#[test]
fn zero_sized_surface_is_rejected() {
    let roots = TempDir::new().unwrap();
    let scene = TempDir::new().unwrap();
    write_scene(scene.path(), true, true, true);

    let status = crosspano(scene.path(), &roots)
        .args(["--size", "0x720"])
        .status()
        .expect("failed to run crosspano");

    assert!(!status.success());
}
