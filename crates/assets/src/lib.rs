//! Asset pipeline: procedural and imported geometry, decoded textures.
//!
//! Loading never aborts the renderer: a model that fails to import is
//! replaced by the procedural sphere and a texture that fails to decode by
//! a visible checker sentinel.

pub mod obj;
pub mod sphere;
pub mod tangents;
pub mod texture;

use shellfur_common::{Mesh, MeshConfig, TextureKind};
use std::path::{Path, PathBuf};

pub use obj::{Model, load_obj, parse_obj};
pub use sphere::uv_sphere;
pub use texture::{TextureData, decode_texture, load_texture, load_texture_or_sentinel};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("image {0} has no pixels")]
    EmptyImage(PathBuf),
    #[error("failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        source: tobj::LoadError,
    },
    #[error("model {0} contains no triangle meshes")]
    EmptyModel(PathBuf),
}

/// Geometry and base texture the shell pass draws.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub mesh: Mesh,
    pub texture: TextureData,
}

/// Resolve the configured mesh and texture, falling back to the procedural
/// sphere and a plain white texture.
///
/// A texture path in the config wins over the model's own diffuse map.
pub fn load_scene_assets(config: &MeshConfig) -> SceneAssets {
    let mut model_texture = None;
    let mesh = match config.model.as_deref() {
        Some(path) => match load_obj(path) {
            Ok(model) => {
                model_texture = model
                    .meshes
                    .iter()
                    .find_map(|m| m.texture(TextureKind::Diffuse))
                    .map(|t| model.directory.join(&t.path));
                model.merged()
            }
            Err(err) => {
                tracing::warn!("{err}; using procedural sphere");
                sphere_from(config)
            }
        },
        None => sphere_from(config),
    };

    let texture = match config.texture.as_deref().map(Path::new).or(model_texture.as_deref()) {
        Some(path) => load_texture_or_sentinel(path),
        None => TextureData::solid("white", [255; 4]),
    };

    SceneAssets { mesh, texture }
}

fn sphere_from(config: &MeshConfig) -> Mesh {
    uv_sphere(config.sphere_radius, config.sphere_stacks, config.sphere_slices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_gives_sphere_and_white() {
        let assets = load_scene_assets(&MeshConfig::default());
        assert_eq!(assets.mesh.name, "sphere");
        assert_eq!(assets.mesh.vertices.len(), 33 * 33);
        assert_eq!(assets.texture, TextureData::solid("white", [255; 4]));
    }

    #[test]
    fn broken_model_falls_back_to_sphere() {
        let dir = tempfile::tempdir().unwrap();
        let config = MeshConfig {
            model: Some(dir.path().join("missing.obj").display().to_string()),
            ..MeshConfig::default()
        };
        let assets = load_scene_assets(&config);
        assert_eq!(assets.mesh.name, "sphere");
    }

    #[test]
    fn broken_texture_uses_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG truncated").unwrap();
        let config = MeshConfig {
            texture: Some(path.display().to_string()),
            ..MeshConfig::default()
        };
        assert!(load_scene_assets(&config).texture.is_sentinel());
    }

    #[test]
    fn model_diffuse_map_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.mtl"), "newmtl m\nmap_Kd absent.png\n").unwrap();
        std::fs::write(
            dir.path().join("m.obj"),
            "mtllib m.mtl\nusemtl m\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();
        let config = MeshConfig {
            model: Some(dir.path().join("m.obj").display().to_string()),
            ..MeshConfig::default()
        };
        let assets = load_scene_assets(&config);
        assert_eq!(assets.mesh.vertices.len(), 3);
        // Named but absent on disk: sentinel rather than plain white.
        assert!(assets.texture.is_sentinel());
    }
}
