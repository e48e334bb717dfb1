use crate::AssetError;
use crate::tangents::{compute_normals, compute_tangents};
use glam::{Vec2, Vec3};
use shellfur_common::{Mesh, TextureKind, TextureRef, Vertex};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Meshes imported from one model file.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Directory texture paths are resolved against.
    pub directory: PathBuf,
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// All meshes flattened into one, for the single shell draw.
    pub fn merged(&self) -> Mesh {
        let mut out = Mesh {
            name: self
                .meshes
                .first()
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            ..Mesh::default()
        };
        for mesh in &self.meshes {
            let base = out.vertices.len() as u32;
            out.vertices.extend_from_slice(&mesh.vertices);
            out.indices.extend(mesh.indices.iter().map(|i| i + base));
            for tex in &mesh.textures {
                if !out.textures.contains(tex) {
                    out.textures.push(tex.clone());
                }
            }
        }
        out
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Import a Wavefront OBJ file along with its material library.
///
/// A missing or broken material library is logged and the meshes are
/// returned without texture references.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Model, AssetError> {
    let path = path.as_ref();
    let (models, materials) =
        tobj::load_obj(path, &load_options()).map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;
    let materials = materials.unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), "material library not loaded: {err}");
        Vec::new()
    });
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let model = build_model(directory, models, &materials);
    if model.meshes.is_empty() {
        return Err(AssetError::EmptyModel(path.to_path_buf()));
    }
    tracing::info!(
        path = %path.display(),
        meshes = model.meshes.len(),
        vertices = model.vertex_count(),
        triangles = model.triangle_count(),
        "model loaded"
    );
    Ok(model)
}

/// Import OBJ text without a material library.
pub fn parse_obj(source: impl BufRead, name: &str) -> Result<Model, AssetError> {
    let mut reader = source;
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Ok((Vec::new(), HashMap::new()))
    })
    .map_err(|source| AssetError::Obj {
        path: PathBuf::from(name),
        source,
    })?;
    let model = build_model(PathBuf::new(), models, &[]);
    if model.meshes.is_empty() {
        return Err(AssetError::EmptyModel(PathBuf::from(name)));
    }
    Ok(model)
}

fn build_model(directory: PathBuf, models: Vec<tobj::Model>, materials: &[tobj::Material]) -> Model {
    let meshes = models
        .into_iter()
        .filter(|m| !m.mesh.positions.is_empty() && !m.mesh.indices.is_empty())
        .map(|m| convert_mesh(m, materials))
        .collect();
    Model { directory, meshes }
}

fn convert_mesh(model: tobj::Model, materials: &[tobj::Material]) -> Mesh {
    let src = &model.mesh;
    let count = src.positions.len() / 3;
    let has_normals = src.normals.len() == src.positions.len();
    let has_uvs = src.texcoords.len() / 2 == count;

    let vertices = (0..count)
        .map(|i| {
            let position = Vec3::from_slice(&src.positions[i * 3..i * 3 + 3]);
            let normal = if has_normals {
                Vec3::from_slice(&src.normals[i * 3..i * 3 + 3])
            } else {
                Vec3::ZERO
            };
            // OBJ puts v = 0 at the bottom; textures are stored top row first.
            let uv = if has_uvs {
                Vec2::new(src.texcoords[i * 2], 1.0 - src.texcoords[i * 2 + 1])
            } else {
                Vec2::ZERO
            };
            Vertex::new(position, normal, uv)
        })
        .collect();

    let textures = src
        .material_id
        .and_then(|id| materials.get(id))
        .map(material_textures)
        .unwrap_or_default();

    let mut mesh = Mesh {
        name: model.name,
        vertices,
        indices: src.indices.clone(),
        textures,
    };
    if !has_normals {
        compute_normals(&mut mesh);
    }
    compute_tangents(&mut mesh);
    mesh
}

fn material_textures(material: &tobj::Material) -> Vec<TextureRef> {
    [
        (TextureKind::Diffuse, &material.diffuse_texture),
        (TextureKind::Specular, &material.specular_texture),
        (TextureKind::Normal, &material.normal_texture),
        (TextureKind::Height, &material.ambient_texture),
    ]
    .into_iter()
    .filter_map(|(kind, path)| {
        path.as_ref().map(|p| TextureRef {
            kind,
            path: p.clone(),
        })
    })
    .collect()
}
