//! Model file parsing.
//!
//! Both loaders flatten a file into a list of triangle meshes with per-vertex
//! normals and one base color each. glTF node transforms are baked into the
//! vertices so the result can be placed with a single object transform.

use std::{fs, path::Path};

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::error::AssetLoadError;

const DEFAULT_BASE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// One triangle mesh in CPU memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

/// A parsed model file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

/// Loads a model, choosing the parser from the file extension.
pub fn load_model(path: &Path) -> Result<ModelData, AssetLoadError> {
    fs::metadata(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let model = match extension.as_deref() {
        Some("obj") => load_obj(path)?,
        Some("glb") | Some("gltf") => load_gltf(path)?,
        _ => {
            return Err(AssetLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    if model.meshes.is_empty() {
        return Err(AssetLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "Parsed '{}': {} meshes, {} vertices, {} triangles",
        model.name,
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count()
    );

    Ok(model)
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("model")
        .to_string()
}

fn load_obj(path: &Path) -> Result<ModelData, AssetLoadError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetLoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::debug!("No MTL for '{}' ({}), using default color", path.display(), err);
        Vec::new()
    });

    let mut meshes = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        if mesh.indices.is_empty() {
            continue;
        }

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        // Use normals from the file if they line up with positions
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            compute_vertex_normals(&positions, &mesh.indices)
        };

        let base_color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(|mtl| {
                let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
                [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)]
            })
            .unwrap_or(DEFAULT_BASE_COLOR);

        meshes.push(MeshData {
            positions,
            normals,
            indices: mesh.indices.clone(),
            base_color,
        });
    }

    Ok(ModelData {
        name: model_name(path),
        meshes,
    })
}

fn load_gltf(path: &Path) -> Result<ModelData, AssetLoadError> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|source| AssetLoadError::Gltf {
            path: path.to_path_buf(),
            source,
        })?;

    let mut meshes = Vec::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_gltf_node(&node, Matrix4::identity(), &buffers, &mut meshes);
        }
    }

    Ok(ModelData {
        name: model_name(path),
        meshes,
    })
}

fn collect_gltf_node(
    node: &gltf::Node,
    parent: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = normal_matrix(&world);

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }

            let reader = primitive
                .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions
                .map(|p| {
                    let p = world * Vector4::new(p[0], p[1], p[2], 1.0);
                    [p.x, p.y, p.z]
                })
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let normals = match reader.read_normals() {
                Some(normals) => normals
                    .map(|n| {
                        let n = (normal_matrix * Vector3::from(n)).normalize();
                        [n.x, n.y, n.z]
                    })
                    .collect(),
                None => compute_vertex_normals(&positions, &indices),
            };

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            meshes.push(MeshData {
                positions,
                normals,
                indices,
                base_color,
            });
        }
    }

    for child in node.children() {
        collect_gltf_node(&child, world, buffers, meshes);
    }
}

fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}

/// Averages adjacent face normals into per-vertex normals.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }

        let v0 = Vector3::from(positions[i0]);
        let v1 = Vector3::from(positions[i1]);
        let v2 = Vector3::from(positions[i2]);
        let face_normal = (v1 - v0).cross(v2 - v0);

        sums[i0] += face_normal;
        sums[i1] += face_normal;
        sums[i2] += face_normal;
    }

    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mallow-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_obj_triangle_computes_normals() {
        let path = write_temp(
            "triangle.obj",
            "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );

        let model = load_model(&path).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.triangle_count(), 1);

        let mesh = &model.meshes[0];
        for normal in &mesh.normals {
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
        assert_eq!(mesh.base_color, DEFAULT_BASE_COLOR);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_model(Path::new("./no/such/model.glb")).unwrap_err();
        assert!(matches!(err, AssetLoadError::Io { .. }));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let path = write_temp("model.fbx", "not a model");
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, AssetLoadError::UnsupportedFormat { .. }));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_obj_without_faces_is_empty() {
        let path = write_temp("points.obj", "v 0 0 0\nv 1 0 0\n");
        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, AssetLoadError::Empty { .. }));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_vertex_normals_average_shared_faces() {
        // Two triangles folded along the x axis, facing +Z and +Y
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        let indices = [0, 1, 2, 0, 1, 3];
        let normals = compute_vertex_normals(&positions, &indices);

        let shared = Vector3::from(normals[0]);
        assert!((shared.magnitude() - 1.0).abs() < 1e-6);
        assert!(shared.y > 0.0 && shared.z > 0.0);
        assert_eq!(normals[2], [0.0, 0.0, 1.0]);
    }
}
