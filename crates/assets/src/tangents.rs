use glam::{Vec2, Vec3};
use shellfur_common::Mesh;

/// Fill per-vertex tangents and bitangents from positions and UVs.
///
/// Triangle tangents are accumulated per vertex, then made orthogonal to
/// the vertex normal. Triangles with a degenerate UV mapping contribute
/// nothing; vertices left without a tangent get an arbitrary one
/// perpendicular to the normal.
pub fn compute_tangents(mesh: &mut Mesh) {
    let count = mesh.vertices.len();
    let mut tangents = vec![Vec3::ZERO; count];
    let mut bitangents = vec![Vec3::ZERO; count];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= count || b >= count || c >= count {
            continue;
        }
        let (va, vb, vc) = (&mesh.vertices[a], &mesh.vertices[b], &mesh.vertices[c]);
        let e1 = vb.position() - va.position();
        let e2 = vc.position() - va.position();
        let d1: Vec2 = vb.uv() - va.uv();
        let d2: Vec2 = vc.uv() - va.uv();
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < 1e-12 || e1.cross(e2).length_squared() < 1e-20 {
            continue;
        }
        let r = 1.0 / det;
        let t = (e1 * d2.y - e2 * d1.y) * r;
        let bt = (e2 * d1.x - e1 * d2.x) * r;
        for i in [a, b, c] {
            tangents[i] += t;
            bitangents[i] += bt;
        }
    }

    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        let n = vertex.normal().try_normalize().unwrap_or(Vec3::Y);
        let t = (tangents[i] - n * n.dot(tangents[i]))
            .try_normalize()
            .unwrap_or_else(|| n.any_orthonormal_vector());
        let mut b = n.cross(t);
        if b.dot(bitangents[i]) < 0.0 {
            b = -b;
        }
        vertex.tangent = t.to_array();
        vertex.bitangent = b.to_array();
    }
}

/// Area-weighted vertex normals, used when an imported mesh has none.
pub fn compute_normals(mesh: &mut Mesh) {
    let count = mesh.vertices.len();
    let mut normals = vec![Vec3::ZERO; count];
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= count || b >= count || c >= count {
            continue;
        }
        let p0 = mesh.vertices[a].position();
        let face = (mesh.vertices[b].position() - p0).cross(mesh.vertices[c].position() - p0);
        for i in [a, b, c] {
            normals[i] += face;
        }
    }
    for (vertex, n) in mesh.vertices.iter_mut().zip(normals) {
        vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
    }
}
