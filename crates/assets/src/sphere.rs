use crate::tangents::compute_tangents;
use glam::{Vec2, Vec3};
use shellfur_common::{Mesh, Vertex};
use std::f32::consts::{PI, TAU};

/// UV sphere with `(stacks + 1) * (slices + 1)` vertices.
///
/// Rows run from the north pole to the south pole; the seam column is
/// duplicated so `u` spans the full `[0, 1]` range. `v` is stored flipped,
/// like OBJ texture coordinates, so the north pole samples the bottom row of
/// a top-down image.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Mesh {
    let stacks = stacks.max(2);
    let slices = slices.max(3);

    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for i in 0..=stacks {
        let along = i as f32 / stacks as f32;
        let phi = along * PI;
        let v = 1.0 - along;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let theta = u * TAU;
            let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            vertices.push(Vertex::new(dir * radius, dir.normalize(), Vec2::new(u, v)));
        }
    }

    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;
            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    let mut mesh = Mesh {
        name: "sphere".into(),
        vertices,
        indices,
        textures: Vec::new(),
    };
    compute_tangents(&mut mesh);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let mesh = uv_sphere(1.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), 32 * 32 * 6);
        assert_eq!(mesh.triangle_count(), 2048);
    }

    #[test]
    fn indices_in_range() {
        let mesh = uv_sphere(1.0, 8, 12);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn vertices_lie_on_sphere_with_outward_normals() {
        let radius = 2.5;
        let mesh = uv_sphere(radius, 16, 24);
        for v in &mesh.vertices {
            assert!((v.position().length() - radius).abs() < 1e-4);
            assert!((v.normal().length() - 1.0).abs() < 1e-4);
            assert!(v.normal().dot(v.position()) > 0.0);
            let uv = v.uv();
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn poles_and_bounds() {
        let mesh = uv_sphere(1.0, 32, 32);
        assert!(mesh.vertices[0].position().abs_diff_eq(Vec3::Y, 1e-6));
        let last = mesh.vertices.last().unwrap();
        assert!(last.position().abs_diff_eq(Vec3::NEG_Y, 1e-5));
        let (min, max) = mesh.bounds().unwrap();
        assert!(min.abs_diff_eq(Vec3::splat(-1.0), 1e-3));
        assert!(max.abs_diff_eq(Vec3::splat(1.0), 1e-3));
    }

    #[test]
    fn north_pole_maps_to_image_bottom() {
        let mesh = uv_sphere(1.0, 8, 8);
        assert_eq!(mesh.vertices[0].uv().y, 1.0);
        assert_eq!(mesh.vertices.last().unwrap().uv().y, 0.0);
        // Equator row sits halfway either way.
        assert_eq!(mesh.vertices[(4 * 9) as usize].uv().y, 0.5);
    }

    #[test]
    fn degenerate_subdivisions_are_raised() {
        let mesh = uv_sphere(1.0, 0, 1);
        assert_eq!(mesh.vertices.len(), 3 * 4);
    }

    #[test]
    fn tangents_follow_longitude() {
        let mesh = uv_sphere(1.0, 32, 32);
        // Equator vertex at theta = 0: position (1, 0, 0), u grows toward +z.
        let equator = &mesh.vertices[(16 * 33) as usize];
        let t = Vec3::from_array(equator.tangent);
        assert!(t.abs_diff_eq(Vec3::Z, 0.05), "{t}");
    }
}
