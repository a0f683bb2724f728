use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use vista_common::Aabb;

/// Indexed triangle mesh in the layout the GPU backend uploads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Local-space bounds of every vertex.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().map(|p| Vec3::from_array(*p)))
    }

    /// Area-weighted smooth normals, accumulated per vertex.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}

/// Axis-aligned box centered on the origin, four vertices per face.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]], [ 0.0,  0.0,  1.0]),
        ([[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]], [ 0.0,  0.0, -1.0]),
        ([[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]], [ 1.0,  0.0,  0.0]),
        ([[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]], [-1.0,  0.0,  0.0]),
        ([[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]], [ 0.0,  1.0,  0.0]),
        ([[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]], [ 0.0, -1.0,  0.0]),
    ];
    let face_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut mesh = MeshData::default();
    for (corners, normal) in faces {
        let base = mesh.positions.len() as u32;
        for (corner, uv) in corners.iter().zip(face_uvs) {
            mesh.positions
                .push([corner[0] * width, corner[1] * height, corner[2] * depth]);
            mesh.normals.push(normal);
            mesh.uvs.push(uv);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// UV sphere. Longitude runs over `width_segments`, latitude over
/// `height_segments`; the poles collapse to degenerate-free fans.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            row.push(mesh.positions.len() as u32);
            mesh.positions.push((normal * radius).to_array());
            mesh.normals.push(normal.to_array());
            mesh.uvs.push([u, 1.0 - v]);
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Single quad in the XY plane facing +Z.
pub fn plane_geometry(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    MeshData {
        positions: vec![[-hw, hh, 0.0], [hw, hh, 0.0], [-hw, -hh, 0.0], [hw, -hh, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_counts_and_bounds() {
        let mesh = box_geometry(100.0, 100.0, 100.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let b = mesh.bounds();
        assert_eq!(b.min, Vec3::splat(-50.0));
        assert_eq!(b.max, Vec3::splat(50.0));
    }

    #[test]
    fn box_faces_wind_outward() {
        let mesh = box_geometry(1.0, 2.0, 3.0);
        for tri in mesh.indices.chunks_exact(3) {
            let pa = Vec3::from_array(mesh.positions[tri[0] as usize]);
            let pb = Vec3::from_array(mesh.positions[tri[1] as usize]);
            let pc = Vec3::from_array(mesh.positions[tri[2] as usize]);
            let face_normal = (pb - pa).cross(pc - pa).normalize();
            let stored = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(face_normal.dot(stored) > 0.99);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = sphere_geometry(50.0, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        // Pole rows contribute one triangle per segment instead of two.
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);
        for p in &mesh.positions {
            assert!((Vec3::from_array(*p).length() - 50.0).abs() < 1e-3);
        }
        let b = mesh.bounds();
        assert!((b.max.y - 50.0).abs() < 1e-3);
        assert!((b.min.y + 50.0).abs() < 1e-3);
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = plane_geometry(4000.0, 4000.0);
        let b = mesh.bounds();
        assert_eq!(b.size(), Vec3::new(4000.0, 4000.0, 0.0));
        let pa = Vec3::from_array(mesh.positions[0]);
        let pb = Vec3::from_array(mesh.positions[2]);
        let pc = Vec3::from_array(mesh.positions[1]);
        assert!((pb - pa).cross(pc - pa).z > 0.0);
    }

    #[test]
    fn computed_normals_match_flat_quad() {
        let mut mesh = plane_geometry(2.0, 2.0);
        mesh.normals.clear();
        mesh.compute_vertex_normals();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }
}
