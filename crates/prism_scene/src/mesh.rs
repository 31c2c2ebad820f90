//! Polygon mesh primitive.
//!
//! Polygons are triangulated as fans at construction. Normals and texture
//! coordinates are stored per triangle corner so that face-varying data
//! survives triangulation.

use crate::error::{SceneError, SceneResult};
use crate::shape::{Culling, Intersect, ShapeHit};
use crate::triangle::moller_trumbore;
use prism_math::{Aabb, DVec2, DVec3, Ray};
use std::f64::consts::{FRAC_PI_2, PI};

/// A triangle mesh with per-corner normals and texture coordinates.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions
    positions: Vec<DVec3>,

    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,

    /// One normal per entry of `indices`
    corner_normals: Vec<DVec3>,

    /// One texture coordinate per entry of `indices`
    corner_uvs: Vec<DVec2>,

    culling: Culling,

    /// Axis-aligned bounding box
    bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from triangles, with optional per-vertex normals and
    /// texture coordinates.
    ///
    /// Missing normals are replaced by smooth normals averaged from the
    /// adjacent faces.
    pub fn new(
        positions: Vec<DVec3>,
        indices: Vec<u32>,
        normals: Option<Vec<DVec3>>,
        uvs: Option<Vec<DVec2>>,
    ) -> SceneResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        let face_counts = vec![3u32; indices.len() / 3];

        let normals = match normals {
            Some(n) if n.len() != positions.len() => {
                return Err(SceneError::InvalidMesh(format!(
                    "{} normals for {} vertices",
                    n.len(),
                    positions.len()
                )))
            }
            other => other,
        };
        let uvs = match uvs {
            Some(t) if t.len() != positions.len() => {
                return Err(SceneError::InvalidMesh(format!(
                    "{} texture coordinates for {} vertices",
                    t.len(),
                    positions.len()
                )))
            }
            other => other,
        };

        validate_indices(&indices, positions.len())?;
        let normals = normals.map(|n| per_corner(&n, &indices));
        let uvs = uvs.map(|t| per_corner(&t, &indices));
        Self::from_polygons(
            &face_counts,
            &indices,
            positions,
            normals.as_deref(),
            uvs.as_deref(),
        )
    }

    /// Build a mesh from arbitrary polygons.
    ///
    /// `face_counts[i]` is the number of corners of polygon `i`;
    /// `vertex_indices` lists the corners of all polygons back to back.
    /// `normals` and `uvs`, when present, are given per polygon corner (same
    /// length as `vertex_indices`). Each n-gon becomes `n - 2` triangles
    /// fanned around its first corner.
    pub fn from_polygons(
        face_counts: &[u32],
        vertex_indices: &[u32],
        positions: Vec<DVec3>,
        normals: Option<&[DVec3]>,
        uvs: Option<&[DVec2]>,
    ) -> SceneResult<Self> {
        let corner_total: usize = face_counts.iter().map(|&c| c as usize).sum();
        if corner_total != vertex_indices.len() {
            return Err(SceneError::InvalidMesh(format!(
                "face counts describe {} corners but {} indices were given",
                corner_total,
                vertex_indices.len()
            )));
        }
        if let Some(c) = face_counts.iter().find(|&&c| c < 3) {
            return Err(SceneError::InvalidMesh(format!(
                "polygon with {} corners",
                c
            )));
        }
        for (name, len) in [
            ("normals", normals.map(<[DVec3]>::len)),
            ("texture coordinates", uvs.map(<[DVec2]>::len)),
        ] {
            if let Some(len) = len {
                if len != vertex_indices.len() {
                    return Err(SceneError::InvalidMesh(format!(
                        "{} {} for {} polygon corners",
                        len,
                        name,
                        vertex_indices.len()
                    )));
                }
            }
        }
        validate_indices(vertex_indices, positions.len())?;
        if face_counts.is_empty() {
            return Err(SceneError::InvalidMesh("mesh has no faces".into()));
        }

        let triangle_total: usize = face_counts.iter().map(|&c| c as usize - 2).sum();
        let mut indices = Vec::with_capacity(triangle_total * 3);
        let mut corner_normals = Vec::with_capacity(triangle_total * 3);
        let mut corner_uvs = Vec::with_capacity(triangle_total * 3);

        let mut k = 0;
        for &count in face_counts {
            let count = count as usize;
            for j in 0..count - 2 {
                for corner in [k, k + j + 1, k + j + 2] {
                    indices.push(vertex_indices[corner]);
                    if let Some(n) = normals {
                        corner_normals.push(n[corner]);
                    }
                    corner_uvs.push(uvs.map_or(DVec2::ZERO, |t| t[corner]));
                }
            }
            k += count;
        }

        let bounds = Aabb::from_point_cloud(positions.iter().copied());
        let mut mesh = Self {
            positions,
            indices,
            corner_normals,
            corner_uvs,
            culling: Culling::TwoSided,
            bounds,
        };
        if normals.is_none() {
            mesh.compute_normals();
        }
        Ok(mesh)
    }

    /// Generate a UV sphere centered at `center` from `divisions` latitude
    /// bands and `divisions` longitude segments: triangle fans at the poles
    /// and quads in between.
    pub fn poly_sphere(center: DVec3, radius: f64, divisions: u32) -> SceneResult<Self> {
        if divisions < 3 {
            return Err(SceneError::InvalidMesh(format!(
                "poly sphere needs at least 3 divisions, got {}",
                divisions
            )));
        }
        let divs = divisions as usize;
        let du = PI / divs as f64;
        let dv = 2.0 * PI / divs as f64;

        let mut positions = Vec::with_capacity((divs - 1) * divs + 2);
        let mut normals = Vec::with_capacity(positions.capacity());
        let mut uvs = Vec::with_capacity(positions.capacity());

        let mut push_vertex = |u: f64, v: f64| {
            let dir = DVec3::new(u.cos() * v.cos(), u.sin(), u.cos() * v.sin());
            positions.push(center + dir * radius);
            normals.push(dir);
            uvs.push(DVec2::new(u / PI + 0.5, v * 0.5 / PI + 0.5));
        };

        push_vertex(-FRAC_PI_2, 0.0);
        for i in 1..divs {
            let u = -FRAC_PI_2 + i as f64 * du;
            for j in 0..divs {
                push_vertex(u, -PI + j as f64 * dv);
            }
        }
        push_vertex(FRAC_PI_2, 0.0);

        let south = 0u32;
        let north = ((divs - 1) * divs + 1) as u32;
        let ring = |i: usize, j: usize| (1 + (i - 1) * divs + j % divs) as u32;

        let mut face_counts = Vec::with_capacity(divs * divs);
        let mut vertex_indices = Vec::new();
        for j in 0..divs {
            face_counts.push(3);
            vertex_indices.extend([south, ring(1, j), ring(1, j + 1)]);
        }
        for i in 1..divs - 1 {
            for j in 0..divs {
                face_counts.push(4);
                vertex_indices.extend([ring(i, j), ring(i + 1, j), ring(i + 1, j + 1), ring(i, j + 1)]);
            }
        }
        for j in 0..divs {
            face_counts.push(3);
            vertex_indices.extend([ring(divs - 1, j), north, ring(divs - 1, j + 1)]);
        }

        let corner_normals = per_corner(&normals, &vertex_indices);
        let corner_uvs = per_corner(&uvs, &vertex_indices);
        Self::from_polygons(
            &face_counts,
            &vertex_indices,
            positions,
            Some(&corner_normals),
            Some(&corner_uvs),
        )
    }

    /// Set the culling policy.
    pub fn with_culling(mut self, culling: Culling) -> Self {
        self.culling = culling;
        self
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Each corner receives the normalized sum of the (area-weighted) face
    /// normals of every triangle sharing its vertex.
    fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.positions.len()];

        for face in self.indices.chunks_exact(3) {
            let [p0, p1, p2] = [0, 1, 2].map(|i| self.positions[face[i] as usize]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            for &i in face {
                normals[i as usize] += face_normal;
            }
        }

        for normal in &mut normals {
            // Default up normal for degenerate cases
            *normal = normal.try_normalize().unwrap_or(DVec3::Y);
        }

        self.corner_normals = per_corner(&normals, &self.indices);
    }

    /// Corner positions of triangle `face`.
    fn face_vertices(&self, face: usize) -> [DVec3; 3] {
        [0, 1, 2].map(|i| self.positions[self.indices[face * 3 + i] as usize])
    }

    /// Geometric normal of triangle `face` (counter-clockwise winding).
    pub fn face_normal(&self, face: usize) -> DVec3 {
        let [v0, v1, v2] = self.face_vertices(face);
        (v1 - v0).cross(v2 - v0).normalize_or_zero()
    }

    /// Interpolate the shading normal and texture coordinate inside triangle
    /// `face` at barycentric weights `(u, v)`.
    ///
    /// The normal is flipped if needed so it lies on the same side as the
    /// geometric normal; a degenerate interpolation falls back to the face
    /// normal.
    pub fn surface_properties(&self, face: usize, barycentric: DVec2) -> (DVec3, DVec2) {
        let w = DVec3::new(1.0 - barycentric.x - barycentric.y, barycentric.x, barycentric.y);
        let base = face * 3;
        let geometric = self.face_normal(face);

        let n = self.corner_normals[base] * w.x
            + self.corner_normals[base + 1] * w.y
            + self.corner_normals[base + 2] * w.z;
        let normal = match n.try_normalize() {
            Some(n) if n.dot(geometric) < 0.0 => -n,
            Some(n) => n,
            None => geometric,
        };

        let uv = self.corner_uvs[base] * w.x
            + self.corner_uvs[base + 1] * w.y
            + self.corner_uvs[base + 2] * w.z;
        (normal, uv)
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> DVec3 {
        self.bounds.centroid()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

impl Intersect for Mesh {
    /// Tests every face and keeps the globally nearest hit.
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let mut nearest: Option<(f64, usize, DVec2)> = None;

        for face in 0..self.triangle_count() {
            let [v0, v1, v2] = self.face_vertices(face);
            if let Some((t, u, v)) = moller_trumbore(ray, v0, v1, v2, self.culling) {
                if nearest.map_or(true, |(best, _, _)| t < best) {
                    nearest = Some((t, face, DVec2::new(u, v)));
                }
            }
        }

        let (t, face, barycentric) = nearest?;
        let (normal, uv) = self.surface_properties(face, barycentric);
        Some(ShapeHit {
            t,
            normal,
            barycentric,
            uv,
            face,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }
}

/// Expand a per-vertex attribute into one value per index.
fn per_corner<T: Copy>(per_vertex: &[T], indices: &[u32]) -> Vec<T> {
    indices.iter().map(|&i| per_vertex[i as usize]).collect()
}

fn validate_indices(indices: &[u32], vertex_count: usize) -> SceneResult<()> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(i) => Err(SceneError::InvalidMesh(format!(
            "index {} out of range for {} vertices",
            i, vertex_count
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        // Unit square in the XY plane, one polygon
        Mesh::from_polygons(
            &[4],
            &[0, 1, 2, 3],
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            None,
            Some(&[
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.0, 1.0),
            ]),
        )
        .expect("valid quad")
    }

    #[test]
    fn test_fan_triangulation() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_computed_normals() {
        let mesh = quad();
        for n in &mesh.corner_normals {
            assert!((*n - DVec3::Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_mesh_hit_interpolates_uv() {
        let mesh = quad();
        let ray = Ray::new(DVec3::new(0.75, 0.25, 2.0), -DVec3::Z);

        let hit = mesh.intersect(&ray).expect("inside the quad");
        assert!((hit.t - 2.0).abs() < 1e-12);
        assert_eq!(hit.face, 0);
        assert!((hit.uv - DVec2::new(0.75, 0.25)).length() < 1e-12);
        assert!((hit.normal - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_mesh_reports_nearest_face() {
        // Two parallel triangles, the second closer to the ray origin
        let mesh = Mesh::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
                DVec3::new(0.0, 0.0, 1.0),
                DVec3::new(1.0, 0.0, 1.0),
                DVec3::new(0.0, 1.0, 1.0),
            ],
            vec![0, 1, 2, 3, 4, 5],
            None,
            None,
        )
        .expect("valid mesh");

        let ray = Ray::new(DVec3::new(0.2, 0.2, 3.0), -DVec3::Z);
        let hit = mesh.intersect(&ray).expect("hits both faces");
        assert_eq!(hit.face, 1);
        assert!((hit.t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_surface_properties_weights() {
        let mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![0, 1, 2],
            Some(vec![DVec3::Z, DVec3::Z, DVec3::new(0.0, 1.0, 1.0).normalize()]),
            Some(vec![DVec2::ZERO, DVec2::X, DVec2::Y]),
        )
        .expect("valid mesh");

        let (n, uv) = mesh.surface_properties(0, DVec2::new(0.0, 0.0));
        assert!((n - DVec3::Z).length() < 1e-12);
        assert_eq!(uv, DVec2::ZERO);

        let (n, uv) = mesh.surface_properties(0, DVec2::new(0.0, 1.0));
        assert!(n.y > 0.0);
        assert!((uv - DVec2::Y).length() < 1e-12);
    }

    #[test]
    fn test_invalid_meshes() {
        let p = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        assert!(Mesh::new(p.clone(), vec![0, 1], None, None).is_err());
        assert!(Mesh::new(p.clone(), vec![0, 1, 3], None, None).is_err());
        assert!(Mesh::new(p.clone(), vec![], None, None).is_err());
        assert!(Mesh::from_polygons(&[2], &[0, 1], p.clone(), None, None).is_err());
        assert!(Mesh::new(p, vec![0, 1, 2], Some(vec![DVec3::Z]), None).is_err());
    }

    #[test]
    fn test_poly_sphere() {
        let divs = 8;
        let mesh = Mesh::poly_sphere(DVec3::new(0.0, 0.0, -5.0), 2.0, divs).expect("valid sphere");
        let divs = divs as usize;

        assert_eq!(mesh.vertex_count(), (divs - 1) * divs + 2);
        assert_eq!(mesh.triangle_count(), 2 * divs * (divs - 1));

        for p in mesh.positions() {
            assert!(((*p - DVec3::new(0.0, 0.0, -5.0)).length() - 2.0).abs() < 1e-9);
        }

        // Faces wind outward
        for face in 0..mesh.triangle_count() {
            let [v0, v1, v2] = mesh.face_vertices(face);
            let centroid = (v0 + v1 + v2) / 3.0 - mesh.center();
            assert!(mesh.face_normal(face).dot(centroid) > 0.0, "face {} winds inward", face);
        }

        // A ray toward the center hits the near side, a bit short of the radius
        let ray = Ray::new(DVec3::new(0.1, 0.13, 0.0), -DVec3::Z);
        let hit = mesh.intersect(&ray).expect("ray aimed near the center");
        assert!(hit.t > 3.0 - 1e-9 && hit.t < 3.5);
        assert!(hit.normal.z > 0.0);
    }

    #[test]
    fn test_poly_sphere_rejects_too_few_divisions() {
        assert!(Mesh::poly_sphere(DVec3::ZERO, 1.0, 2).is_err());
    }
}
