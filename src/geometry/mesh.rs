use nalgebra::Vector3;

use crate::optimization::Scalar;
use crate::utils::GeometryError;

/// A polygon mesh: points and faces indexing into them.
///
/// Faces are wound counter-clockwise seen from outside (from above, for a
/// camber surface).
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T: Scalar = f64> {
    pub points: Vec<Vector3<T>>,
    pub faces: Vec<Vec<usize>>,
}

impl<T: Scalar> Default for Mesh<T> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            faces: Vec::new(),
        }
    }
}

impl<T: Scalar> Mesh<T> {
    pub fn new(points: Vec<Vector3<T>>, faces: Vec<Vec<usize>>) -> Self {
        Self { points, faces }
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Appends `other`, shifting its face indices past the existing points.
    pub fn append(&mut self, other: Mesh<T>) {
        let offset = self.points.len();
        self.points.extend(other.points);
        self.faces.extend(
            other
                .faces
                .into_iter()
                .map(|face| face.into_iter().map(|i| i + offset).collect()),
        );
    }

    /// Reflection across the XZ plane with every face re-wound, so outward
    /// normals stay outward.
    pub fn mirrored(&self) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Vector3::new(p.x, -p.y, p.z))
                .collect(),
            faces: self
                .faces
                .iter()
                .map(|face| face.iter().rev().copied().collect())
                .collect(),
        }
    }

    /// Checks that every face index refers to an existing point.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let points = self.points.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= points) {
                return Err(GeometryError::DanglingFaceIndex {
                    face,
                    index,
                    points,
                });
            }
        }
        Ok(())
    }

    /// Flat face array `[n, i0, .., in-1, n, ...]` as used by polygon-mesh
    /// viewers.
    pub fn to_polydata(&self) -> Vec<usize> {
        let mut polydata = Vec::with_capacity(self.faces.iter().map(|f| f.len() + 1).sum());
        for face in &self.faces {
            polydata.push(face.len());
            polydata.extend(face);
        }
        polydata
    }

    /// Primal coordinates, for export.
    pub fn points_f64(&self) -> Vec<[f64; 3]> {
        self.points
            .iter()
            .map(|p| [p.x.value(), p.y.value(), p.z.value()])
            .collect()
    }
}

/// Quads between consecutive rows of a structured grid stored row by row.
pub(crate) fn grid_quads(offset: usize, rows: usize, columns: usize) -> Vec<Vec<usize>> {
    let index = |row: usize, column: usize| offset + row * columns + column;
    let mut faces = Vec::with_capacity(rows.saturating_sub(1) * columns.saturating_sub(1));
    for row in 0..rows.saturating_sub(1) {
        for column in 0..columns.saturating_sub(1) {
            faces.push(vec![
                index(row, column),
                index(row, column + 1),
                index(row + 1, column + 1),
                index(row + 1, column),
            ]);
        }
    }
    faces
}

/// Quads between consecutive rings of a grid whose rows close on themselves.
pub(crate) fn ring_quads(offset: usize, rings: usize, per_ring: usize) -> Vec<Vec<usize>> {
    let index = |ring: usize, m: usize| offset + ring * per_ring + m % per_ring;
    let mut faces = Vec::with_capacity(rings.saturating_sub(1) * per_ring);
    for ring in 0..rings.saturating_sub(1) {
        for m in 0..per_ring {
            faces.push(vec![
                index(ring, m),
                index(ring, m + 1),
                index(ring + 1, m + 1),
                index(ring + 1, m),
            ]);
        }
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit_square() -> Mesh {
        Mesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
            ],
            grid_quads(0, 2, 2),
        )
    }

    #[test]
    fn test_grid_quads_winding() {
        assert_eq!(grid_quads(4, 2, 3), vec![vec![4, 5, 8, 7], vec![5, 6, 9, 8]]);
    }

    #[test]
    fn test_ring_quads_wrap_around() {
        let faces = ring_quads(0, 2, 3);
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[2], vec![2, 0, 3, 5]);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut mesh = unit_square();
        mesh.append(unit_square());
        assert_eq!(mesh.num_points(), 8);
        assert_eq!(mesh.faces[1], vec![4, 5, 7, 6]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_mirrored_reverses_winding() {
        let mirrored = unit_square().mirrored();
        assert_eq!(mirrored.points[2], Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(mirrored.faces[0], vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_polydata_and_validation() {
        let mut mesh = unit_square();
        assert_eq!(mesh.to_polydata(), vec![4, 0, 1, 3, 2]);

        mesh.faces.push(vec![0, 1, 9]);
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::DanglingFaceIndex {
                face: 1,
                index: 9,
                points: 4
            })
        );
    }
}
